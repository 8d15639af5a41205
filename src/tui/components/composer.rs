//! # Composer Component
//!
//! Captures either a text message or a single image and emits a submission.
//!
//! ## Modes
//!
//! - **Text**: type a message, Enter sends it.
//! - **Image**: type a file path, Enter picks the file. Picking starts a
//!   simulated upload; the image only becomes the active attachment once
//!   `upload_delay` has elapsed. Enter on an empty path sends the image.
//!
//! Tab toggles the mode, Ctrl+X removes the selected image.
//!
//! ## Submission Rules
//!
//! - Rejected when the text is blank and no image is selected.
//! - Rejected while `disabled` (a query is pending).
//! - On success the draft resets: empty text, no image, Text mode.
//!
//! Uploads are advanced by [`Composer::poll_upload`], which the event loop
//! calls every frame with the current time.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::client::ImageAttachment;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::TextField;
use crate::tui::event::TuiEvent;

/// Rows used by the composer: mode tabs (1) + bordered input (3) + status line (1).
pub const COMPOSER_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeMode {
    Text,
    Image,
}

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    Submit {
        text: String,
        image: Option<ImageAttachment>,
    },
}

/// A picked file waiting out the simulated upload delay.
struct PendingUpload {
    attachment: ImageAttachment,
    ready_at: Instant,
}

pub struct Composer {
    pub mode: ComposeMode,
    text: TextField,
    path: TextField,
    image: Option<ImageAttachment>,
    upload: Option<PendingUpload>,
    upload_delay: Duration,
    /// Last pick failure, shown under the input until the next pick.
    error: Option<String>,
    /// Prop: true while a query is pending.
    pub disabled: bool,
}

impl Composer {
    pub fn new(upload_delay: Duration) -> Self {
        Self {
            mode: ComposeMode::Text,
            text: TextField::new(),
            path: TextField::new(),
            image: None,
            upload: None,
            upload_delay,
            error: None,
            disabled: false,
        }
    }

    pub fn text(&self) -> &str {
        self.text.value()
    }

    pub fn selected_image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.upload.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the send affordance is enabled, mirroring what Enter would do.
    pub fn can_send(&self) -> bool {
        !self.disabled && (!self.text.is_blank() || self.image.is_some())
    }

    /// Starts the simulated upload of an already-loaded attachment.
    /// Replaces any previous selection, including one still uploading.
    pub fn begin_upload(&mut self, attachment: ImageAttachment, now: Instant) {
        info!(
            "Uploading image {} ({} bytes)",
            attachment.image_ref.file_name, attachment.image_ref.byte_len
        );
        self.error = None;
        self.upload = Some(PendingUpload {
            attachment,
            ready_at: now + self.upload_delay,
        });
    }

    /// Loads `path` and starts its upload. Failures are shown inline.
    pub fn pick(&mut self, path: &Path, now: Instant) {
        match ImageAttachment::load(path) {
            Ok(attachment) => self.begin_upload(attachment, now),
            Err(e) => {
                warn!("Image pick failed for {}: {}", path.display(), e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Promotes a finished upload to the selected image. Returns `true` if it did.
    pub fn poll_upload(&mut self, now: Instant) -> bool {
        match &self.upload {
            Some(pending) if now >= pending.ready_at => {}
            _ => return false,
        }
        if let Some(pending) = self.upload.take() {
            debug!("Upload finished: {}", pending.attachment.image_ref.file_name);
            self.image = Some(pending.attachment);
        }
        true
    }

    pub fn clear_image(&mut self) -> bool {
        let had = self.image.is_some() || self.upload.is_some();
        self.image = None;
        self.upload = None;
        had
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ComposeMode::Text => ComposeMode::Image,
            ComposeMode::Image => ComposeMode::Text,
        };
    }

    fn try_submit(&mut self) -> Option<ComposerEvent> {
        if !self.can_send() {
            debug!(
                "Composer submit rejected (disabled={}, blank={}, image={})",
                self.disabled,
                self.text.is_blank(),
                self.image.is_some()
            );
            return None;
        }
        let text = self.text.take();
        let image = self.image.take();
        // An upload still in flight belongs to the draft being discarded
        self.upload = None;
        self.path.clear();
        self.mode = ComposeMode::Text;
        Some(ComposerEvent::Submit { text, image })
    }

    fn active_field(&mut self) -> &mut TextField {
        match self.mode {
            ComposeMode::Text => &mut self.text,
            ComposeMode::Image => &mut self.path,
        }
    }

    fn status_line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        if self.upload.is_some() {
            return Line::from(Span::styled(
                "⟳ Uploading image...",
                Style::default().fg(Color::Cyan),
            ));
        }
        if let Some(err) = self.error() {
            return Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red)));
        }
        if let Some(image) = &self.image {
            return Line::from(vec![
                Span::styled("▣ ", Style::default().fg(Color::Cyan)),
                Span::styled(format!("Image selected: {}", image.image_ref.file_name), dim),
                Span::styled("  (Ctrl+X to remove)", dim.add_modifier(Modifier::ITALIC)),
            ]);
        }
        Line::default()
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [tabs_area, input_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let active = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().fg(Color::DarkGray);
        let (text_style, image_style) = match self.mode {
            ComposeMode::Text => (active, inactive),
            ComposeMode::Image => (inactive, active),
        };
        let tabs = Line::from(vec![
            Span::styled(" Text ", text_style),
            Span::raw(" "),
            Span::styled(" Image ", image_style),
            Span::styled("   Tab to switch", inactive),
        ]);
        frame.render_widget(Paragraph::new(tabs), tabs_area);

        let send_style = if self.can_send() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let (title, placeholder) = match self.mode {
            ComposeMode::Text => (" Message ", "Type a message..."),
            ComposeMode::Image if self.image.is_some() => (" Image ", "Image selected"),
            ComposeMode::Image => (" Image ", "Choose an image... (type a path)"),
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .title_bottom(Line::styled(" Send ⏎ ", send_style).right_aligned())
            .border_style(if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Cyan)
            });
        let inner = block.inner(input_area);
        frame.render_widget(block, input_area);

        let field = match self.mode {
            ComposeMode::Text => &self.text,
            ComposeMode::Image => &self.path,
        };
        if field.value().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray))),
                inner,
            );
            if !self.disabled {
                frame.set_cursor_position((inner.x, inner.y));
            }
        } else {
            let (visible, cursor_col) = field.viewport(inner.width);
            frame.render_widget(Paragraph::new(visible), inner);
            if !self.disabled {
                frame.set_cursor_position((inner.x + cursor_col, inner.y));
            }
        }

        frame.render_widget(Paragraph::new(self.status_line()), status_area);
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::NextField => {
                self.toggle_mode();
                None
            }
            TuiEvent::ClearImage => {
                self.clear_image();
                None
            }
            TuiEvent::Submit => match self.mode {
                ComposeMode::Image if !self.path.is_blank() => {
                    let path = self.path.take();
                    self.pick(Path::new(path.trim()), Instant::now());
                    None
                }
                _ => self.try_submit(),
            },
            other => {
                self.active_field().handle(other);
                None
            }
        }
    }
}
