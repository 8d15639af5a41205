use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message, Role};
use crate::tui::format;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank row between consecutive bubbles.
const MESSAGE_GAP: u16 = 1;
/// Bubbles never grow past this share of the available width (numerator / 4).
const MAX_WIDTH_QUARTERS: u16 = 3;

/// A stateless component that renders one chat message as a bubble.
///
/// User bubbles hug the right edge in cyan, bot bubbles the left edge in
/// white. Each bubble is sized to its content, capped at three quarters of
/// the row. Messages with an attached image get an image chip above the text.
///
/// Heights are predicted with [`MessageBubble::calculate_height`] so the parent
/// list can lay out its scroll canvas without rendering first.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub bot_name: &'a str,
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Bot => Style::default().fg(Color::White),
    }
}

fn image_chip(message: &Message) -> Option<Line<'static>> {
    message.image.as_ref().map(|image| {
        Line::from(vec![
            Span::styled("▣ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} ({} KB)", image.file_name, image.byte_len.div_ceil(1024)),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ])
    })
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, bot_name: &'a str) -> Self {
        Self { message, bot_name }
    }

    fn title(&self) -> String {
        let who = match self.message.role {
            Role::User => "you",
            Role::Bot => self.bot_name,
        };
        format!(" {} · {} ", who, self.message.sent_at.format("%H:%M"))
    }

    fn body(&self) -> Text<'static> {
        let mut text = format::render(&self.message.text, role_style(self.message.role));
        if let Some(chip) = image_chip(self.message) {
            text.lines.insert(0, chip);
        }
        text
    }

    /// Bubble width inside a row of `row_width` columns.
    fn bubble_width(&self, body: &Text<'_>, row_width: u16) -> u16 {
        let max_width = (row_width * MAX_WIDTH_QUARTERS / 4).max(HORIZONTAL_OVERHEAD + 1);
        let title_width = self.title().chars().count() as u16 + 2;
        let natural = (body.width() as u16)
            .saturating_add(HORIZONTAL_OVERHEAD)
            .max(title_width);
        natural.min(max_width).min(row_width)
    }

    /// Height of the bubble (plus the gap below it) when laid out in `row_width` columns.
    pub fn calculate_height(&self, row_width: u16) -> u16 {
        let body = self.body();
        let width = self.bubble_width(&body, row_width);
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }
        let line_count = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        let lines = u16::try_from(line_count).unwrap_or(u16::MAX);
        lines
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD + MESSAGE_GAP)
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = self.body();
        let width = self.bubble_width(&body, area.width);
        let height = area.height.saturating_sub(MESSAGE_GAP);
        let x = match self.message.role {
            Role::User => area.x + area.width.saturating_sub(width),
            Role::Bot => area.x,
        };
        let bubble = Rect::new(x, area.y, width, height);

        let style = role_style(self.message.role);
        let border_style = style.add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(bubble);
        block.render(bubble, buf);
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ImageRef;
    use uuid::Uuid;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn calculate_height_single_line() {
        let msg = Message::bot("Hello");
        let bubble = MessageBubble::new(&msg, "Bot");
        assert_eq!(
            bubble.calculate_height(80),
            1 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn calculate_height_counts_paragraph_breaks() {
        let msg = Message::bot("**hi** there\n\nnext");
        let bubble = MessageBubble::new(&msg, "Bot");
        // "hi there", blank, "next"
        assert_eq!(
            bubble.calculate_height(80),
            3 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn calculate_height_wraps_long_text() {
        let msg = Message::bot("word ".repeat(40));
        let bubble = MessageBubble::new(&msg, "Bot");
        assert!(bubble.calculate_height(40) > 1 + VERTICAL_OVERHEAD + MESSAGE_GAP);
    }

    #[test]
    fn calculate_height_adds_image_chip() {
        let image = ImageRef {
            id: Uuid::new_v4(),
            file_name: "cat.png".to_string(),
            mime: "image/png".to_string(),
            byte_len: 2048,
        };
        let msg = Message::user("", Some(image));
        let bubble = MessageBubble::new(&msg, "Bot");
        assert_eq!(
            bubble.calculate_height(80),
            2 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn calculate_height_saturates_for_huge_replies() {
        let msg = Message::bot("x\n".repeat(70_000));
        assert_eq!(MessageBubble::new(&msg, "Bot").calculate_height(80), u16::MAX);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let msg = Message::bot("Hello");
        assert_eq!(MessageBubble::new(&msg, "Bot").calculate_height(0), 1);
    }

    #[test]
    fn user_bubble_is_right_aligned() {
        let msg = Message::user("hi", None);
        let bubble = MessageBubble::new(&msg, "Bot");
        let area = Rect::new(0, 0, 60, bubble.calculate_height(60));
        let mut buf = Buffer::empty(area);
        bubble.render(area, &mut buf);

        // Left edge stays blank, right edge carries the rounded corner.
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(59, 0)].symbol(), "╮");
        assert!(buffer_text(&buf).contains("hi"));
    }

    #[test]
    fn bot_bubble_is_left_aligned_and_titled() {
        let msg = Message::bot("Hello");
        let bubble = MessageBubble::new(&msg, "Smokeland Bot");
        let area = Rect::new(0, 0, 60, bubble.calculate_height(60));
        let mut buf = Buffer::empty(area);
        bubble.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "╭");
        assert!(buffer_text(&buf).contains("Smokeland Bot"));
    }

    #[test]
    fn markup_is_not_rendered_raw() {
        let msg = Message::bot("<b>**bold**</b>");
        let bubble = MessageBubble::new(&msg, "Bot");
        let area = Rect::new(0, 0, 60, bubble.calculate_height(60));
        let mut buf = Buffer::empty(area);
        bubble.render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("bold"));
        assert!(!text.contains("<b>"));
        assert!(!text.contains("**"));
    }
}
