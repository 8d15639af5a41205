//! # Busy Indicator
//!
//! "<bot> is thinking" followed by three dots that bounce in turn.
//! Purely decorative: the parent decides when to show it and passes the
//! animation frame in.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Rows the indicator occupies (blank spacer + text).
pub const BUSY_HEIGHT: u16 = 2;

/// Which of the three dots is raised on a given animation frame.
pub fn raised_dot(frame: usize) -> usize {
    frame % 3
}

#[derive(Clone, Copy)]
pub struct BusyIndicator<'a> {
    pub bot_name: &'a str,
    pub frame: usize,
}

impl<'a> BusyIndicator<'a> {
    pub fn new(bot_name: &'a str, frame: usize) -> Self {
        Self { bot_name, frame }
    }

    fn line(&self) -> Line<'static> {
        let label = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        let raised = raised_dot(self.frame);

        let mut spans = vec![Span::styled(format!("{} is thinking ", self.bot_name), label)];
        for i in 0..3 {
            let dot = if i == raised {
                Span::styled("●", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else {
                Span::styled("•", Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM))
            };
            spans.push(dot);
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for BusyIndicator<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        // Bottom row of the area; the row above is spacing.
        let row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        Paragraph::new(self.line()).render(row, buf);
    }
}
