//! # TitleBar Component
//!
//! Top status bar: bot name, the last status message and a "↓ New" marker
//! when a reply arrived below the current scroll position.
//!
//! Purely presentational. All three props come from different places:
//! - `bot_name`: core `App` (configuration)
//! - `status_message`: core `App` (set when a request fails)
//! - `has_unseen_content`: TUI scroll state
//!
//! Priority when space is short: name, then status, then the marker.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub bot_name: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(bot_name: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            bot_name,
            status_message,
            has_unseen_content,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "Smokeland",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" · chatting with {}", self.bot_name)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "↓ New",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("Smokeland Bot".to_string(), String::new(), false);
        let text = render(&mut title_bar);

        assert!(text.contains("chatting with Smokeland Bot"));
        assert!(!text.contains('|'));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new(
            "Smokeland Bot".to_string(),
            "Last request failed (network error: refused)".to_string(),
            false,
        );
        let text = render(&mut title_bar);

        assert!(text.contains("Last request failed"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar = TitleBar::new("Smokeland Bot".to_string(), String::new(), true);
        let text = render(&mut title_bar);

        assert!(text.contains("↓ New"));
    }
}
