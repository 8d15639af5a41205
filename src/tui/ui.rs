use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{COMPOSER_HEIGHT, MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Draws one frame: the login card while logged out, the chat screen after.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    if !app.session.is_logged_in() {
        tui.login.render(frame, frame.area());
        return;
    }

    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(COMPOSER_HEIGHT), Length(1)]);
    let [title_area, main_area, composer_area, hint_area] = layout.areas(frame.area());

    MessageList::new(
        &mut tui.message_list,
        &app.messages,
        &app.bot_name,
        app.is_thinking,
        spinner_frame,
    )
    .render(frame, main_area);

    // After the list so the unseen-content flag reflects this frame
    TitleBar::new(
        app.bot_name.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.composer.disabled = app.is_thinking;
    tui.composer.render(frame, composer_area);

    draw_hints(frame, hint_area);
}

fn draw_hints(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let dim = Style::default().fg(Color::DarkGray);
    let hints = [
        ("Enter", "send"),
        ("Tab", "text/image"),
        ("Ctrl+X", "remove image"),
        ("PgUp/PgDn", "scroll"),
        ("Ctrl+C", "quit"),
    ];
    let mut spans = Vec::new();
    for (i, (k, what)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", dim));
        }
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(format!(" {what}"), dim));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_logged_out_shows_login_card() {
        let app = App::new("Smokeland Bot".to_string());
        let mut tui = TuiState::new(Duration::ZERO);

        let text = draw(&app, &mut tui);
        assert!(text.contains("Sign in"));
        assert!(!text.contains("Type a message..."));
    }

    #[test]
    fn test_logged_in_shows_greeting_and_composer() {
        let app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);

        let text = draw(&app, &mut tui);
        assert!(text.contains("Hi, I'm Test Bot! How can I assist you today?"));
        assert!(text.contains("Type a message..."));
        assert!(text.contains("Ctrl+C quit"));
    }

    #[test]
    fn test_pending_query_shows_busy_and_disables_composer() {
        let mut app = test_app();
        update(
            &mut app,
            Action::Submit {
                text: "Hello".to_string(),
                image: None,
            },
        );
        let mut tui = TuiState::new(Duration::ZERO);

        let text = draw(&app, &mut tui);
        assert!(text.contains("Hello"));
        assert!(text.contains("Test Bot is thinking"));
        assert!(tui.composer.disabled);
    }
}
