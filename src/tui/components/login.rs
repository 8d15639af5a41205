//! # Login Form Component
//!
//! Centered sign-in card shown while the session is logged out.
//!
//! Credentials are collected but never checked or sent anywhere: a submit with
//! both fields filled in is all it takes to enter the chat. Tab and Shift+Tab
//! move focus between the email and password fields.

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::TextField;
use crate::tui::event::TuiEvent;

const CARD_WIDTH: u16 = 52;
const CARD_HEIGHT: u16 = 17;
const PASSWORD_MASK: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    Submit,
}

pub struct LoginForm {
    email: TextField,
    password: TextField,
    pub focus: LoginField,
    /// Set after an incomplete submit so the card can point at the empty field.
    missing: Option<LoginField>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: TextField::new(),
            password: TextField::new(),
            focus: LoginField::Email,
            missing: None,
        }
    }

    pub fn email(&self) -> &str {
        self.email.value()
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn first_missing(&self) -> Option<LoginField> {
        if self.email.is_blank() {
            Some(LoginField::Email)
        } else if self.password.value().is_empty() {
            Some(LoginField::Password)
        } else {
            None
        }
    }

    fn try_submit(&mut self) -> Option<LoginEvent> {
        match self.first_missing() {
            Some(field) => {
                debug!("Login submit with empty {:?}", field);
                self.missing = Some(field);
                self.focus = field;
                None
            }
            None => {
                self.missing = None;
                self.password.clear();
                Some(LoginEvent::Submit)
            }
        }
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, field: LoginField) {
        let focused = self.focus == field;
        let (title, placeholder) = match field {
            LoginField::Email => (" Email ", "Enter your email"),
            LoginField::Password => (" Password ", "Enter your password"),
        };
        let border = if self.missing == Some(field) {
            Style::default().fg(Color::Red)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_field = match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        };
        let (visible, cursor_col) = match field {
            LoginField::Email => text_field.viewport(inner.width),
            LoginField::Password => text_field.masked_viewport(PASSWORD_MASK, inner.width),
        };
        if visible.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray))),
                inner,
            );
        } else {
            frame.render_widget(Paragraph::new(visible), inner);
        }
        if focused {
            frame.set_cursor_position((inner.x + cursor_col, inner.y));
        }
    }
}

impl Component for LoginForm {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [column] = Layout::horizontal([Constraint::Length(CARD_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(area);
        let [card] = Layout::vertical([Constraint::Length(CARD_HEIGHT.min(area.height))])
            .flex(Flex::Center)
            .areas(column);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(2));
        let inner = block.inner(card);
        frame.render_widget(Clear, card);
        frame.render_widget(block, card);

        let [header, _, heading, email, password, hint, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        let dim = Style::default().fg(Color::DarkGray);
        let header_lines = vec![
            Line::from(Span::styled(
                "Smokeland Conversation Engine",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Your AI-powered assistant at your service.", dim)),
        ];
        frame.render_widget(
            Paragraph::new(header_lines).alignment(Alignment::Center),
            header,
        );
        frame.render_widget(
            Paragraph::new(Span::styled("Sign in", Style::default().add_modifier(Modifier::BOLD))),
            heading,
        );

        self.render_field(frame, email, LoginField::Email);
        self.render_field(frame, password, LoginField::Password);

        let hint_line = match self.missing {
            Some(LoginField::Email) => {
                Line::from(Span::styled("Please enter your email.", Style::default().fg(Color::Red)))
            }
            Some(LoginField::Password) => Line::from(Span::styled(
                "Please enter your password.",
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled("Tab to switch field · Enter to sign in", dim)),
        };
        frame.render_widget(Paragraph::new(hint_line), hint);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Powered by Smokeland Conversation Engine",
                dim.add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
            Rect::new(footer.x, footer.bottom().saturating_sub(1), footer.width, footer.height.min(1)),
        );
    }
}

impl EventHandler for LoginForm {
    type Event = LoginEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::NextField | TuiEvent::PrevField => {
                self.toggle_focus();
                None
            }
            TuiEvent::Submit => self.try_submit(),
            other => {
                let changed = match self.focus {
                    LoginField::Email => self.email.handle(other),
                    LoginField::Password => self.password.handle(other),
                };
                if changed && self.missing == Some(self.focus) {
                    self.missing = None;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(form: &mut LoginForm, s: &str) {
        for c in s.chars() {
            form.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn render_text(form: &mut LoginForm) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| form.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_submit_with_both_fields() {
        let mut form = LoginForm::new();
        type_str(&mut form, "a@b.com");
        form.handle_event(&TuiEvent::NextField);
        type_str(&mut form, "pw");

        assert_eq!(form.handle_event(&TuiEvent::Submit), Some(LoginEvent::Submit));
        assert_eq!(form.email(), "a@b.com");
    }

    #[test]
    fn test_empty_email_blocks_submit() {
        let mut form = LoginForm::new();
        form.handle_event(&TuiEvent::NextField);
        type_str(&mut form, "pw");

        assert_eq!(form.handle_event(&TuiEvent::Submit), None);
        assert_eq!(form.focus, LoginField::Email);
        assert!(render_text(&mut form).contains("Please enter your email."));
    }

    #[test]
    fn test_empty_password_blocks_submit() {
        let mut form = LoginForm::new();
        type_str(&mut form, "a@b.com");

        assert_eq!(form.handle_event(&TuiEvent::Submit), None);
        assert_eq!(form.focus, LoginField::Password);
    }

    #[test]
    fn test_typing_clears_missing_hint() {
        let mut form = LoginForm::new();
        form.handle_event(&TuiEvent::Submit);
        type_str(&mut form, "x");
        assert!(!render_text(&mut form).contains("Please enter your email."));
    }

    #[test]
    fn test_tab_and_backtab_toggle_focus() {
        let mut form = LoginForm::new();
        form.handle_event(&TuiEvent::NextField);
        assert_eq!(form.focus, LoginField::Password);
        form.handle_event(&TuiEvent::PrevField);
        assert_eq!(form.focus, LoginField::Email);
    }

    #[test]
    fn test_render_masks_password_and_shows_branding() {
        let mut form = LoginForm::new();
        type_str(&mut form, "me@example.com");
        form.handle_event(&TuiEvent::NextField);
        type_str(&mut form, "hunter2");

        let text = render_text(&mut form);
        assert!(text.contains("Smokeland Conversation Engine"));
        assert!(text.contains("Your AI-powered assistant at your service."));
        assert!(text.contains("Sign in"));
        assert!(text.contains("Powered by Smokeland Conversation Engine"));
        assert!(text.contains("me@example.com"));
        assert!(text.contains("•••••••"));
        assert!(!text.contains("hunter2"));
    }
}
