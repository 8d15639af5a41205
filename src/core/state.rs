//! # Application State
//!
//! Core business state for Smokeland. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session          // login gate
//! ├── messages: Vec<Message>    // conversation, insertion order = display order
//! ├── is_thinking: bool         // a query is in flight
//! ├── bot_name: String          // shown on bot bubbles and the busy indicator
//! └── status_message: String    // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::session::Session;

pub struct App {
    pub session: Session,
    pub messages: Vec<Message>,
    pub is_thinking: bool,
    pub bot_name: String,
    pub status_message: String,
}

impl App {
    /// A fresh, logged-out app whose conversation opens with the bot's greeting.
    pub fn new(bot_name: String) -> Self {
        let greeting = format!("Hi, I'm {bot_name}! How can I assist you today?");
        Self {
            session: Session::default(),
            messages: vec![Message::bot(greeting)],
            is_thinking: false,
            bot_name,
            status_message: String::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.bot_name.clone());
        if config.skip_login {
            app.session.login();
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use std::time::Duration;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new("Smokeland Bot".to_string());
        assert_eq!(app.session, Session::LoggedOut);
        assert!(!app.is_thinking);
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, Role::Bot);
        assert_eq!(
            app.messages[0].text,
            "Hi, I'm Smokeland Bot! How can I assist you today?"
        );
    }

    #[test]
    fn test_from_config_honors_skip_login() {
        let config = ResolvedConfig {
            endpoint: "http://localhost".to_string(),
            bot_name: "Helper".to_string(),
            skip_login: true,
            upload_delay: Duration::ZERO,
            request_timeout: None,
        };
        let app = App::from_config(&config);
        assert!(app.session.is_logged_in());
        assert_eq!(app.bot_name, "Helper");
    }
}
