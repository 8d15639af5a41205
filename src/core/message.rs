//! Chat messages as the conversation stores them.

use chrono::{DateTime, Local};

use crate::client::ImageRef;

/// Text shown for a user message that carried only an image.
pub const IMAGE_PLACEHOLDER: &str = "Image uploaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One entry in the conversation. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub image: Option<ImageRef>,
    pub sent_at: DateTime<Local>,
}

impl Message {
    /// A user message. Blank text with an image falls back to [`IMAGE_PLACEHOLDER`].
    pub fn user(text: &str, image: Option<ImageRef>) -> Self {
        let text = if text.trim().is_empty() && image.is_some() {
            IMAGE_PLACEHOLDER.to_string()
        } else {
            text.to_string()
        };
        Self {
            role: Role::User,
            text,
            image,
            sent_at: Local::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            image: None,
            sent_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn image_ref() -> ImageRef {
        ImageRef {
            id: Uuid::new_v4(),
            file_name: "cat.png".to_string(),
            mime: "image/png".to_string(),
            byte_len: 3,
        }
    }

    #[test]
    fn user_message_keeps_text() {
        let msg = Message::user("hello", None);
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text, "hello");
        assert!(msg.image.is_none());
    }

    #[test]
    fn image_only_user_message_uses_placeholder() {
        let msg = Message::user("", Some(image_ref()));
        assert_eq!(msg.text, IMAGE_PLACEHOLDER);
        assert!(msg.image.is_some());
    }

    #[test]
    fn whitespace_caption_with_image_uses_placeholder() {
        let msg = Message::user("  \n\t ", Some(image_ref()));
        assert_eq!(msg.text, IMAGE_PLACEHOLDER);
    }

    #[test]
    fn whitespace_without_image_is_kept() {
        let msg = Message::user("   ", None);
        assert_eq!(msg.text, "   ");
    }

    #[test]
    fn caption_wins_over_placeholder() {
        let msg = Message::user("look", Some(image_ref()));
        assert_eq!(msg.text, "look");
    }

    #[test]
    fn bot_message_has_no_image() {
        let msg = Message::bot("Hello");
        assert_eq!(msg.role, Role::Bot);
        assert_eq!(msg.text, "Hello");
        assert!(msg.image.is_none());
    }
}
