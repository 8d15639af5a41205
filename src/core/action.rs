//! # Actions
//!
//! Everything that can happen in Smokeland becomes an `Action`.
//! User submits the composer? That's `Action::Submit`.
//! The endpoint answers (or fails)? That's `Action::QueryFinished(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an [`Effect`] describing any I/O the runtime must do.
//! No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! A conversation turn:
//!
//! ```text
//! Submit ─▶ user message appended, is_thinking = true ─▶ Effect::SendQuery
//!                                                            │ (runtime)
//! QueryFinished(Ok | Err) ◀──────────────────────────────────┘
//!   └▶ bot message appended (reply or fallback), is_thinking = false
//! ```

use log::{debug, info, warn};

use crate::client::{ClientError, ImageAttachment, QueryRequest};
use crate::core::message::Message;
use crate::core::state::App;

/// Bot reply used whenever a query fails for any reason.
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The login form was submitted.
    Login,
    /// The composer produced a message.
    Submit {
        text: String,
        image: Option<ImageAttachment>,
    },
    /// The in-flight query resolved. Exactly one per `Effect::SendQuery`.
    QueryFinished(Result<String, ClientError>),
    Quit,
}

/// I/O requested by `update()`, performed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SendQuery(QueryRequest),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Login => {
            app.session.login();
            info!("Session signed in");
            Effect::None
        }
        Action::Submit { text, image } => submit(app, text, image),
        Action::QueryFinished(result) => {
            if !app.is_thinking {
                warn!("QueryFinished arrived with no query pending");
            }
            let reply = match result {
                Ok(text) => {
                    app.status_message.clear();
                    text
                }
                Err(e) => {
                    warn!("Query failed: {e}");
                    app.status_message = format!("Last request failed ({e})");
                    FALLBACK_REPLY.to_string()
                }
            };
            app.messages.push(Message::bot(reply));
            app.is_thinking = false;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String, image: Option<ImageAttachment>) -> Effect {
    if !app.session.is_logged_in() {
        warn!("Submit ignored: not signed in");
        return Effect::None;
    }
    // One query at a time; the composer is disabled meanwhile.
    if app.is_thinking {
        debug!("Submit ignored: a query is already pending");
        return Effect::None;
    }
    if text.trim().is_empty() && image.is_none() {
        debug!("Submit ignored: nothing to send");
        return Effect::None;
    }

    let image_ref = image.as_ref().map(|i| i.image_ref.clone());
    app.messages.push(Message::user(&text, image_ref));
    app.is_thinking = true;

    info!(
        "Submitting message #{} (text_len={}, image={})",
        app.messages.len(),
        text.len(),
        image.is_some()
    );

    Effect::SendQuery(QueryRequest { query: text, image })
}
