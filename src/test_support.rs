//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ClientError, QueryBackend, QueryRequest};
use crate::core::state::App;

/// A backend that answers every query with a canned result and records what it saw.
pub struct FakeBackend {
    reply: Result<String, ClientError>,
    seen: Mutex<Vec<QueryRequest>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn last_query(&self) -> Option<String> {
        self.seen
            .lock()
            .ok()
            .and_then(|seen| seen.last().map(|r| r.query.clone()))
    }
}

#[async_trait]
impl QueryBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn query(&self, request: QueryRequest) -> Result<String, ClientError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }
        self.reply.clone()
    }
}

/// Creates a signed-in test App.
pub fn test_app() -> App {
    let mut app = App::new("Test Bot".to_string());
    app.session.login();
    app
}
