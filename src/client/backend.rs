use std::fmt;

use async_trait::async_trait;

use super::types::QueryRequest;

/// Errors that can occur while asking the remote endpoint a question.
/// Every variant is recovered locally by the conversation with a fallback reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Client misconfigured (bad endpoint, invalid MIME type on an attachment).
    Config(String),
    /// Transport failure (DNS, connection refused, timeout, task died).
    Network(String),
    /// Endpoint answered with a non-success HTTP status.
    Api { status: u16, body: String },
    /// Success status, but the body was not JSON or lacked a `response` string.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Config(msg) => write!(f, "config error: {msg}"),
            ClientError::Network(msg) => write!(f, "network error: {msg}"),
            ClientError::Api { status, body } => {
                write!(f, "API error (HTTP {status}): {body}")
            }
            ClientError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Anything that can turn a [`QueryRequest`] into the bot's reply text.
///
/// The HTTP implementation lives in [`super::http`]; tests substitute fakes.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Sends one query and returns the `response` text of the answer.
    async fn query(&self, request: QueryRequest) -> Result<String, ClientError>;
}
