//! HTTP query client.
//!
//! One `POST` per message to the configured endpoint, body encoded as
//! `multipart/form-data`:
//!
//! | field   | contents                                   |
//! |---------|--------------------------------------------|
//! | `query` | the typed text, possibly empty             |
//! | `image` | raw file bytes with file name + MIME type  |
//!
//! A success body must be a JSON object with a string `response` field.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};

use super::backend::{ClientError, QueryBackend};
use super::types::{QueryRequest, QueryResponse};

/// Query backend that talks to the remote endpoint over HTTP.
pub struct HttpQueryClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpQueryClient {
    /// Creates a client for `endpoint`. `timeout` of `None` waits forever.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Encodes a request as the multipart form the endpoint expects.
fn build_form(request: QueryRequest) -> Result<Form, ClientError> {
    let mut form = Form::new().text("query", request.query);

    if let Some(image) = request.image {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.image_ref.file_name.clone())
            .mime_str(&image.image_ref.mime)
            .map_err(|e| ClientError::Config(format!("invalid MIME type: {e}")))?;
        form = form.part("image", part);
    }

    Ok(form)
}

#[async_trait]
impl QueryBackend for HttpQueryClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn query(&self, request: QueryRequest) -> Result<String, ClientError> {
        info!(
            "Query request: endpoint={}, query_len={}, image={:?}",
            self.endpoint,
            request.query.len(),
            request.image.as_ref().map(|i| &i.image_ref.file_name)
        );

        let form = build_form(request)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Query response status: {status}");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Query endpoint error: {} - {}", status.as_u16(), body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let parsed: QueryResponse = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Query response was not usable: {e}");
            ClientError::Parse(e.to_string())
        })?;

        info!("Query answered: {} bytes of text", parsed.response.len());
        Ok(parsed.response)
    }
}
