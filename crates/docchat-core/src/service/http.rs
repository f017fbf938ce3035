//! reqwest-backed document service client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::debug;

use super::{routes, DocumentService, ServiceReply, UPLOAD_FIELD};
use crate::config::ServiceConfig;
use crate::document::SelectedDocument;
use crate::error::ServiceError;

/// HTTP client for the document service
#[derive(Debug, Clone)]
pub struct HttpDocumentService {
    base_address: String,
    client: reqwest::Client,
}

impl HttpDocumentService {
    /// Build a client from service settings.
    ///
    /// `base_address` is expected to be normalized already (no trailing slash).
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            base_address: config.base_address.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_address, route)
    }

    async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ServiceReply, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(error_chain(&e)))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ServiceError::Transport(format!("Failed to read response: {}", error_chain(&e)))
        })?;

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ServiceError::Decode(format!("Response is not valid JSON: {}", e)))?;

        debug!(status, "document service replied");
        Ok(ServiceReply::new(status, body))
    }
}

/// Render an error with its whole source chain, e.g.
/// "error sending request for url (..): client error (Connect): Connection refused"
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn upload(&self, document: &SelectedDocument) -> Result<ServiceReply, ServiceError> {
        let part = Part::bytes(document.bytes.to_vec())
            .file_name(document.name.clone())
            .mime_str(&document.media_type)
            .map_err(|e| ServiceError::Transport(format!("Invalid media type: {}", e)))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(name = %document.name, bytes = document.len(), "uploading document");
        self.exchange(self.client.post(self.url(routes::UPLOAD)).multipart(form))
            .await
    }

    async fn ask(&self, question: &str) -> Result<ServiceReply, ServiceError> {
        debug!(chars = question.chars().count(), "asking question");
        self.exchange(
            self.client
                .post(self.url(routes::ASK))
                .json(&json!({ "question": question })),
        )
        .await
    }

    async fn summary(&self) -> Result<ServiceReply, ServiceError> {
        debug!("requesting summary");
        self.exchange(self.client.get(self.url(routes::SUMMARY))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1
                .as_deref()
                .map(|e| e as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "client error (Connect)",
                Some(Box::new(Layer("Connection refused", None))),
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "error sending request: client error (Connect): Connection refused"
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        let err = Layer("tcp connect error: refused", Some(Box::new(Layer("refused", None))));
        assert_eq!(error_chain(&err), "tcp connect error: refused");
    }
}
