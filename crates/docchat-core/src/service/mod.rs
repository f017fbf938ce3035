//! Document service seam
//!
//! The coordinator talks to the remote document service through the
//! [`DocumentService`] trait. Implementations only move bytes: they report the
//! HTTP status and the JSON body, and leave interpretation to the coordinator.

mod http;

pub use http::HttpDocumentService;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::SelectedDocument;
use crate::error::ServiceError;

/// Route paths on the document service
pub mod routes {
    pub const UPLOAD: &str = "/upload-pdf";
    pub const ASK: &str = "/ask-question";
    pub const SUMMARY: &str = "/summary";
}

/// Multipart field name carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

/// A structured reply: the HTTP status and the body parsed as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: Value,
}

impl ServiceReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 2xx statuses take the success branch
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A string field of the body, if present
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }
}

/// Transport to the document service
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// POST the document as multipart form content under [`UPLOAD_FIELD`]
    async fn upload(&self, document: &SelectedDocument) -> Result<ServiceReply, ServiceError>;

    /// POST `{ "question": ... }` as JSON
    async fn ask(&self, question: &str) -> Result<ServiceReply, ServiceError>;

    /// GET the summary of the previously uploaded document
    async fn summary(&self) -> Result<ServiceReply, ServiceError>;
}
