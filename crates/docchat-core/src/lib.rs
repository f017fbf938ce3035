//! docchat core - client-side orchestration for a document chat service
//!
//! This crate provides the pieces behind the docchat workflow:
//! - Session state and the workflow coordinator (upload, ask, summary)
//! - The document service seam and its HTTP implementation
//! - Configuration loading and error types

pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod service;

pub use config::{defaults, Config, ConfigManager, CoordinatorConfig, ServiceConfig};
pub use coordinator::{
    Family, IntentResult, Operation, Outcome, Resolution, SessionState, WorkflowCoordinator,
};
pub use document::SelectedDocument;
pub use error::{Error, IntentError, Result, ServiceError};
pub use service::{DocumentService, HttpDocumentService, ServiceReply};
