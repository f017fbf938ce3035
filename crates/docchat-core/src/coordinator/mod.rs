//! Workflow coordinator
//!
//! Owns the session state, turns user intents into document service requests
//! and folds every reply (or transport failure) back into the state surface.
//!
//! Intent handlers take `&self`, so the presentation layer can keep editing the
//! question or picking a new document while a request is outstanding. The state
//! lock is never held across an `.await`.

mod outcome;
mod state;

pub use outcome::{Operation, Outcome, Resolution};
pub use state::{Family, SessionState, Slot};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{Config, CoordinatorConfig};
use crate::document::SelectedDocument;
use crate::error::{IntentError, Result, ServiceError};
use crate::service::{DocumentService, HttpDocumentService, ServiceReply};
use state::{Ledger, Ticket};

/// Result of an intent handler: a resolution, or a local refusal
pub type IntentResult = std::result::Result<Resolution, IntentError>;

struct Inner {
    state: SessionState,
    ledger: Ledger,
}

impl Inner {
    fn refresh_flags(&mut self) {
        self.state.busy = self.ledger.family_pending(Family::Inquiry);
        self.state.uploading = self.ledger.family_pending(Family::Upload);
    }
}

/// Coordinates upload, ask and summary requests against a document service
pub struct WorkflowCoordinator {
    service: Arc<dyn DocumentService>,
    exclusive: bool,
    inner: Mutex<Inner>,
    updates: watch::Sender<SessionState>,
}

impl WorkflowCoordinator {
    pub fn new(service: Arc<dyn DocumentService>, config: &CoordinatorConfig) -> Self {
        let (updates, _) = watch::channel(SessionState::default());
        Self {
            service,
            exclusive: config.exclusive,
            inner: Mutex::new(Inner {
                state: SessionState::default(),
                ledger: Ledger::default(),
            }),
            updates,
        }
    }

    /// Build a coordinator talking HTTP to the configured base address
    pub fn from_config(config: &Config) -> Result<Self> {
        let service = HttpDocumentService::new(&config.service)?;
        info!(base_address = %service.base_address(), "document service configured");
        Ok(Self::new(Arc::new(service), &config.coordinator))
    }

    /// Point-in-time copy of the session state
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Store a document for the next upload. No validation, no request.
    pub fn select_document(&self, document: SelectedDocument) {
        let mut inner = self.inner.lock();
        debug!(name = %document.name, media_type = %document.media_type, "document selected");
        inner.state.selected_document = Some(document);
        self.publish(&inner);
    }

    /// Update the question being composed
    pub fn set_question(&self, question: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.state.current_question = question.into();
        self.publish(&inner);
    }

    /// Upload the selected document.
    ///
    /// Clears the upload status before the request and never touches `busy`.
    pub async fn submit_document(&self) -> IntentResult {
        let (in_flight, document) = {
            let mut inner = self.inner.lock();
            let Some(document) = inner.state.selected_document.clone() else {
                return Err(self.refuse(&mut inner, IntentError::NoDocumentSelected));
            };
            self.guard(&mut inner, Operation::Upload)?;

            inner.state.upload_status.clear();
            let pending = self.issue(&mut inner, Operation::Upload);
            (pending, document)
        };

        let result = self.service.upload(&document).await;
        Ok(self.resolve(in_flight, result))
    }

    /// Ask the current question about the uploaded document
    pub async fn submit_question(&self) -> IntentResult {
        let (in_flight, question) = {
            let mut inner = self.inner.lock();
            if inner.state.current_question.is_empty() {
                return Err(self.refuse(&mut inner, IntentError::EmptyQuestion));
            }
            self.guard(&mut inner, Operation::Ask)?;

            inner.state.last_answer.clear();
            let question = inner.state.current_question.clone();
            let pending = self.issue(&mut inner, Operation::Ask);
            (pending, question)
        };

        let result = self.service.ask(&question).await;
        Ok(self.resolve(in_flight, result))
    }

    /// Request a summary of the document the service holds
    pub async fn request_summary(&self) -> IntentResult {
        let in_flight = {
            let mut inner = self.inner.lock();
            self.guard(&mut inner, Operation::Summary)?;

            inner.state.last_summary.clear();
            self.issue(&mut inner, Operation::Summary)
        };

        let result = self.service.summary().await;
        Ok(self.resolve(in_flight, result))
    }

    fn guard(
        &self,
        inner: &mut Inner,
        operation: Operation,
    ) -> std::result::Result<(), IntentError> {
        let family = operation.family();
        if self.exclusive && inner.ledger.family_pending(family) {
            return Err(self.refuse(inner, IntentError::RequestInFlight(family)));
        }
        inner.state.notice.clear();
        Ok(())
    }

    fn refuse(&self, inner: &mut Inner, error: IntentError) -> IntentError {
        warn!(%error, "intent refused");
        inner.state.notice = error.to_string();
        self.publish(inner);
        error
    }

    fn issue(&self, inner: &mut Inner, operation: Operation) -> InFlight<'_> {
        let ticket = inner.ledger.issue(operation.slot());
        inner.refresh_flags();
        debug!(%operation, seq = ticket.seq, "request issued");
        self.publish(inner);
        InFlight {
            coordinator: self,
            operation,
            ticket: Some(ticket),
        }
    }

    fn resolve(
        &self,
        mut in_flight: InFlight<'_>,
        result: std::result::Result<ServiceReply, ServiceError>,
    ) -> Resolution {
        let operation = in_flight.operation;
        let outcome = operation.interpret(result);
        let mut inner = self.inner.lock();
        let Some(ticket) = in_flight.ticket.take() else {
            return Resolution::Superseded(outcome);
        };

        if !inner.ledger.settle(ticket) {
            warn!(%operation, seq = ticket.seq, "discarding superseded result");
            return Resolution::Superseded(outcome);
        }

        match &outcome {
            Outcome::Success(_) => info!(%operation, "request succeeded"),
            Outcome::Rejected { status, message } => {
                info!(%operation, status, %message, "request rejected by service")
            }
            Outcome::TransportFailed(message) => warn!(%operation, %message, "transport failure"),
        }

        *inner.state.slot_mut(ticket.slot) = outcome.message().to_string();
        inner.refresh_flags();
        self.publish(&inner);
        Resolution::Applied(outcome)
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.state.clone());
    }
}

/// An issued request. Settles its ticket on drop if the intent future is
/// dropped before the reply arrives, leaving the slot text untouched.
struct InFlight<'a> {
    coordinator: &'a WorkflowCoordinator,
    operation: Operation,
    ticket: Option<Ticket>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        let mut inner = self.coordinator.inner.lock();
        if inner.ledger.settle(ticket) {
            debug!(operation = %self.operation, seq = ticket.seq, "request abandoned");
            inner.refresh_flags();
            self.coordinator.publish(&inner);
        }
    }
}
