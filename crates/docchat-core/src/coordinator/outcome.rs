//! Mapping service replies onto user-visible outcomes

use std::fmt;

use crate::error::ServiceError;
use crate::service::ServiceReply;

use super::state::{Family, Slot};

/// The three workflow operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Upload,
    Ask,
    Summary,
}

impl Operation {
    /// Body field holding the result on the success branch
    pub fn success_field(self) -> &'static str {
        match self {
            Operation::Upload => "message",
            Operation::Ask => "answer",
            Operation::Summary => "summary",
        }
    }

    /// Text shown when an error reply carries no `error` field
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Upload => "Upload failed",
            Operation::Ask => "Error getting answer",
            Operation::Summary => "Error getting summary",
        }
    }

    fn transport_prefix(self) -> &'static str {
        match self {
            Operation::Upload => "Upload error: ",
            Operation::Ask | Operation::Summary => "Error: ",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Operation::Upload => Family::Upload,
            Operation::Ask | Operation::Summary => Family::Inquiry,
        }
    }

    pub fn slot(self) -> Slot {
        match self {
            Operation::Upload => Slot::UploadStatus,
            Operation::Ask => Slot::Answer,
            Operation::Summary => Slot::Summary,
        }
    }

    /// Interpret the result of one exchange with the document service.
    ///
    /// The HTTP status picks the branch. A success body without its string
    /// field counts as a malformed response.
    pub fn interpret(self, result: Result<ServiceReply, ServiceError>) -> Outcome {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => return self.transport_failure(&err.to_string()),
        };

        if reply.is_success() {
            let field = self.success_field();
            match reply.str_field(field) {
                Some(text) => Outcome::Success(text.to_string()),
                None => self.transport_failure(&format!("missing `{}` field in response", field)),
            }
        } else {
            let message = reply
                .str_field("error")
                .unwrap_or_else(|| self.fallback_message())
                .to_string();
            Outcome::Rejected {
                status: reply.status,
                message,
            }
        }
    }

    fn transport_failure(self, cause: &str) -> Outcome {
        Outcome::TransportFailed(format!("{}{}", self.transport_prefix(), cause))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Upload => write!(f, "upload"),
            Operation::Ask => write!(f, "ask"),
            Operation::Summary => write!(f, "summary"),
        }
    }
}

/// How a request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx with the expected field
    Success(String),
    /// Non-2xx; `message` is the server error text or the fallback
    Rejected { status: u16, message: String },
    /// No structured result could be read
    TransportFailed(String),
}

impl Outcome {
    /// Text placed in the result slot
    pub fn message(&self) -> &str {
        match self {
            Outcome::Success(text) => text,
            Outcome::Rejected { message, .. } => message,
            Outcome::TransportFailed(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// What the coordinator did with an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Written into session state
    Applied(Outcome),
    /// Dropped because a newer request for the same slot was issued meanwhile
    Superseded(Outcome),
}

impl Resolution {
    pub fn outcome(&self) -> &Outcome {
        match self {
            Resolution::Applied(outcome) | Resolution::Superseded(outcome) => outcome,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Resolution::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u16, body: serde_json::Value) -> Result<ServiceReply, ServiceError> {
        Ok(ServiceReply::new(status, body))
    }

    #[test]
    fn test_success_uses_operation_field() {
        let outcome =
            Operation::Upload.interpret(reply(200, json!({"message": "Indexed 10 pages"})));
        assert_eq!(outcome, Outcome::Success("Indexed 10 pages".into()));

        let outcome = Operation::Ask.interpret(reply(
            200,
            json!({"question": "Who?", "answer": "The author"}),
        ));
        assert_eq!(outcome.message(), "The author");
    }

    #[test]
    fn test_error_field_used_verbatim() {
        let outcome =
            Operation::Summary.interpret(reply(400, json!({"error": "No document uploaded"})));
        assert_eq!(
            outcome,
            Outcome::Rejected {
                status: 400,
                message: "No document uploaded".into()
            }
        );
    }

    #[test]
    fn test_fallback_per_operation() {
        assert_eq!(
            Operation::Upload.interpret(reply(500, json!({}))).message(),
            "Upload failed"
        );
        assert_eq!(
            Operation::Ask.interpret(reply(500, json!({}))).message(),
            "Error getting answer"
        );
        assert_eq!(
            Operation::Summary.interpret(reply(503, json!({"error": null}))).message(),
            "Error getting summary"
        );
    }

    #[test]
    fn test_error_status_ignores_success_field() {
        let outcome = Operation::Ask.interpret(reply(404, json!({"answer": "stale"})));
        assert_eq!(outcome.message(), "Error getting answer");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_transport_failure_messages() {
        let err = ServiceError::Transport("connection refused".into());
        assert_eq!(
            Operation::Upload.interpret(Err(err.clone())),
            Outcome::TransportFailed("Upload error: connection refused".into())
        );
        assert_eq!(
            Operation::Ask.interpret(Err(err)).message(),
            "Error: connection refused"
        );
    }

    #[test]
    fn test_missing_success_field_is_malformed() {
        let outcome = Operation::Summary.interpret(reply(200, json!({"text": "nope"})));
        assert_eq!(
            outcome,
            Outcome::TransportFailed("Error: missing `summary` field in response".into())
        );
    }

    #[test]
    fn test_families_and_slots() {
        assert_eq!(Operation::Upload.family(), Family::Upload);
        assert_eq!(Operation::Ask.family(), Family::Inquiry);
        assert_eq!(Operation::Summary.family(), Family::Inquiry);
        assert_eq!(Operation::Summary.slot(), Slot::Summary);
    }
}
