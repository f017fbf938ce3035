//! Session state and request bookkeeping

use std::fmt;

use serde::Serialize;

use crate::document::SelectedDocument;

/// The state surface read by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Payload chosen by the user, kept until overwritten
    pub selected_document: Option<SelectedDocument>,
    /// Outcome of the last upload attempt
    pub upload_status: String,
    /// Question being composed
    pub current_question: String,
    pub last_answer: String,
    pub last_summary: String,
    /// An ask or summary request is outstanding
    pub busy: bool,
    /// An upload request is outstanding; never affects `busy`
    pub uploading: bool,
    /// Last local refusal, e.g. "Please type a question."
    pub notice: String,
}

impl SessionState {
    pub fn selected_document_name(&self) -> Option<&str> {
        self.selected_document.as_ref().map(|d| d.name.as_str())
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::UploadStatus => &mut self.upload_status,
            Slot::Answer => &mut self.last_answer,
            Slot::Summary => &mut self.last_summary,
        }
    }
}

/// Operations sharing one in-flight guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Upload,
    /// Ask and summary
    Inquiry,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Upload => write!(f, "upload"),
            Family::Inquiry => write!(f, "ask/summary"),
        }
    }
}

/// A result field with its own request sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    UploadStatus,
    Answer,
    Summary,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::UploadStatus, Slot::Answer, Slot::Summary];

    fn index(self) -> usize {
        match self {
            Slot::UploadStatus => 0,
            Slot::Answer => 1,
            Slot::Summary => 2,
        }
    }
}

/// Identity of an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub slot: Slot,
    pub seq: u64,
}

#[derive(Debug, Default, Clone, Copy)]
struct SlotTracker {
    /// Sequence number of the latest issued request
    issued: u64,
    /// The latest issued request has not resolved yet
    pending: bool,
}

/// Per-slot sequence counters
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    slots: [SlotTracker; 3],
}

impl Ledger {
    pub fn issue(&mut self, slot: Slot) -> Ticket {
        let tracker = &mut self.slots[slot.index()];
        tracker.issued += 1;
        tracker.pending = true;
        Ticket {
            slot,
            seq: tracker.issued,
        }
    }

    /// Mark the ticket resolved. Returns false if a newer request superseded it.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        let tracker = &mut self.slots[ticket.slot.index()];
        if ticket.seq != tracker.issued {
            return false;
        }
        tracker.pending = false;
        true
    }

    pub fn is_pending(&self, slot: Slot) -> bool {
        self.slots[slot.index()].pending
    }

    pub fn family_pending(&self, family: Family) -> bool {
        Slot::ALL
            .iter()
            .filter(|slot| slot_family(**slot) == family)
            .any(|slot| self.is_pending(*slot))
    }
}

fn slot_family(slot: Slot) -> Family {
    match slot {
        Slot::UploadStatus => Family::Upload,
        Slot::Answer | Slot::Summary => Family::Inquiry,
    }
}
