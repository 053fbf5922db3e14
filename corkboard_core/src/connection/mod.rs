//! Connection validation - deciding whether a thread may be pinned.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. **Duplicate**: a thread of this colour already joins the pair
//! 2. **UV gate**: an endpoint's content is still hidden
//! 3. **Chronology**: blue threads must run from earlier to later
//! 4. **Semantics**: the pair must share a tag of the thread's kind

mod reveal;

pub use reveal::*;

use case_rules::EvidenceItem;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Connection, ThreadType};
use crate::events::Declined;

/// Result of judging a proposed thread, before any cost is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Duplicate,
    Hidden(case_rules::EvidenceId),
    WrongOrder,
    Mismatch,
    Match(String),
}

/// What happened when the player tried to pin a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectOutcome {
    Connected {
        connection: Connection,
        tag: String,
        points: i64,
    },
    /// An endpoint needs UV light first.
    HiddenContent {
        item: case_rules::EvidenceId,
        sanity_lost: i32,
    },
    /// Blue thread pinned from a later item to an earlier one.
    WrongOrder { sanity_lost: i32 },
    Mismatch { sanity_lost: i32 },
    /// Already joined by this colour; nothing happens.
    AlreadyConnected,
    Declined(Declined),
}

impl ConnectOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectOutcome::Connected { .. })
    }
}

/// Judge a thread between two live items.
pub fn judge(
    board: &Board,
    reveal: &RevealState,
    source: &EvidenceItem,
    target: &EvidenceItem,
    thread: ThreadType,
) -> Verdict {
    if board.has_connection(&source.id, &target.id, thread) {
        return Verdict::Duplicate;
    }

    for item in [source, target] {
        if !reveal.is_visible(item) {
            return Verdict::Hidden(item.id.clone());
        }
    }

    if thread == ThreadType::Temporal {
        if let (Some(from), Some(to)) = (source.date, target.date) {
            if from > to {
                return Verdict::WrongOrder;
            }
        }
    }

    let shared = match thread {
        ThreadType::Relational => source.shared_tag(target),
        ThreadType::Temporal => source.shared_timeline_tag(target),
    };

    match shared {
        Some(tag) => Verdict::Match(tag.to_string()),
        None => Verdict::Mismatch,
    }
}
