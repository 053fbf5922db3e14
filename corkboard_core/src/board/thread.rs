//! Threads - the edges pinned between two pieces of evidence.

use case_rules::EvidenceId;
use serde::{Deserialize, Serialize};

/// The two kinds of string a player can pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    /// Red string, matched on `tags`.
    Relational,
    /// Blue string, matched on `timeline_tags` and dates.
    Temporal,
}

impl std::fmt::Display for ThreadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadType::Relational => write!(f, "red"),
            ThreadType::Temporal => write!(f, "blue"),
        }
    }
}

/// An undirected thread. Endpoints are stored in sorted order so `a-b` and
/// `b-a` are the same connection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub a: EvidenceId,
    pub b: EvidenceId,
    pub thread: ThreadType,
}

impl Connection {
    pub fn new(x: EvidenceId, y: EvidenceId, thread: ThreadType) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self { a, b, thread }
    }

    /// Check if the given item is one of the endpoints.
    pub fn touches(&self, id: &EvidenceId) -> bool {
        &self.a == id || &self.b == id
    }
}
