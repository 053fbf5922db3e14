//! Bounded history of disposals that can still be taken back.

use case_rules::EvidenceItem;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::board::Connection;

/// What a disposal charged or awarded, so undo can reverse exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisposalCharge {
    Junk { points: i64 },
    /// Sanity is recorded for reporting only; undo never gives it back.
    Evidence { points: i64, sanity: i32 },
}

/// Snapshot of one disposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalRecord {
    pub item: EvidenceItem,
    pub connections: Vec<Connection>,
    pub charge: DisposalCharge,
}

/// Most recent disposals, newest last. The oldest is evicted when full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoBuffer {
    records: VecDeque<DisposalRecord>,
    capacity: usize,
}

impl UndoBuffer {
    /// Capacity is at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: DisposalRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn pop(&mut self) -> Option<DisposalRecord> {
        self.records.pop_back()
    }

    pub fn peek(&self) -> Option<&DisposalRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
