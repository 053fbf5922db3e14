//! Disposal - throwing evidence in the bin, and fishing it back out.
//!
//! Binning junk is rewarded; binning real evidence costs sanity and score.
//! Undo restores the item and its threads, reverses the score effect and
//! counters of the disposal, then charges a flat sanity cost of its own.

mod undo;

pub use undo::*;

use case_rules::{EvidenceId, RuleConfig};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::events::Declined;
use crate::ledger::Ledger;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisposeOutcome {
    Junk {
        item: EvidenceId,
        points: i64,
    },
    Evidence {
        item: EvidenceId,
        sanity_lost: i32,
        points_lost: i64,
    },
    Declined(Declined),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UndoOutcome {
    Restored {
        item: EvidenceId,
        threads_restored: usize,
        sanity_cost: i32,
    },
    NothingToUndo,
    InsufficientSanity { needed: i32, available: i32 },
    /// Another live item holds the binned item's id. Nothing is charged.
    Occupied { item: EvidenceId },
    Declined(Declined),
}

/// Remove an item and apply the reward or penalty for it.
pub fn dispose(
    board: &mut Board,
    ledger: &mut Ledger,
    history: &mut UndoBuffer,
    rules: &RuleConfig,
    id: &EvidenceId,
) -> DisposeOutcome {
    let Some((item, connections)) = board.remove_item(id) else {
        return DisposeOutcome::Declined(Declined::UnknownEvidence(id.clone()));
    };

    // Critical items always count as evidence.
    let (outcome, charge) = if item.is_junk() && !item.is_critical {
        ledger.score += rules.junk_reward;
        ledger.junk_disposed += 1;
        (
            DisposeOutcome::Junk {
                item: id.clone(),
                points: rules.junk_reward,
            },
            DisposalCharge::Junk {
                points: rules.junk_reward,
            },
        )
    } else {
        let (sanity, points) = rules.evidence_penalty.cost(ledger.evidence_disposed);
        let sanity_lost = ledger.lose_sanity(sanity, rules);
        ledger.score -= points;
        ledger.record_mistake();
        ledger.evidence_disposed += 1;
        (
            DisposeOutcome::Evidence {
                item: id.clone(),
                sanity_lost,
                points_lost: points,
            },
            DisposalCharge::Evidence {
                points,
                sanity: sanity_lost,
            },
        )
    };

    history.push(DisposalRecord {
        item,
        connections,
        charge,
    });
    outcome
}

/// Take back the most recent disposal, if sanity allows.
pub fn undo(
    board: &mut Board,
    ledger: &mut Ledger,
    history: &mut UndoBuffer,
    rules: &RuleConfig,
) -> UndoOutcome {
    let Some(latest) = history.peek() else {
        return UndoOutcome::NothingToUndo;
    };
    if board.contains(&latest.item.id) {
        return UndoOutcome::Occupied {
            item: latest.item.id.clone(),
        };
    }
    if ledger.sanity < rules.undo_cost {
        return UndoOutcome::InsufficientSanity {
            needed: rules.undo_cost,
            available: ledger.sanity,
        };
    }
    let Some(record) = history.pop() else {
        return UndoOutcome::NothingToUndo;
    };

    match record.charge {
        DisposalCharge::Junk { points } => {
            ledger.score -= points;
            ledger.junk_disposed = ledger.junk_disposed.saturating_sub(1);
        }
        DisposalCharge::Evidence { points, .. } => {
            ledger.score += points;
            ledger.mistakes = ledger.mistakes.saturating_sub(1);
            ledger.evidence_disposed = ledger.evidence_disposed.saturating_sub(1);
        }
    }

    let id = record.item.id.clone();
    board.insert_item(record.item);
    // Threads to items that have since left the board stay gone.
    let threads_restored = record
        .connections
        .into_iter()
        .filter(|conn| board.connect(conn.clone()))
        .count();

    let sanity_cost = ledger.lose_sanity(rules.undo_cost, rules);

    UndoOutcome::Restored {
        item: id,
        threads_restored,
        sanity_cost,
    }
}
