//! Feedback events - what the engine tells the presentation layer after each call.
//!
//! Events are emitted after the state change has been committed. Animations,
//! sounds and scribble timeouts hang off them; game logic never waits on them.

use case_rules::EvidenceId;
use serde::{Deserialize, Serialize};

use crate::combination::CombineOutcome;
use crate::connection::ConnectOutcome;
use crate::disposal::{DisposeOutcome, UndoOutcome};

/// Why a call was ignored without any cost. These are caller mistakes, not
/// game events, and produce no feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declined {
    UnknownEvidence(EvidenceId),
    /// Both ends of a thread, or both halves of a combination, are the same item.
    SameItem,
    /// The case is already solved or lost.
    SessionOver,
}

/// One piece of feedback per completed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feedback {
    Connect(ConnectOutcome),
    Combine(CombineOutcome),
    Dispose(DisposeOutcome),
    Undo(UndoOutcome),
    Solved { final_score: i64 },
    Lost,
}

impl Feedback {
    /// Scribble text for the board.
    pub fn message(&self) -> String {
        match self {
            Feedback::Connect(outcome) => match outcome {
                ConnectOutcome::Connected { tag, points, .. } => {
                    format!("Connected: {} (+{})", tag.to_uppercase(), points)
                }
                ConnectOutcome::HiddenContent { .. } => {
                    "Something is written here you can't see...".to_string()
                }
                ConnectOutcome::WrongOrder { .. } => "That's not how it happened.".to_string(),
                ConnectOutcome::Mismatch { .. } => "No connection.".to_string(),
                ConnectOutcome::AlreadyConnected | ConnectOutcome::Declined(_) => String::new(),
            },
            Feedback::Combine(outcome) => match outcome {
                CombineOutcome::Combined {
                    unlock_text, bonus, ..
                } => match unlock_text {
                    Some(text) => format!("{} (+{})", text, bonus),
                    None => format!("Combined! (+{})", bonus),
                },
                CombineOutcome::NoRecipe => "These don't fit together.".to_string(),
                CombineOutcome::Declined(_) => String::new(),
            },
            Feedback::Dispose(outcome) => match outcome {
                DisposeOutcome::Junk { points, .. } => format!("Good riddance. (+{})", points),
                DisposeOutcome::Evidence { points_lost, .. } => {
                    format!("You needed that! (-{})", points_lost)
                }
                DisposeOutcome::Declined(_) => String::new(),
            },
            Feedback::Undo(outcome) => match outcome {
                UndoOutcome::Restored { sanity_cost, .. } => {
                    format!("Retrieved from the bin. (-{} sanity)", sanity_cost)
                }
                UndoOutcome::NothingToUndo => "Nothing to undo.".to_string(),
                UndoOutcome::InsufficientSanity { needed, .. } => {
                    format!("Too shaken to undo. ({} sanity needed)", needed)
                }
                UndoOutcome::Occupied { item } => {
                    format!("Something else already sits where {} was.", item)
                }
                UndoOutcome::Declined(_) => String::new(),
            },
            Feedback::Solved { final_score } => format!("CASE CLOSED. Final score: {}", final_score),
            Feedback::Lost => "You've lost your grip on the case.".to_string(),
        }
    }

    /// Whether this event marks a mistake the board should shake for.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Feedback::Connect(ConnectOutcome::HiddenContent { .. })
                | Feedback::Connect(ConnectOutcome::WrongOrder { .. })
                | Feedback::Connect(ConnectOutcome::Mismatch { .. })
                | Feedback::Dispose(DisposeOutcome::Evidence { .. })
                | Feedback::Undo(UndoOutcome::InsufficientSanity { .. })
                | Feedback::Lost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Connection, ThreadType};

    #[test]
    fn test_connect_message() {
        let feedback = Feedback::Connect(ConnectOutcome::Connected {
            connection: Connection::new("a".into(), "b".into(), ThreadType::Relational),
            tag: "knife".to_string(),
            points: 50,
        });
        assert_eq!(feedback.message(), "Connected: KNIFE (+50)");
        assert!(!feedback.is_warning());
    }

    #[test]
    fn test_combine_message_uses_unlock_text() {
        let feedback = Feedback::Combine(CombineOutcome::Combined {
            parents: ("a".into(), "b".into()),
            children: vec!["c".into()],
            bonus: 200,
            threads_cut: 0,
            unlock_text: Some("The pages line up.".to_string()),
            difficulty: None,
        });
        assert_eq!(feedback.message(), "The pages line up. (+200)");
    }

    #[test]
    fn test_warnings() {
        assert!(Feedback::Connect(ConnectOutcome::Mismatch { sanity_lost: 10 }).is_warning());
        assert!(Feedback::Lost.is_warning());
        assert!(!Feedback::Undo(UndoOutcome::NothingToUndo).is_warning());
    }

    #[test]
    fn test_occupied_undo_message() {
        let feedback = Feedback::Undo(UndoOutcome::Occupied { item: "letter".into() });
        assert_eq!(feedback.message(), "Something else already sits where letter was.");
        assert!(!feedback.is_warning());
    }
}
