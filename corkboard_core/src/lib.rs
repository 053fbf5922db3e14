//! # Corkboard Core
//!
//! The deduction engine behind the corkboard. This crate takes a case from
//! `case_rules`, keeps the evidence graph, and decides what every drag,
//! drop and discard means for the investigation.
//!
//! ## Core Components
//!
//! - **board**: Live evidence and the red/blue threads between them
//! - **connection**: Validates proposed threads (UV gate, chronology, shared tags)
//! - **combination**: Merges evidence via recipes, with truth-tag inheritance
//! - **cluster**: Connected components and the win condition
//! - **disposal**: Binning evidence and the bounded undo history
//! - **investigation**: The single owner of all session state
//!
//! ## Design Philosophy
//!
//! - **Synchronous**: Every call commits its state change and win check before returning
//! - **Declined, not failed**: Bad input yields an outcome code, never a panic or error
//! - **Event-Driven**: Presentation reacts to [`Feedback`] events; the engine never waits on it

pub mod board;
pub mod cluster;
pub mod combination;
pub mod connection;
pub mod disposal;
pub mod events;
pub mod investigation;
pub mod ledger;

pub use board::*;
pub use combination::CombineOutcome;
pub use connection::{ConnectOutcome, RevealState};
pub use disposal::{DisposeOutcome, UndoOutcome};
pub use events::*;
pub use investigation::*;
pub use ledger::*;
