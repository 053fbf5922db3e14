//! # Case Rules
//!
//! The "case book" crate - contains the evidence model, combination recipes,
//! case definitions and the tunable rule set for a Corkboard investigation.
//! This crate holds authored data only and does not contain any engine logic.

pub mod case_file;
pub mod evidence;
pub mod recipes;
pub mod rules;

pub use case_file::*;
pub use evidence::*;
pub use recipes::*;
pub use rules::*;
