//! Resource counters for a session: sanity, score and mistakes.

use case_rules::RuleConfig;
use serde::{Deserialize, Serialize};

/// Everything the player can gain or lose during an investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Clamped to `[0, max_sanity]`.
    pub sanity: i32,
    /// Unbounded, may go negative.
    pub score: i64,
    pub mistakes: u32,
    pub junk_disposed: u32,
    /// Real evidence thrown away; drives the progressive penalty.
    pub evidence_disposed: u32,
    /// Consecutive successful connections.
    pub streak: u32,
}

impl Ledger {
    /// Start a session with the given sanity.
    pub fn new(starting_sanity: i32, rules: &RuleConfig) -> Self {
        Self {
            sanity: rules.clamp_sanity(starting_sanity),
            score: 0,
            mistakes: 0,
            junk_disposed: 0,
            evidence_disposed: 0,
            streak: 0,
        }
    }

    /// Take sanity away. Returns how much was actually lost.
    pub fn lose_sanity(&mut self, amount: i32, rules: &RuleConfig) -> i32 {
        let before = self.sanity;
        self.sanity = rules.clamp_sanity(self.sanity - amount);
        before - self.sanity
    }

    /// Count a mistake and break the streak.
    pub fn record_mistake(&mut self) {
        self.mistakes += 1;
        self.streak = 0;
    }

    /// Points for a successful connection, including any streak bonus. Extends the streak.
    pub fn reward_connection(&mut self, base: i64, rules: &RuleConfig) -> i64 {
        let points = base + rules.streak_bonus * self.streak as i64;
        self.streak += 1;
        self.score += points;
        points
    }

    pub fn is_exhausted(&self) -> bool {
        self.sanity <= 0
    }
}
