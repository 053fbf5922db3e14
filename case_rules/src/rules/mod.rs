//! Tunable rules: rewards, penalties and the final score formula.

use serde::{Deserialize, Serialize};

/// How disposing of real evidence is punished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EvidencePenalty {
    /// Same cost every time.
    Flat { sanity: i32, score: i64 },

    /// Score cost grows with each evidence disposal: base, base + step, ... up to cap.
    /// Sanity cost stays flat.
    Progressive {
        sanity: i32,
        base: i64,
        step: i64,
        cap: i64,
    },
}

impl Default for EvidencePenalty {
    fn default() -> Self {
        EvidencePenalty::Flat {
            sanity: 20,
            score: 200,
        }
    }
}

impl EvidencePenalty {
    /// The usual progressive curve: 100, 200, 300, 400, 500.
    pub fn progressive() -> Self {
        EvidencePenalty::Progressive {
            sanity: 20,
            base: 100,
            step: 100,
            cap: 500,
        }
    }

    /// Sanity and score cost of the next disposal, given how many pieces of
    /// real evidence were already thrown away.
    pub fn cost(&self, prior_disposals: u32) -> (i32, i64) {
        match *self {
            EvidencePenalty::Flat { sanity, score } => (sanity, score),
            EvidencePenalty::Progressive {
                sanity,
                base,
                step,
                cap,
            } => {
                let score = base.saturating_add(step.saturating_mul(prior_disposals as i64));
                (sanity, score.min(cap))
            }
        }
    }
}

/// Coefficients of the score awarded when the case is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalScoreWeights {
    pub per_sanity: i64,
    pub per_junk_disposed: i64,
    pub per_mistake: i64,
}

impl Default for FinalScoreWeights {
    fn default() -> Self {
        Self {
            per_sanity: 10,
            per_junk_disposed: 50,
            per_mistake: 25,
        }
    }
}

impl FinalScoreWeights {
    /// `score + sanity * per_sanity + junk * per_junk_disposed - mistakes * per_mistake`
    pub fn final_score(&self, score: i64, sanity: i32, junk_disposed: u32, mistakes: u32) -> i64 {
        score + sanity as i64 * self.per_sanity + junk_disposed as i64 * self.per_junk_disposed
            - mistakes as i64 * self.per_mistake
    }
}

/// Every number the engine charges or awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Upper clamp for sanity.
    pub max_sanity: i32,

    pub relational_reward: i64,
    pub temporal_reward: i64,

    /// Added once per consecutive successful connection beyond the first. 0 disables streaks.
    pub streak_bonus: i64,

    pub mismatch_penalty: i32,
    pub wrong_order_penalty: i32,
    pub hidden_penalty: i32,

    pub junk_reward: i64,
    pub evidence_penalty: EvidencePenalty,

    pub undo_cost: i32,
    pub undo_capacity: usize,

    /// Used when a recipe does not name its own bonus.
    pub combination_bonus: i64,

    /// Horizontal gap between siblings spawned by one combination.
    pub spawn_spacing: f32,

    pub final_score: FinalScoreWeights,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_sanity: 100,
            relational_reward: 50,
            temporal_reward: 50,
            streak_bonus: 0,
            mismatch_penalty: 10,
            wrong_order_penalty: 10,
            hidden_penalty: 15,
            junk_reward: 100,
            evidence_penalty: EvidencePenalty::default(),
            undo_cost: 20,
            undo_capacity: 5,
            combination_bonus: 200,
            spawn_spacing: 60.0,
            final_score: FinalScoreWeights::default(),
        }
    }
}

impl RuleConfig {
    /// Load a rule set from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Keep sanity inside `[0, max_sanity]`.
    pub fn clamp_sanity(&self, sanity: i32) -> i32 {
        sanity.clamp(0, self.max_sanity.max(0))
    }
}
