//! Combination recipes - authored rules for merging two pieces of evidence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::evidence::{EvidenceId, EvidenceItem, EvidenceKind, Position};

/// Template for an item produced by a combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceBlueprint {
    /// Generated at spawn time when omitted.
    #[serde(default)]
    pub id: Option<EvidenceId>,

    #[serde(default)]
    pub kind: EvidenceKind,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub timeline_tags: BTreeSet<String>,

    #[serde(default)]
    pub truth_tags: BTreeSet<String>,

    #[serde(default)]
    pub is_critical: bool,

    #[serde(default)]
    pub requires_uv: bool,

    #[serde(default)]
    pub hidden_text: Option<String>,

    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,
}

impl EvidenceBlueprint {
    /// Blueprint for an item with a fixed id.
    pub fn new(id: impl Into<EvidenceId>) -> Self {
        Self::from_item(EvidenceItem::new(id))
    }

    /// Use an existing item as the template, keeping its id.
    pub fn from_item(item: EvidenceItem) -> Self {
        Self {
            id: Some(item.id),
            kind: item.kind,
            title: item.title,
            description: item.description,
            tags: item.tags,
            timeline_tags: item.timeline_tags,
            truth_tags: item.truth_tags,
            is_critical: item.is_critical,
            requires_uv: item.requires_uv,
            hidden_text: item.hidden_text,
            date: item.date,
        }
    }

    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_truth_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.truth_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Build the live item. Its truth tags are the inherited set plus the
    /// blueprint's own; every other field is taken verbatim.
    pub fn instantiate(&self, inherited: &BTreeSet<String>, position: Position) -> EvidenceItem {
        let mut truth_tags = inherited.clone();
        truth_tags.extend(self.truth_tags.iter().cloned());

        EvidenceItem {
            id: self.id.clone().unwrap_or_else(EvidenceId::generate),
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            timeline_tags: self.timeline_tags.clone(),
            truth_tags,
            is_critical: self.is_critical,
            requires_uv: self.requires_uv,
            hidden_text: self.hidden_text.clone(),
            position,
            date: self.date,
        }
    }
}

/// Difficulty label shown when a combination is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Merges an unordered pair of items into one or more new items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRecipe {
    pub inputs: (EvidenceId, EvidenceId),

    pub outputs: Vec<EvidenceBlueprint>,

    #[serde(default)]
    pub unlock_text: Option<String>,

    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// Falls back to the rule set's combination bonus when absent.
    #[serde(default)]
    pub bonus_score: Option<i64>,
}

impl CombinationRecipe {
    /// Create a recipe with no outputs yet.
    pub fn new(a: impl Into<EvidenceId>, b: impl Into<EvidenceId>) -> Self {
        Self {
            inputs: (a.into(), b.into()),
            outputs: Vec::new(),
            unlock_text: None,
            difficulty: None,
            bonus_score: None,
        }
    }

    pub fn with_output(mut self, output: EvidenceBlueprint) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_unlock_text(mut self, text: impl Into<String>) -> Self {
        self.unlock_text = Some(text.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_bonus_score(mut self, bonus: i64) -> Self {
        self.bonus_score = Some(bonus);
        self
    }

    /// Check if this recipe takes exactly this pair, in either order.
    pub fn matches(&self, a: &EvidenceId, b: &EvidenceId) -> bool {
        let (x, y) = &self.inputs;
        (x == a && y == b) || (x == b && y == a)
    }

    /// Check if the item is one of this recipe's inputs.
    pub fn consumes(&self, id: &EvidenceId) -> bool {
        &self.inputs.0 == id || &self.inputs.1 == id
    }

    /// Ids of outputs that were authored with a fixed id.
    pub fn authored_output_ids(&self) -> impl Iterator<Item = &EvidenceId> {
        self.outputs.iter().filter_map(|o| o.id.as_ref())
    }
}

/// Find the recipe for a pair, looked up by id value.
pub fn find_recipe<'a>(
    recipes: &'a [CombinationRecipe],
    a: &EvidenceId,
    b: &EvidenceId,
) -> Option<&'a CombinationRecipe> {
    recipes.iter().find(|r| r.matches(a, b))
}
