//! Case definitions - the authored root input of an investigation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::evidence::{EvidenceId, EvidenceItem};
use crate::recipes::CombinationRecipe;
use crate::rules::RuleConfig;

/// Errors raised while reading or checking a case.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("failed to parse case TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse case JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("evidence id `{0}` is defined more than once")]
    DuplicateEvidence(EvidenceId),

    #[error("recipe combines `{0}` with itself")]
    SelfRecipe(EvidenceId),

    #[error("recipe for `{0}` + `{1}` has no outputs")]
    EmptyRecipe(EvidenceId, EvidenceId),

    #[error("recipe input `{0}` is neither initial evidence nor produced by another recipe")]
    UnknownRecipeInput(EvidenceId),

    #[error("recipe output `{0}` reuses the id of initial evidence")]
    OutputShadowsEvidence(EvidenceId),

    #[error("recipe output id `{0}` is produced more than once")]
    DuplicateOutput(EvidenceId),
}

fn default_sanity() -> i32 {
    100
}

/// A complete puzzle: the starting board, how items combine, and what the truth is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDefinition {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub briefing: String,

    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,

    #[serde(default)]
    pub recipes: Vec<CombinationRecipe>,

    /// Tags one cluster must cover to solve the case. Empty selects the
    /// legacy "all critical items connected" check.
    #[serde(default)]
    pub required_tags: BTreeSet<String>,

    #[serde(default = "default_sanity")]
    pub starting_sanity: i32,

    #[serde(default)]
    pub rules: Option<RuleConfig>,
}

impl CaseDefinition {
    /// Create an empty case.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            briefing: String::new(),
            evidence: Vec::new(),
            recipes: Vec::new(),
            required_tags: BTreeSet::new(),
            starting_sanity: default_sanity(),
            rules: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_evidence(mut self, item: EvidenceItem) -> Self {
        self.evidence.push(item);
        self
    }

    pub fn with_recipe(mut self, recipe: CombinationRecipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn with_required_tags<S: Into<String>>(
        mut self,
        tags: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_starting_sanity(mut self, sanity: i32) -> Self {
        self.starting_sanity = sanity;
        self
    }

    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Parse and validate a case from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, CaseError> {
        let case: CaseDefinition = toml::from_str(source)?;
        case.validate()?;
        Ok(case)
    }

    /// Parse and validate a case from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, CaseError> {
        let case: CaseDefinition = serde_json::from_str(source)?;
        case.validate()?;
        Ok(case)
    }

    /// The rule set in force: the case override, or the defaults.
    pub fn rules(&self) -> RuleConfig {
        self.rules.clone().unwrap_or_default()
    }

    /// Check the authored data is internally consistent.
    pub fn validate(&self) -> Result<(), CaseError> {
        let mut known: HashSet<&EvidenceId> = HashSet::new();
        for item in &self.evidence {
            if !known.insert(&item.id) {
                return Err(CaseError::DuplicateEvidence(item.id.clone()));
            }
        }

        // Every authored output id is unique across the case. Chained
        // combinations may consume another recipe's output.
        let mut outputs: HashSet<&EvidenceId> = HashSet::new();
        for output in self.recipes.iter().flat_map(|r| r.authored_output_ids()) {
            if known.contains(output) {
                return Err(CaseError::OutputShadowsEvidence(output.clone()));
            }
            if !outputs.insert(output) {
                return Err(CaseError::DuplicateOutput(output.clone()));
            }
        }
        known.extend(outputs);

        for recipe in &self.recipes {
            let (a, b) = &recipe.inputs;
            if a == b {
                return Err(CaseError::SelfRecipe(a.clone()));
            }
            if recipe.outputs.is_empty() {
                return Err(CaseError::EmptyRecipe(a.clone(), b.clone()));
            }
            for input in [a, b] {
                if !known.contains(input) {
                    return Err(CaseError::UnknownRecipeInput(input.clone()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::EvidenceBlueprint;
    use crate::rules::EvidencePenalty;

    const CASE_TOML: &str = r#"
        id = "the-lighthouse"
        title = "The Lighthouse Keeper"
        required_tags = ["truth", "final_piece"]
        starting_sanity = 80

        [[evidence]]
        id = "node-a"
        kind = "photo"
        truth_tags = ["dummy_a"]

        [[evidence]]
        id = "node-b"
        truth_tags = ["dummy_b"]
        requires_uv = true
        hidden_text = "the keeper lied"

        [[evidence]]
        id = "node-c"
        tags = ["lamp"]
        truth_tags = ["final_piece"]
        date = "1921-11-02"

        [[recipes]]
        inputs = ["node-a", "node-b"]
        unlock_text = "The photo fits the torn log page."
        difficulty = "medium"

        [[recipes.outputs]]
        id = "the-truth"
        tags = ["lamp"]
        truth_tags = ["truth"]

        [rules]
        mismatch_penalty = 5

        [rules.evidence_penalty]
        policy = "progressive"
        sanity = 20
        base = 100
        step = 100
        cap = 500
    "#;

    #[test]
    fn test_case_from_toml() {
        let case = CaseDefinition::from_toml_str(CASE_TOML).unwrap();

        assert_eq!(case.id, "the-lighthouse");
        assert_eq!(case.evidence.len(), 3);
        assert_eq!(case.starting_sanity, 80);
        assert!(case.evidence[1].requires_uv);
        assert!(case.evidence[2].date.is_some());
        assert_eq!(case.recipes[0].outputs[0].id, Some(EvidenceId::new("the-truth")));

        let rules = case.rules();
        assert_eq!(rules.mismatch_penalty, 5);
        assert_eq!(rules.evidence_penalty, EvidencePenalty::progressive());
        assert_eq!(rules.undo_cost, 20);
    }

    #[test]
    fn test_case_from_json() {
        let case = CaseDefinition::from_json_str(
            r#"{ "id": "j", "evidence": [{ "id": "x" }], "required_tags": ["A"] }"#,
        )
        .unwrap();
        assert_eq!(case.starting_sanity, 100);
        assert!(case.rules.is_none());
        assert!(case.required_tags.contains("A"));
    }

    #[test]
    fn test_duplicate_evidence_rejected() {
        let case = CaseDefinition::new("dup")
            .with_evidence(EvidenceItem::new("x"))
            .with_evidence(EvidenceItem::new("x"));
        assert!(matches!(case.validate(), Err(CaseError::DuplicateEvidence(id)) if id.as_str() == "x"));
    }

    #[test]
    fn test_recipe_checks() {
        let base = CaseDefinition::new("r")
            .with_evidence(EvidenceItem::new("a"))
            .with_evidence(EvidenceItem::new("b"));

        let self_recipe = base
            .clone()
            .with_recipe(CombinationRecipe::new("a", "a").with_output(EvidenceBlueprint::new("c")));
        assert!(matches!(self_recipe.validate(), Err(CaseError::SelfRecipe(_))));

        let empty = base.clone().with_recipe(CombinationRecipe::new("a", "b"));
        assert!(matches!(empty.validate(), Err(CaseError::EmptyRecipe(_, _))));

        let unknown = base
            .clone()
            .with_recipe(CombinationRecipe::new("a", "ghost").with_output(EvidenceBlueprint::new("c")));
        assert!(matches!(unknown.validate(), Err(CaseError::UnknownRecipeInput(id)) if id.as_str() == "ghost"));
    }

    #[test]
    fn test_chained_recipe_inputs_are_known() {
        let case = CaseDefinition::new("chain")
            .with_evidence(EvidenceItem::new("a"))
            .with_evidence(EvidenceItem::new("b"))
            .with_evidence(EvidenceItem::new("c"))
            .with_recipe(CombinationRecipe::new("a", "b").with_output(EvidenceBlueprint::new("ab")))
            .with_recipe(CombinationRecipe::new("ab", "c").with_output(EvidenceBlueprint::new("abc")));
        assert!(case.validate().is_ok());
    }

    #[test]
    fn test_output_may_not_reuse_evidence_id() {
        let case = CaseDefinition::new("shadow")
            .with_evidence(EvidenceItem::new("a"))
            .with_evidence(EvidenceItem::new("b"))
            .with_evidence(EvidenceItem::new("c"))
            .with_recipe(CombinationRecipe::new("a", "b").with_output(EvidenceBlueprint::new("c")));
        assert!(matches!(case.validate(), Err(CaseError::OutputShadowsEvidence(id)) if id.as_str() == "c"));
    }

    #[test]
    fn test_output_ids_are_unique() {
        let base = CaseDefinition::new("twins")
            .with_evidence(EvidenceItem::new("a"))
            .with_evidence(EvidenceItem::new("b"))
            .with_evidence(EvidenceItem::new("c"))
            .with_evidence(EvidenceItem::new("d"));

        let within = base.clone().with_recipe(
            CombinationRecipe::new("a", "b")
                .with_output(EvidenceBlueprint::new("twin"))
                .with_output(EvidenceBlueprint::new("twin")),
        );
        assert!(matches!(within.validate(), Err(CaseError::DuplicateOutput(id)) if id.as_str() == "twin"));

        let across = base
            .with_recipe(CombinationRecipe::new("a", "b").with_output(EvidenceBlueprint::new("twin")))
            .with_recipe(CombinationRecipe::new("c", "d").with_output(EvidenceBlueprint::new("twin")));
        assert!(matches!(across.validate(), Err(CaseError::DuplicateOutput(_))));
    }

    #[test]
    fn test_unnamed_outputs_never_collide() {
        let mut unnamed = EvidenceBlueprint::new("x");
        unnamed.id = None;
        let case = CaseDefinition::new("anon")
            .with_evidence(EvidenceItem::new("a"))
            .with_evidence(EvidenceItem::new("b"))
            .with_recipe(
                CombinationRecipe::new("a", "b")
                    .with_output(unnamed.clone())
                    .with_output(unnamed),
            );
        assert!(case.validate().is_ok());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = CaseDefinition::from_toml_str("id = ").unwrap_err();
        assert!(matches!(err, CaseError::Toml(_)));
        assert!(err.to_string().starts_with("failed to parse case TOML"));
    }
}
