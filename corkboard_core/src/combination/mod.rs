//! Combination - merging two pieces of evidence into something new.
//!
//! Recipes are looked up by id value, so items spawned by one combination
//! take part in later combinations exactly like authored items.

use case_rules::{find_recipe, CombinationRecipe, Difficulty, EvidenceId, EvidenceItem, RuleConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::board::Board;
use crate::events::Declined;

/// What happened when the player dropped one item onto another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombineOutcome {
    Combined {
        parents: (EvidenceId, EvidenceId),
        children: Vec<EvidenceId>,
        bonus: i64,
        /// Threads that were attached to the parents and are now gone.
        threads_cut: usize,
        unlock_text: Option<String>,
        difficulty: Option<Difficulty>,
    },
    /// These two don't go together. Free to try.
    NoRecipe,
    Declined(Declined),
}

/// Merge two live items using the matching recipe, if any.
///
/// Children are fully built before the board is touched, then the parents
/// and their threads are removed and the children pinned in one step. A
/// child whose authored id is still live on the board, or already taken by
/// a sibling, is pinned under a freshly generated id instead.
pub fn combine(
    board: &mut Board,
    a: &EvidenceId,
    b: &EvidenceId,
    recipes: &[CombinationRecipe],
    rules: &RuleConfig,
) -> CombineOutcome {
    let (Some(first), Some(second)) = (board.get(a), board.get(b)) else {
        return CombineOutcome::NoRecipe;
    };
    let Some(recipe) = find_recipe(recipes, a, b) else {
        return CombineOutcome::NoRecipe;
    };

    let mut children = spawn_children(first, second, recipe, rules.spawn_spacing);
    let mut taken: HashSet<EvidenceId> = HashSet::new();
    for child in &mut children {
        let live = board.contains(&child.id) && &child.id != a && &child.id != b;
        if live || taken.contains(&child.id) {
            let fresh = EvidenceId::generate();
            debug!(authored = %child.id, %fresh, "combination output id already in use");
            child.id = fresh;
        }
        taken.insert(child.id.clone());
    }

    let mut threads_cut = 0;
    for parent in [a, b] {
        if let Some((_, cut)) = board.remove_item(parent) {
            threads_cut += cut.len();
        }
    }
    let child_ids: Vec<EvidenceId> = children.iter().map(|c| c.id.clone()).collect();
    for child in children {
        board.insert_item(child);
    }

    CombineOutcome::Combined {
        parents: (a.clone(), b.clone()),
        children: child_ids,
        bonus: recipe.bonus_score.unwrap_or(rules.combination_bonus),
        threads_cut,
        unlock_text: recipe.unlock_text.clone(),
        difficulty: recipe.difficulty,
    }
}

/// Build the recipe's outputs. Each child inherits both parents' truth tags
/// and is placed around the parents' midpoint.
pub fn spawn_children(
    first: &EvidenceItem,
    second: &EvidenceItem,
    recipe: &CombinationRecipe,
    spacing: f32,
) -> Vec<EvidenceItem> {
    let inherited: BTreeSet<String> = first
        .truth_tags
        .union(&second.truth_tags)
        .cloned()
        .collect();
    let centre = first.position.midpoint(&second.position);
    let count = recipe.outputs.len();

    recipe
        .outputs
        .iter()
        .enumerate()
        .map(|(i, blueprint)| {
            let slot = i as f32 - (count as f32 - 1.0) / 2.0;
            blueprint.instantiate(&inherited, centre.offset(slot * spacing, 0.0))
        })
        .collect()
}
