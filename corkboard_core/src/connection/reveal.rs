//! UV reveal state - which hidden evidence the player can currently read.

use case_rules::{EvidenceId, EvidenceItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevealState {
    /// UV lamp switched on for the whole board.
    global: bool,
    revealed: HashSet<EvidenceId>,
}

impl RevealState {
    pub fn set_global(&mut self, enabled: bool) {
        self.global = enabled;
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Reveal one item for the rest of the session. Returns false if it was already revealed.
    pub fn reveal(&mut self, id: EvidenceId) -> bool {
        self.revealed.insert(id)
    }

    /// Whether the item's content can take part in matching.
    pub fn is_visible(&self, item: &EvidenceItem) -> bool {
        !item.requires_uv || self.global || self.revealed.contains(&item.id)
    }

    /// Hidden text the player can read right now.
    pub fn readable_text<'a>(&self, item: &'a EvidenceItem) -> Option<&'a str> {
        if item.requires_uv && self.is_visible(item) {
            item.hidden_text.as_deref()
        } else {
            None
        }
    }
}
