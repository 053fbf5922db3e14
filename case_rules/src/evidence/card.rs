//! Presentation wrapper for evidence pinned to the board.

use serde::{Deserialize, Serialize};

use super::EvidenceItem;

/// An evidence item plus the purely visual state the board renderer keeps.
///
/// The engine only ever reads and writes the embedded [`EvidenceItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCard {
    pub evidence: EvidenceItem,

    /// Tilt in degrees.
    #[serde(default)]
    pub rotation: f32,

    /// Play the spawn animation.
    #[serde(default)]
    pub is_new: bool,

    /// Play the rejection shake.
    #[serde(default)]
    pub is_shaking: bool,
}

impl BoardCard {
    /// Wrap an item with a rotation derived from its id, so cards keep a stable tilt.
    pub fn new(evidence: EvidenceItem) -> Self {
        let seed = evidence
            .id
            .as_str()
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let rotation = (seed % 7) as f32 - 3.0;
        Self {
            evidence,
            rotation,
            is_new: false,
            is_shaking: false,
        }
    }

    /// Wrap a freshly spawned combination result.
    pub fn spawned(evidence: EvidenceItem) -> Self {
        Self {
            is_new: true,
            ..Self::new(evidence)
        }
    }
}
