//! Evidence definitions - the atomic pieces pinned to the corkboard.

mod card;

pub use card::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for evidence items.
///
/// Authored items carry a hand-written id; combination results without one
/// receive a generated id at spawn time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(pub String);

impl EvidenceId {
    /// Create an id from an authored string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh random id.
    pub fn generate() -> Self {
        Self(format!("evidence-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EvidenceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of evidence. Only affects how a card is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Photo,
    Document,
    #[default]
    Note,
    Object,
    Testimony,
}

/// A point on the corkboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point halfway between two positions.
    pub fn midpoint(&self, other: &Position) -> Position {
        Position {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Shift this position by the given delta.
    pub fn offset(&self, dx: f32, dy: f32) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A piece of evidence as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: EvidenceId,

    #[serde(default)]
    pub kind: EvidenceKind,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Tags matched by red (relational) threads.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Tags matched by blue (temporal) threads.
    #[serde(default)]
    pub timeline_tags: BTreeSet<String>,

    /// What this item contributes toward solving the case. Empty means junk.
    #[serde(default)]
    pub truth_tags: BTreeSet<String>,

    /// Legacy win marker, used only when a case defines no required tags.
    #[serde(default)]
    pub is_critical: bool,

    /// Content is inert until revealed under UV light.
    #[serde(default)]
    pub requires_uv: bool,

    #[serde(default)]
    pub hidden_text: Option<String>,

    #[serde(default)]
    pub position: Position,

    /// Used by blue threads to enforce chronological order.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl EvidenceItem {
    /// Create a new evidence item with the given id.
    pub fn new(id: impl Into<EvidenceId>) -> Self {
        Self {
            id: id.into(),
            kind: EvidenceKind::default(),
            title: String::new(),
            description: String::new(),
            tags: BTreeSet::new(),
            timeline_tags: BTreeSet::new(),
            truth_tags: BTreeSet::new(),
            is_critical: false,
            requires_uv: false,
            hidden_text: None,
            position: Position::default(),
            date: None,
        }
    }

    pub fn with_kind(mut self, kind: EvidenceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add relational tags.
    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add temporal tags.
    pub fn with_timeline_tags<S: Into<String>>(
        mut self,
        tags: impl IntoIterator<Item = S>,
    ) -> Self {
        self.timeline_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add truth tags.
    pub fn with_truth_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.truth_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.is_critical = critical;
        self
    }

    /// Hide this item's content behind the UV reveal.
    pub fn with_uv(mut self, hidden_text: Option<String>) -> Self {
        self.requires_uv = true;
        self.hidden_text = hidden_text;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// A red herring: contributes nothing to the truth.
    pub fn is_junk(&self) -> bool {
        self.truth_tags.is_empty()
    }

    /// Smallest relational tag shared with another item.
    pub fn shared_tag<'a>(&'a self, other: &'a EvidenceItem) -> Option<&'a str> {
        self.tags
            .intersection(&other.tags)
            .next()
            .map(String::as_str)
    }

    /// Smallest temporal tag shared with another item.
    pub fn shared_timeline_tag<'a>(&'a self, other: &'a EvidenceItem) -> Option<&'a str> {
        self.timeline_tags
            .intersection(&other.timeline_tags)
            .next()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junk_is_derived_from_truth_tags() {
        let junk = EvidenceItem::new("receipt").with_tags(["money"]);
        assert!(junk.is_junk());

        let mut real = junk.clone().with_truth_tags(["MOTIVE"]);
        assert!(!real.is_junk());

        real.truth_tags.clear();
        assert!(real.is_junk());
    }

    #[test]
    fn test_tags_deduplicate() {
        let item = EvidenceItem::new("a").with_tags(["x", "x", "y"]);
        assert_eq!(item.tags.len(), 2);
    }

    #[test]
    fn test_shared_tag_is_deterministic() {
        let a = EvidenceItem::new("a").with_tags(["zeta", "alpha", "mid"]);
        let b = EvidenceItem::new("b").with_tags(["mid", "zeta"]);
        assert_eq!(a.shared_tag(&b), Some("mid"));
        assert_eq!(a.shared_timeline_tag(&b), None);
    }

    #[test]
    fn test_timeline_tags_are_separate() {
        let a = EvidenceItem::new("a").with_timeline_tags(["night_of"]);
        let b = EvidenceItem::new("b")
            .with_tags(["night_of"])
            .with_timeline_tags(["night_of"]);
        assert_eq!(a.shared_tag(&b), None);
        assert_eq!(a.shared_timeline_tag(&b), Some("night_of"));
    }

    #[test]
    fn test_midpoint_and_offset() {
        let a = Position::new(0.0, 10.0);
        let b = Position::new(100.0, 30.0);
        let mid = a.midpoint(&b);
        assert_eq!(mid, Position::new(50.0, 20.0));
        assert_eq!(mid.offset(-5.0, 5.0), Position::new(45.0, 25.0));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(EvidenceId::generate(), EvidenceId::generate());
    }

    #[test]
    fn test_item_from_json_defaults() {
        let item: EvidenceItem = serde_json::from_str(
            r#"{ "id": "letter", "kind": "document", "tags": ["ink"], "date": "1987-03-14" }"#,
        )
        .unwrap();
        assert_eq!(item.id, EvidenceId::new("letter"));
        assert_eq!(item.kind, EvidenceKind::Document);
        assert!(item.is_junk());
        assert!(!item.requires_uv);
        assert_eq!(item.date, NaiveDate::from_ymd_opt(1987, 3, 14));
    }
}
