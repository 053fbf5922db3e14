//! The board - live evidence and the threads between them.
//!
//! Every thread's endpoints are live items: removing an item removes its
//! threads in the same call.

mod thread;

pub use thread::*;

use case_rules::{BoardCard, EvidenceId, EvidenceItem};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The mutable evidence graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    items: BTreeMap<EvidenceId, EvidenceItem>,
    connections: BTreeSet<Connection>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin an item. Returns false, leaving the board untouched, if the id is already live.
    pub fn insert_item(&mut self, item: EvidenceItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.insert(item.id.clone(), item);
        true
    }

    /// Take an item off the board along with every thread touching it.
    pub fn remove_item(&mut self, id: &EvidenceId) -> Option<(EvidenceItem, Vec<Connection>)> {
        let item = self.items.remove(id)?;
        let incident: Vec<Connection> = self
            .connections
            .iter()
            .filter(|c| c.touches(id))
            .cloned()
            .collect();
        for conn in &incident {
            self.connections.remove(conn);
        }
        Some((item, incident))
    }

    pub fn get(&self, id: &EvidenceId) -> Option<&EvidenceItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &EvidenceId) -> bool {
        self.items.contains_key(id)
    }

    /// Add a thread. Returns false if an endpoint is missing or the thread already exists.
    pub fn connect(&mut self, connection: Connection) -> bool {
        if !self.contains(&connection.a) || !self.contains(&connection.b) {
            return false;
        }
        self.connections.insert(connection)
    }

    /// Check for a thread of this type between the pair, in either direction.
    pub fn has_connection(&self, x: &EvidenceId, y: &EvidenceId, thread: ThreadType) -> bool {
        self.connections
            .contains(&Connection::new(x.clone(), y.clone(), thread))
    }

    pub fn items(&self) -> impl Iterator<Item = &EvidenceItem> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EvidenceId> {
        self.items.keys()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Copy of the current graph for the renderer.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            items: self.items.values().cloned().collect(),
            connections: self.connections.iter().cloned().collect(),
        }
    }
}

/// Read-only copy of the board handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub items: Vec<EvidenceItem>,
    pub connections: Vec<Connection>,
}

impl BoardSnapshot {
    /// Wrap every item in a card for drawing. Items listed in `fresh` get the spawn animation.
    pub fn cards(&self, fresh: &[EvidenceId]) -> Vec<BoardCard> {
        self.items
            .iter()
            .cloned()
            .map(|item| {
                if fresh.contains(&item.id) {
                    BoardCard::spawned(item)
                } else {
                    BoardCard::new(item)
                }
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(ids: &[&str]) -> Board {
        let mut board = Board::new();
        for id in ids {
            board.insert_item(EvidenceItem::new(*id));
        }
        board
    }

    #[test]
    fn test_connect_requires_live_endpoints() {
        let mut board = board_with(&["a", "b"]);
        assert!(board.connect(Connection::new("a".into(), "b".into(), ThreadType::Relational)));
        assert!(!board.connect(Connection::new("a".into(), "ghost".into(), ThreadType::Relational)));
        assert_eq!(board.connection_count(), 1);
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut board = board_with(&["a", "b"]);
        assert!(board.connect(Connection::new("a".into(), "b".into(), ThreadType::Relational)));
        assert!(!board.connect(Connection::new("b".into(), "a".into(), ThreadType::Relational)));
        assert!(board.connect(Connection::new("b".into(), "a".into(), ThreadType::Temporal)));
        assert_eq!(board.connection_count(), 2);
        assert!(board.has_connection(&"b".into(), &"a".into(), ThreadType::Relational));
    }

    #[test]
    fn test_remove_item_drops_incident_threads() {
        let mut board = board_with(&["a", "b", "c"]);
        board.connect(Connection::new("a".into(), "b".into(), ThreadType::Relational));
        board.connect(Connection::new("b".into(), "c".into(), ThreadType::Temporal));
        board.connect(Connection::new("a".into(), "c".into(), ThreadType::Relational));

        let (item, removed) = board.remove_item(&"b".into()).unwrap();

        assert_eq!(item.id.as_str(), "b");
        assert_eq!(removed.len(), 2);
        assert_eq!(board.connection_count(), 1);
        assert!(board.connections().all(|c| !c.touches(&"b".into())));
        assert!(board.remove_item(&"b".into()).is_none());
    }

    #[test]
    fn test_insert_never_replaces_live_item() {
        let mut board = board_with(&["a", "b"]);
        board.connect(Connection::new("a".into(), "b".into(), ThreadType::Relational));

        assert!(!board.insert_item(EvidenceItem::new("a").with_truth_tags(["IMPOSTER"])));

        assert_eq!(board.item_count(), 2);
        assert!(board.get(&"a".into()).unwrap().truth_tags.is_empty());
        assert_eq!(board.connection_count(), 1);
        assert!(board.insert_item(EvidenceItem::new("c")));
    }

    #[test]
    fn test_snapshot_cards_and_json() {
        let mut board = board_with(&["a", "b"]);
        board.connect(Connection::new("a".into(), "b".into(), ThreadType::Relational));

        let snapshot = board.snapshot();
        let cards = snapshot.cards(&["b".into()]);
        assert_eq!(cards.len(), 2);
        assert!(!cards[0].is_new);
        assert!(cards[1].is_new);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"relational\""));
    }
}
