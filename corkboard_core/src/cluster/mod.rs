//! Cluster evaluation - finding connected evidence and checking the win condition.
//!
//! Thread colour does not matter here: red and blue threads both join
//! clusters. A case is solved when one cluster's combined `tags` and
//! `truth_tags` cover every required tag. Cases without required tags fall
//! back to requiring every critical item in one cluster.

use case_rules::EvidenceId;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::board::Board;

/// A solved case, and the cluster that solved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub cluster: Vec<EvidenceId>,
}

fn adjacency(board: &Board) -> HashMap<&EvidenceId, Vec<&EvidenceId>> {
    let mut adjacency: HashMap<&EvidenceId, Vec<&EvidenceId>> = HashMap::new();
    for conn in board.connections() {
        adjacency.entry(&conn.a).or_default().push(&conn.b);
        adjacency.entry(&conn.b).or_default().push(&conn.a);
    }
    adjacency
}

fn reach<'a>(
    start: &'a EvidenceId,
    adjacency: &HashMap<&'a EvidenceId, Vec<&'a EvidenceId>>,
    visited: &mut HashSet<&'a EvidenceId>,
) -> Vec<EvidenceId> {
    let mut cluster = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited.insert(start);

    while let Some(id) = queue.pop_front() {
        cluster.push(id.clone());
        for next in adjacency.get(id).into_iter().flatten() {
            if visited.insert(*next) {
                queue.push_back(*next);
            }
        }
    }

    cluster.sort();
    cluster
}

/// Partition every live item into connected clusters. Loose items form
/// clusters of one. Clusters are ordered by their smallest id.
pub fn components(board: &Board) -> Vec<Vec<EvidenceId>> {
    let adjacency = adjacency(board);
    let mut visited = HashSet::new();
    let mut clusters = Vec::new();

    for id in board.ids() {
        if !visited.contains(id) {
            clusters.push(reach(id, &adjacency, &mut visited));
        }
    }

    clusters
}

/// Union of `tags` and `truth_tags` across a cluster.
pub fn component_tags(board: &Board, cluster: &[EvidenceId]) -> BTreeSet<String> {
    cluster
        .iter()
        .filter_map(|id| board.get(id))
        .flat_map(|item| item.tags.iter().chain(item.truth_tags.iter()))
        .cloned()
        .collect()
}

/// Check the win condition against the current board.
pub fn evaluate(board: &Board, required_tags: &BTreeSet<String>) -> Option<Solution> {
    if required_tags.is_empty() {
        return critical_cluster(board);
    }

    components(board)
        .into_iter()
        .find(|cluster| component_tags(board, cluster).is_superset(required_tags))
        .map(|cluster| Solution { cluster })
}

/// Legacy check: every critical item reachable from the first one.
/// With no critical items there is nothing to solve.
pub fn critical_cluster(board: &Board) -> Option<Solution> {
    let critical: Vec<&EvidenceId> = board
        .items()
        .filter(|item| item.is_critical)
        .map(|item| &item.id)
        .collect();
    let first = *critical.first()?;

    let adjacency = adjacency(board);
    let mut visited = HashSet::new();
    let cluster = reach(first, &adjacency, &mut visited);

    critical
        .iter()
        .all(|id| visited.contains(*id))
        .then_some(Solution { cluster })
}

/// How many required tags the best cluster covers.
pub fn best_coverage(board: &Board, required_tags: &BTreeSet<String>) -> usize {
    components(board)
        .iter()
        .map(|cluster| {
            component_tags(board, cluster)
                .intersection(required_tags)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Connection, ThreadType};
    use case_rules::EvidenceItem;

    fn required(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    fn link(board: &mut Board, a: &str, b: &str, thread: ThreadType) {
        assert!(board.connect(Connection::new(a.into(), b.into(), thread)));
    }

    fn three_clues() -> Board {
        let mut board = Board::new();
        board.insert_item(EvidenceItem::new("a").with_truth_tags(["SUBJECT"]));
        board.insert_item(EvidenceItem::new("b").with_truth_tags(["LOCATION"]));
        board.insert_item(EvidenceItem::new("c").with_truth_tags(["PROOF"]));
        board
    }

    #[test]
    fn test_components_include_loose_items() {
        let mut board = three_clues();
        link(&mut board, "a", "b", ThreadType::Relational);

        let clusters = components(&board);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0], vec![EvidenceId::new("a"), EvidenceId::new("b")]);
        assert_eq!(clusters[1], vec![EvidenceId::new("c")]);
    }

    #[test]
    fn test_connected_chain_wins() {
        let mut board = three_clues();
        link(&mut board, "a", "b", ThreadType::Relational);
        link(&mut board, "b", "c", ThreadType::Temporal);

        let solution = evaluate(&board, &required(&["SUBJECT", "LOCATION", "PROOF"]));
        assert_eq!(solution.map(|s| s.cluster.len()), Some(3));
    }

    #[test]
    fn test_disconnected_does_not_win() {
        let mut board = three_clues();
        link(&mut board, "a", "b", ThreadType::Relational);
        assert!(evaluate(&board, &required(&["SUBJECT", "LOCATION", "PROOF"])).is_none());
        assert_eq!(best_coverage(&board, &required(&["SUBJECT", "LOCATION", "PROOF"])), 2);
    }

    #[test]
    fn test_missing_tag_never_wins() {
        let mut board = three_clues();
        board.remove_item(&"c".into());
        link(&mut board, "a", "b", ThreadType::Relational);
        assert!(evaluate(&board, &required(&["SUBJECT", "LOCATION", "PROOF"])).is_none());
    }

    #[test]
    fn test_plain_tags_count_toward_coverage() {
        let mut board = Board::new();
        board.insert_item(EvidenceItem::new("a").with_tags(["MOTIVE"]));
        board.insert_item(EvidenceItem::new("b").with_truth_tags(["WEAPON"]));
        link(&mut board, "a", "b", ThreadType::Relational);

        assert!(evaluate(&board, &required(&["MOTIVE", "WEAPON"])).is_some());
    }

    #[test]
    fn test_single_item_can_cover_everything() {
        let mut board = Board::new();
        board.insert_item(EvidenceItem::new("confession").with_truth_tags(["WHO", "WHY"]));
        assert!(evaluate(&board, &required(&["WHO", "WHY"])).is_some());
    }

    #[test]
    fn test_legacy_critical_check() {
        let mut board = Board::new();
        board.insert_item(EvidenceItem::new("a").with_critical(true));
        board.insert_item(EvidenceItem::new("b"));
        board.insert_item(EvidenceItem::new("c").with_critical(true));
        let none = BTreeSet::new();

        assert!(evaluate(&board, &none).is_none());

        link(&mut board, "a", "b", ThreadType::Relational);
        assert!(evaluate(&board, &none).is_none());

        link(&mut board, "b", "c", ThreadType::Temporal);
        assert!(evaluate(&board, &none).is_some());
    }

    #[test]
    fn test_nothing_to_solve() {
        let board = three_clues();
        assert!(evaluate(&board, &BTreeSet::new()).is_none());
    }
}
