//! The investigation - single owner of all mutable engine state.
//!
//! Every public call runs to completion, including the win check, before it
//! returns. Callers on a multi-threaded host must serialise all calls behind
//! one lock.

use case_rules::{CaseDefinition, CaseError, EvidenceId, RuleConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, BoardSnapshot, Connection, ThreadType};
use crate::cluster;
use crate::combination::{self, CombineOutcome};
use crate::connection::{self, ConnectOutcome, RevealState, Verdict};
use crate::disposal::{self, DisposeOutcome, UndoBuffer, UndoOutcome};
use crate::events::{Declined, Feedback};
use crate::ledger::Ledger;

/// Where the session stands. Solved and lost are both final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Solved { final_score: i64 },
    Lost,
}

/// Summary for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub sanity: i32,
    pub score: i64,
    pub mistakes: u32,
    pub junk_disposed: u32,
    pub state: SessionState,
    /// Required tags covered by the best cluster so far.
    pub progress: usize,
    pub required: usize,
    pub undo_available: usize,
    /// UV lamp switched on for the whole board.
    pub uv_mode: bool,
}

#[derive(Debug, Clone)]
pub struct Investigation {
    case: CaseDefinition,
    rules: RuleConfig,
    board: Board,
    ledger: Ledger,
    reveal: RevealState,
    history: UndoBuffer,
    state: SessionState,
    winning_cluster: Vec<EvidenceId>,
    feedback: Vec<Feedback>,
}

impl Investigation {
    /// Start an investigation of the given case.
    pub fn new(case: CaseDefinition) -> Result<Self, CaseError> {
        case.validate()?;
        Ok(Self::start(case))
    }

    /// Build fresh state for a case that has already been validated.
    fn start(case: CaseDefinition) -> Self {
        let rules = case.rules();
        let mut board = Board::new();
        for item in &case.evidence {
            board.insert_item(item.clone());
        }

        info!(
            case = %case.id,
            evidence = case.evidence.len(),
            recipes = case.recipes.len(),
            required_tags = case.required_tags.len(),
            "case loaded"
        );

        Self {
            ledger: Ledger::new(case.starting_sanity, &rules),
            history: UndoBuffer::new(rules.undo_capacity),
            reveal: RevealState::default(),
            state: SessionState::Active,
            winning_cluster: Vec::new(),
            feedback: Vec::new(),
            board,
            rules,
            case,
        }
    }

    /// Throw away all state and start the given case.
    pub fn load_case(&mut self, case: CaseDefinition) -> Result<(), CaseError> {
        *self = Self::new(case)?;
        Ok(())
    }

    /// Start the current case over.
    pub fn reset(&mut self) {
        *self = Self::start(self.case.clone());
    }

    /// Pin a thread between two items.
    pub fn attempt_connect(
        &mut self,
        source: &EvidenceId,
        target: &EvidenceId,
        thread: ThreadType,
    ) -> ConnectOutcome {
        if source == target {
            return ConnectOutcome::Declined(Declined::SameItem);
        }
        let (from, to) = match (self.board.get(source), self.board.get(target)) {
            (Some(from), Some(to)) => (from, to),
            (None, _) => return ConnectOutcome::Declined(Declined::UnknownEvidence(source.clone())),
            (_, None) => return ConnectOutcome::Declined(Declined::UnknownEvidence(target.clone())),
        };
        if !self.is_active() {
            return ConnectOutcome::Declined(Declined::SessionOver);
        }

        let verdict = connection::judge(&self.board, &self.reveal, from, to, thread);
        debug!(%source, %target, %thread, ?verdict, "thread judged");

        let outcome = match verdict {
            Verdict::Duplicate => return ConnectOutcome::AlreadyConnected,
            Verdict::Hidden(item) => ConnectOutcome::HiddenContent {
                item,
                sanity_lost: self.mistake(self.rules.hidden_penalty),
            },
            Verdict::WrongOrder => ConnectOutcome::WrongOrder {
                sanity_lost: self.mistake(self.rules.wrong_order_penalty),
            },
            Verdict::Mismatch => ConnectOutcome::Mismatch {
                sanity_lost: self.mistake(self.rules.mismatch_penalty),
            },
            Verdict::Match(tag) => {
                let connection = Connection::new(source.clone(), target.clone(), thread);
                self.board.connect(connection.clone());
                let base = match thread {
                    ThreadType::Relational => self.rules.relational_reward,
                    ThreadType::Temporal => self.rules.temporal_reward,
                };
                let points = self.ledger.reward_connection(base, &self.rules);
                ConnectOutcome::Connected {
                    connection,
                    tag,
                    points,
                }
            }
        };

        let connected = outcome.is_connected();
        self.feedback.push(Feedback::Connect(outcome.clone()));
        self.settle(connected);
        outcome
    }

    /// Try to merge two items via a recipe of the active case.
    pub fn attempt_combine(&mut self, a: &EvidenceId, b: &EvidenceId) -> CombineOutcome {
        if a == b {
            return CombineOutcome::Declined(Declined::SameItem);
        }
        for id in [a, b] {
            if !self.board.contains(id) {
                return CombineOutcome::Declined(Declined::UnknownEvidence(id.clone()));
            }
        }
        if !self.is_active() {
            return CombineOutcome::Declined(Declined::SessionOver);
        }

        let outcome =
            combination::combine(&mut self.board, a, b, &self.case.recipes, &self.rules);

        let combined = match &outcome {
            CombineOutcome::Combined {
                children, bonus, ..
            } => {
                self.ledger.score += *bonus;
                info!(%a, %b, ?children, bonus, "evidence combined");
                true
            }
            _ => {
                debug!(%a, %b, "no recipe");
                false
            }
        };

        self.feedback.push(Feedback::Combine(outcome.clone()));
        self.settle(combined);
        outcome
    }

    /// Bin an item.
    pub fn dispose(&mut self, id: &EvidenceId) -> DisposeOutcome {
        if !self.board.contains(id) {
            return DisposeOutcome::Declined(Declined::UnknownEvidence(id.clone()));
        }
        if !self.is_active() {
            return DisposeOutcome::Declined(Declined::SessionOver);
        }

        let outcome = disposal::dispose(
            &mut self.board,
            &mut self.ledger,
            &mut self.history,
            &self.rules,
            id,
        );
        debug!(%id, ?outcome, "disposed");

        self.feedback.push(Feedback::Dispose(outcome.clone()));
        // Removing an item never joins clusters, so only loss can follow.
        self.settle(false);
        outcome
    }

    /// Take back the most recent disposal.
    pub fn undo_last_disposal(&mut self) -> UndoOutcome {
        if !self.is_active() {
            return UndoOutcome::Declined(Declined::SessionOver);
        }

        let outcome = disposal::undo(
            &mut self.board,
            &mut self.ledger,
            &mut self.history,
            &self.rules,
        );
        debug!(?outcome, "undo");

        let restored = matches!(outcome, UndoOutcome::Restored { .. });
        self.feedback.push(Feedback::Undo(outcome.clone()));
        self.settle(restored);
        outcome
    }

    /// Switch the UV lamp for the whole board.
    pub fn set_reveal_mode(&mut self, enabled: bool) {
        debug!(enabled, "uv mode");
        self.reveal.set_global(enabled);
    }

    /// Reveal a single item. Returns false if it is unknown or already revealed.
    pub fn reveal_item(&mut self, id: &EvidenceId) -> bool {
        if !self.board.contains(id) {
            return false;
        }
        self.reveal.reveal(id.clone())
    }

    /// Hidden text of an item, if the player can currently read it.
    pub fn readable_text(&self, id: &EvidenceId) -> Option<&str> {
        self.board
            .get(id)
            .and_then(|item| self.reveal.readable_text(item))
    }

    /// Take all feedback emitted since the last call.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn case(&self) -> &CaseDefinition {
        &self.case
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.state, SessionState::Solved { .. })
    }

    pub fn is_lost(&self) -> bool {
        self.state == SessionState::Lost
    }

    pub fn final_score(&self) -> Option<i64> {
        match self.state {
            SessionState::Solved { final_score } => Some(final_score),
            _ => None,
        }
    }

    /// The cluster that solved the case; empty until solved.
    pub fn winning_cluster(&self) -> &[EvidenceId] {
        &self.winning_cluster
    }

    pub fn status(&self) -> Status {
        Status {
            sanity: self.ledger.sanity,
            score: self.ledger.score,
            mistakes: self.ledger.mistakes,
            junk_disposed: self.ledger.junk_disposed,
            state: self.state,
            progress: cluster::best_coverage(&self.board, &self.case.required_tags),
            required: self.case.required_tags.len(),
            undo_available: self.history.len(),
            uv_mode: self.reveal.is_global(),
        }
    }

    fn mistake(&mut self, penalty: i32) -> i32 {
        self.ledger.record_mistake();
        self.ledger.lose_sanity(penalty, &self.rules)
    }

    /// Apply terminal transitions after a mutation. The win check runs
    /// before the loss check.
    fn settle(&mut self, check_win: bool) {
        if !self.is_active() {
            return;
        }

        if check_win {
            if let Some(solution) = cluster::evaluate(&self.board, &self.case.required_tags) {
                let final_score = self.rules.final_score.final_score(
                    self.ledger.score,
                    self.ledger.sanity,
                    self.ledger.junk_disposed,
                    self.ledger.mistakes,
                );
                info!(case = %self.case.id, final_score, cluster = ?solution.cluster, "case solved");
                self.state = SessionState::Solved { final_score };
                self.winning_cluster = solution.cluster;
                self.feedback.push(Feedback::Solved { final_score });
                return;
            }
        }

        if self.ledger.is_exhausted() {
            info!(case = %self.case.id, score = self.ledger.score, "sanity exhausted");
            self.state = SessionState::Lost;
            self.feedback.push(Feedback::Lost);
        }
    }
}
