//! Late acceptance acceptor.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepContext, StepOutcome};

/// Late acceptance acceptor - accepts moves that improve on a historical score.
///
/// Maintains a ring buffer of the last `late_acceptance_size` step scores,
/// filled with the phase's starting score. A move is accepted if its score
/// is at least the score from `late_acceptance_size` steps ago, or at least
/// the last step's score. Every step writes its score into the slot it
/// compared against and advances the ring.
pub struct LateAcceptanceAcceptor<S: PlanningSolution> {
    late_acceptance_size: usize,
    score_history: Vec<S::Score>,
    current_index: usize,
    last_step_score: Option<S::Score>,
}

impl<S: PlanningSolution> Debug for LateAcceptanceAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LateAcceptanceAcceptor")
            .field("late_acceptance_size", &self.late_acceptance_size)
            .field("current_index", &self.current_index)
            .finish()
    }
}

impl<S: PlanningSolution> Clone for LateAcceptanceAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            late_acceptance_size: self.late_acceptance_size,
            score_history: self.score_history.clone(),
            current_index: self.current_index,
            last_step_score: self.last_step_score,
        }
    }
}

impl<S: PlanningSolution> LateAcceptanceAcceptor<S> {
    /// Creates a new late acceptance acceptor.
    ///
    /// # Arguments
    /// * `late_acceptance_size` - Number of historical scores to keep, at least 1
    pub fn new(late_acceptance_size: usize) -> Self {
        Self {
            late_acceptance_size: late_acceptance_size.max(1),
            score_history: Vec::new(),
            current_index: 0,
            last_step_score: None,
        }
    }

    pub fn late_acceptance_size(&self) -> usize {
        self.late_acceptance_size
    }
}

impl<S: PlanningSolution> Default for LateAcceptanceAcceptor<S> {
    fn default() -> Self {
        Self::new(400)
    }
}

impl<S, M> Acceptor<S, M> for LateAcceptanceAcceptor<S>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        self.score_history = vec![phase.starting_score; self.late_acceptance_size];
        self.current_index = 0;
        self.last_step_score = Some(phase.starting_score);
    }

    fn step_started(&mut self, step: &StepContext<S::Score>) {
        self.last_step_score = Some(step.last_step_score);
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        let Some(late_score) = self.score_history.get(self.current_index) else {
            return true;
        };
        if candidate.score >= *late_score {
            return true;
        }
        self.last_step_score
            .is_some_and(|last| candidate.score >= last)
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        if let Some(slot) = self.score_history.get_mut(self.current_index) {
            *slot = outcome.step_score;
        }
        self.current_index = (self.current_index + 1) % self.late_acceptance_size;
        self.last_step_score = Some(outcome.step_score);
    }

    fn phase_ended(&mut self) {
        self.score_history.clear();
        self.current_index = 0;
        self.last_step_score = None;
    }
}
