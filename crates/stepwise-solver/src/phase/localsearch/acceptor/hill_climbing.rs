//! Hill climbing acceptor.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepContext, StepOutcome};

/// Hill climbing acceptor - accepts moves that don't worsen the score.
///
/// Compares against the last step's score, which under hill climbing never
/// drops below the best score of the phase. Equal scores are accepted so
/// the search can cross plateaus.
///
/// # Example
///
/// ```
/// use stepwise_core::score::SimpleScore;
/// use stepwise_solver::heuristic::r#move::ChangeMove;
/// use stepwise_solver::phase::localsearch::{
///     Acceptor, HillClimbingAcceptor, MoveCandidate, PhaseContext,
/// };
/// use stepwise_test::nqueens::{get_queen_row, set_queen_row, NQueensSolution};
///
/// type RowMove = ChangeMove<NQueensSolution, i64>;
///
/// let mut acceptor = HillClimbingAcceptor::<NQueensSolution>::new();
/// let phase = PhaseContext { phase_index: 0, starting_score: SimpleScore::of(-3), seed: 0 };
/// Acceptor::<NQueensSolution, RowMove>::phase_started(&mut acceptor, &phase);
///
/// let mv: RowMove = ChangeMove::new(0, Some(1), get_queen_row, set_queen_row, "row", 0);
/// let candidate = |score| MoveCandidate { step_index: 0, move_index: 0, score, mv: &mv };
/// assert!(acceptor.is_accepted(&candidate(SimpleScore::of(-3))));
/// assert!(!acceptor.is_accepted(&candidate(SimpleScore::of(-4))));
/// ```
pub struct HillClimbingAcceptor<S: PlanningSolution> {
    last_step_score: Option<S::Score>,
}

impl<S: PlanningSolution> HillClimbingAcceptor<S> {
    pub fn new() -> Self {
        Self {
            last_step_score: None,
        }
    }
}

impl<S: PlanningSolution> Default for HillClimbingAcceptor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Clone for HillClimbingAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            last_step_score: self.last_step_score,
        }
    }
}

impl<S: PlanningSolution> Debug for HillClimbingAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HillClimbingAcceptor")
            .field("last_step_score", &self.last_step_score)
            .finish()
    }
}

impl<S, M> Acceptor<S, M> for HillClimbingAcceptor<S>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        self.last_step_score = Some(phase.starting_score);
    }

    fn step_started(&mut self, step: &StepContext<S::Score>) {
        self.last_step_score = Some(step.last_step_score);
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        match self.last_step_score {
            Some(last) => candidate.score >= last,
            None => true,
        }
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        self.last_step_score = Some(outcome.step_score);
    }

    fn phase_ended(&mut self) {
        self.last_step_score = None;
    }
}
