//! Step-level scope.

use std::any::Any;

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::PhaseScope;

/// Scope for a single step within a phase.
///
/// # Type Parameters
/// * `'a` - Lifetime of the phase scope reference
/// * `'b` - Lifetime of the solver scope reference
/// * `S` - The planning solution type
/// * `D` - The score director type
pub struct StepScope<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>> {
    phase_scope: &'a mut PhaseScope<'b, S, D>,
    step_index: u64,
    time_gradient: f64,
    step_score: Option<S::Score>,
    selected_move_count: u64,
    accepted_move_count: u64,
    /// Undo move of the committed step move.
    undo_move: Option<Box<dyn Any + Send>>,
}

impl<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>> StepScope<'a, 'b, S, D> {
    pub fn new(phase_scope: &'a mut PhaseScope<'b, S, D>) -> Self {
        let step_index = phase_scope.step_count();
        Self {
            phase_scope,
            step_index,
            time_gradient: 0.0,
            step_score: None,
            selected_move_count: 0,
            accepted_move_count: 0,
            undo_move: None,
        }
    }

    pub fn with_time_gradient(mut self, time_gradient: f64) -> Self {
        self.time_gradient = time_gradient;
        self
    }

    /// Index of this step within the phase (0-based).
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn time_gradient(&self) -> f64 {
        self.time_gradient
    }

    /// Score after the picked move, or `None` if no move was picked.
    pub fn step_score(&self) -> Option<S::Score> {
        self.step_score
    }

    pub fn set_step_score(&mut self, score: S::Score) {
        self.step_score = Some(score);
    }

    /// Records the move that reverts the committed step move.
    pub fn set_undo_move<M: Any + Send>(&mut self, undo_move: M) {
        self.undo_move = Some(Box::new(undo_move));
    }

    /// Returns the undo move of the committed step move, if a move of type
    /// `M` was committed.
    pub fn undo_move<M: Any>(&self) -> Option<&M> {
        self.undo_move.as_ref()?.downcast_ref::<M>()
    }

    /// Number of doable moves evaluated during this step.
    pub fn selected_move_count(&self) -> u64 {
        self.selected_move_count
    }

    pub fn accepted_move_count(&self) -> u64 {
        self.accepted_move_count
    }

    pub fn record_selected_move(&mut self) {
        self.selected_move_count += 1;
    }

    pub fn record_accepted_move(&mut self) {
        self.accepted_move_count += 1;
    }

    pub fn phase_scope(&self) -> &PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn phase_scope_mut(&mut self) -> &mut PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn score_director(&self) -> &D {
        self.phase_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.phase_scope.score_director_mut()
    }

    /// Commits the step to the phase.
    ///
    /// A step without a picked move keeps the last step score. Returns true
    /// if the step produced a new best solution.
    pub fn complete(&mut self) -> bool {
        let score = self
            .step_score
            .unwrap_or_else(|| self.phase_scope.last_step_score());
        self.phase_scope.step_completed(score)
    }
}
