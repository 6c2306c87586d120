//! Phase-level scope.

use std::time::{Duration, Instant};

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::SolverScope;
use crate::termination::Termination;

/// Scope for a single phase of solving.
///
/// # Type Parameters
/// * `'a` - Lifetime of the solver scope reference
/// * `S` - The planning solution type
/// * `D` - The score director type
pub struct PhaseScope<'a, S: PlanningSolution, D: ScoreDirector<S>> {
    solver_scope: &'a mut SolverScope<S, D>,
    phase_index: usize,
    starting_score: S::Score,
    last_step_score: S::Score,
    step_count: u64,
    /// Phase step count when the best score last improved.
    last_improved_step_count: u64,
    start_time: Instant,
    starting_calculation_count: u64,
}

impl<'a, S: PlanningSolution, D: ScoreDirector<S>> PhaseScope<'a, S, D> {
    /// Creates a new phase scope, scoring the working solution as its start.
    pub fn new(solver_scope: &'a mut SolverScope<S, D>, phase_index: usize) -> Self {
        let starting_score = solver_scope.calculate_score();
        let starting_calculation_count = solver_scope.score_calculation_count();
        Self {
            solver_scope,
            phase_index,
            starting_score,
            last_step_score: starting_score,
            step_count: 0,
            last_improved_step_count: 0,
            start_time: Instant::now(),
            starting_calculation_count,
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn starting_score(&self) -> S::Score {
        self.starting_score
    }

    /// Score of the working solution after the last completed step.
    pub fn last_step_score(&self) -> S::Score {
        self.last_step_score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of completed steps in this phase.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_improved_step_count(&self) -> u64 {
        self.last_improved_step_count
    }

    /// Score calculations performed since the phase started.
    pub fn score_calculation_count(&self) -> u64 {
        self.solver_scope
            .score_calculation_count()
            .saturating_sub(self.starting_calculation_count)
    }

    pub fn best_score(&self) -> Option<S::Score> {
        self.solver_scope.best_score()
    }

    /// Records a completed step that left the working solution at `step_score`.
    ///
    /// Returns true if the step produced a new best solution.
    pub fn step_completed(&mut self, step_score: S::Score) -> bool {
        self.step_count += 1;
        self.last_step_score = step_score;
        self.solver_scope.increment_step_count();
        let improved = self.solver_scope.update_best_solution(step_score);
        if improved {
            self.last_improved_step_count = self.step_count;
        }
        improved
    }

    /// Returns true if the solver or the given phase termination is met.
    pub fn is_terminated<T: Termination<S, D> + ?Sized>(&self, termination: &T) -> bool {
        self.solver_scope.is_solver_terminated() || termination.is_phase_terminated(self)
    }

    /// Fraction of the phase or solver budget used up, whichever is larger.
    pub fn time_gradient<T: Termination<S, D> + ?Sized>(&self, termination: &T) -> f64 {
        termination
            .phase_time_gradient(self)
            .max(self.solver_scope.solver_time_gradient())
            .clamp(0.0, 1.0)
    }

    pub fn solver_scope(&self) -> &SolverScope<S, D> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<S, D> {
        self.solver_scope
    }

    pub fn score_director(&self) -> &D {
        self.solver_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.solver_scope.score_director_mut()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.solver_scope.calculate_score()
    }
}
