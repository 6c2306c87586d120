//! Step count termination.

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::{count_ratio, Termination};
use crate::scope::{PhaseScope, SolverScope};

/// Terminates after a step count.
///
/// At solver level all steps of all phases count; at phase level only the
/// steps of the current phase.
///
/// # Example
///
/// ```
/// use stepwise_solver::termination::StepCountTermination;
///
/// // Terminate after 1000 steps
/// let term = StepCountTermination::new(1000);
/// assert_eq!(term.limit(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for StepCountTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.total_step_count() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.step_count() >= self.limit
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        count_ratio(solver_scope.total_step_count(), self.limit)
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        count_ratio(phase_scope.step_count(), self.limit)
    }
}
