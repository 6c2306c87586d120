//! Termination based on lack of improvement.

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::{count_ratio, Termination};
use crate::scope::{PhaseScope, SolverScope};

/// Terminates if the best score has not improved for a number of steps.
///
/// Useful to stop a search that has plateaued. The scopes track the step
/// of the last improvement, so the termination itself is stateless.
///
/// # Example
///
/// ```
/// use stepwise_solver::termination::UnimprovedStepCountTermination;
///
/// // Terminate after 100 steps without improvement
/// let term = UnimprovedStepCountTermination::new(100);
/// ```
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D>
    for UnimprovedStepCountTermination
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        let unimproved =
            solver_scope.total_step_count() - solver_scope.last_improved_step_count();
        unimproved >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        let unimproved = phase_scope.step_count() - phase_scope.last_improved_step_count();
        unimproved >= self.limit
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        count_ratio(
            solver_scope.total_step_count() - solver_scope.last_improved_step_count(),
            self.limit,
        )
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        count_ratio(
            phase_scope.step_count() - phase_scope.last_improved_step_count(),
            self.limit,
        )
    }
}
