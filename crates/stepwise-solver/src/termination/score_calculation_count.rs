//! Score calculation count termination.

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::{count_ratio, Termination};
use crate::scope::{PhaseScope, SolverScope};

/// Terminates after a number of score calculations.
///
/// Unlike a time limit this is independent of machine speed, which makes
/// it useful for reproducible benchmarks.
#[derive(Debug, Clone)]
pub struct ScoreCalculationCountTermination {
    limit: u64,
}

impl ScoreCalculationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D>
    for ScoreCalculationCountTermination
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.score_calculation_count() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.score_calculation_count() >= self.limit
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        count_ratio(solver_scope.score_calculation_count(), self.limit)
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        count_ratio(phase_scope.score_calculation_count(), self.limit)
    }
}
