//! Termination conditions for the solver and its phases.
//!
//! Every termination answers two questions at two levels: is the solver
//! (or the current phase) done, and how much of its budget is used up.
//! The budget fraction is the time gradient that drives acceptors such as
//! simulated annealing.

mod best_score;
mod composite;
mod score_calculation_count;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use crate::scope::{PhaseScope, SolverScope};

pub use best_score::{BestScoreFeasibleTermination, BestScoreTermination};
pub use composite::{AndTermination, OrTermination};
pub use score_calculation_count::ScoreCalculationCountTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop solving.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Termination<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Returns true if the whole solver should stop.
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    /// Returns true if the current phase should stop.
    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool;

    /// Fraction of the solver budget used up, in `[0, 1]`.
    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64;

    /// Fraction of the phase budget used up, in `[0, 1]`.
    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64;
}

impl<S, D, T> Termination<S, D> for Box<T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D> + ?Sized,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        (**self).is_solver_terminated(solver_scope)
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        (**self).is_phase_terminated(phase_scope)
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        (**self).solver_time_gradient(solver_scope)
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        (**self).phase_time_gradient(phase_scope)
    }
}

/// Termination that never terminates.
///
/// Phases run until the solver termination, or their own lack of moves,
/// stops them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for NoTermination {
    fn is_solver_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        false
    }

    fn is_phase_terminated(&self, _phase_scope: &PhaseScope<'_, S, D>) -> bool {
        false
    }

    fn solver_time_gradient(&self, _solver_scope: &SolverScope<S, D>) -> f64 {
        0.0
    }

    fn phase_time_gradient(&self, _phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        0.0
    }
}

fn count_ratio(count: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 1.0;
    }
    (count as f64 / limit as f64).min(1.0)
}

#[cfg(test)]
mod tests;
