//! Composite termination conditions (AND/OR).
//!
//! Tuples of terminations are combined without type erasure; a `Vec` of
//! boxed terminations covers combinations built from configuration.

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Combines terminations with OR logic: terminates when ANY child does.
///
/// The time gradient is the largest of the children's gradients.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stepwise_solver::termination::{OrTermination, StepCountTermination, TimeTermination};
///
/// // Terminate after 30 seconds OR 1000 steps
/// let termination = OrTermination((
///     TimeTermination::new(Duration::from_secs(30)),
///     StepCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    /// Creates a new OR termination from a tuple or `Vec` of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Combines terminations with AND logic: terminates when ALL children do.
///
/// The time gradient is the smallest of the children's gradients.
///
/// # Examples
///
/// ```
/// use stepwise_solver::termination::{
///     AndTermination, BestScoreFeasibleTermination, StepCountTermination,
/// };
///
/// // Terminate only when the score is feasible AND 100 steps passed
/// let termination = AndTermination((
///     BestScoreFeasibleTermination::new(),
///     StepCountTermination::new(100),
/// ));
/// ```
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    /// Creates a new AND termination from a tuple or `Vec` of terminations.
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Generates `Termination` implementations for OR and AND tuples.
macro_rules! impl_composite_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<S, D, $($T),+> Termination<S, D> for OrTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))||+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(phase_scope))||+
            }

            fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 0.0_f64;
                $(gradient = gradient.max((self.0).$idx.solver_time_gradient(solver_scope));)+
                gradient
            }

            fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
                let mut gradient = 0.0_f64;
                $(gradient = gradient.max((self.0).$idx.phase_time_gradient(phase_scope));)+
                gradient
            }
        }

        impl<S, D, $($T),+> Termination<S, D> for AndTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                $((self.0).$idx.is_solver_terminated(solver_scope))&&+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                $((self.0).$idx.is_phase_terminated(phase_scope))&&+
            }

            fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                let mut gradient = 1.0_f64;
                $(gradient = gradient.min((self.0).$idx.solver_time_gradient(solver_scope));)+
                gradient
            }

            fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
                let mut gradient = 1.0_f64;
                $(gradient = gradient.min((self.0).$idx.phase_time_gradient(phase_scope));)+
                gradient
            }
        }
    };
}

impl_composite_termination!(0: T0);
impl_composite_termination!(0: T0, 1: T1);
impl_composite_termination!(0: T0, 1: T1, 2: T2);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);

impl<S, D, T> Termination<S, D> for OrTermination<Vec<T>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.0.iter().any(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.0.iter().any(|t| t.is_phase_terminated(phase_scope))
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.solver_time_gradient(solver_scope))
            .fold(0.0, f64::max)
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.phase_time_gradient(phase_scope))
            .fold(0.0, f64::max)
    }
}

// An empty AND never terminates.
impl<S, D, T> Termination<S, D> for AndTermination<Vec<T>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    T: Termination<S, D>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_phase_terminated(phase_scope))
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.solver_time_gradient(solver_scope))
            .fold(1.0, f64::min)
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.phase_time_gradient(phase_scope))
            .fold(1.0, f64::min)
    }
}
