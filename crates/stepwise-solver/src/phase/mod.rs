//! Solver phases
//!
//! Phases are the main building blocks of solving:
//! - [`ConstructionHeuristicPhase`](construction::ConstructionHeuristicPhase):
//!   builds an initial solution
//! - [`LocalSearchPhase`](localsearch::LocalSearchPhase): improves an
//!   existing solution

pub mod construction;
pub mod localsearch;

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_scoring::ScoreDirector;

use crate::scope::SolverScope;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver. Each phase has its own
/// strategy for exploring or constructing solutions.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Executes this phase.
    ///
    /// The phase modifies the working solution in the solver scope and
    /// reports every completed step so the best solution is tracked. An
    /// error ends the phase and the solver.
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

impl<S, D, P> Phase<S, D> for Box<P>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    P: Phase<S, D> + ?Sized,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        (**self).solve(solver_scope)
    }

    fn phase_type_name(&self) -> &'static str {
        (**self).phase_type_name()
    }
}
