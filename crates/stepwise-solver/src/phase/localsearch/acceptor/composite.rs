//! Composite acceptor.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepContext, StepOutcome};

/// Accepts a move only if every member acceptor accepts it.
///
/// Every member sees every candidate, even after one has rejected it, so
/// stateful members stay in step with each other.
pub struct CompositeAcceptor<S: PlanningSolution, M: Move<S>> {
    acceptors: Vec<Box<dyn Acceptor<S, M>>>,
}

impl<S: PlanningSolution, M: Move<S>> CompositeAcceptor<S, M> {
    pub fn new(acceptors: Vec<Box<dyn Acceptor<S, M>>>) -> Self {
        Self { acceptors }
    }

    pub fn len(&self) -> usize {
        self.acceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acceptors.is_empty()
    }
}

impl<S: PlanningSolution, M: Move<S>> Debug for CompositeAcceptor<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeAcceptor")
            .field("acceptors", &self.acceptors)
            .finish()
    }
}

impl<S, M> Acceptor<S, M> for CompositeAcceptor<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        for acceptor in &mut self.acceptors {
            acceptor.phase_started(phase);
        }
    }

    fn step_started(&mut self, step: &StepContext<S::Score>) {
        for acceptor in &mut self.acceptors {
            acceptor.step_started(step);
        }
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        self.acceptors
            .iter_mut()
            .fold(true, |accepted, acceptor| acceptor.is_accepted(candidate) && accepted)
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        for acceptor in &mut self.acceptors {
            acceptor.step_ended(outcome);
        }
    }

    fn phase_ended(&mut self) {
        for acceptor in &mut self.acceptors {
            acceptor.phase_ended();
        }
    }
}
