//! Acceptors for local search move acceptance.
//!
//! Acceptors decide, for each evaluated move, whether the move is a
//! candidate for this step. The forager then picks among the accepted
//! candidates. Acceptors see the search through four hooks:
//!
//! ```text
//! phase_started -> (step_started -> is_accepted* -> step_ended)* -> phase_ended
//! ```
//!
//! `is_accepted` is called in move selection order, so stateful
//! acceptors evolve identically whether moves are evaluated on one
//! thread or many.

mod composite;
mod great_deluge;
mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;
mod tabu_search;

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

pub use composite::CompositeAcceptor;
pub use great_deluge::GreatDelugeAcceptor;
pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;
pub use tabu_search::TabuSearchAcceptor;

/// What an acceptor learns when a local search phase starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseContext<Sc> {
    pub phase_index: usize,
    /// Score of the working solution when the phase started.
    pub starting_score: Sc,
    /// Seed derived for this phase's random decisions.
    pub seed: u64,
}

/// What an acceptor learns when a step starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext<Sc> {
    pub step_index: u64,
    /// Score after the previous step, or the starting score.
    pub last_step_score: Sc,
    pub best_score: Sc,
    /// Elapsed share of the phase's budget, from 0.0 to 1.0.
    pub time_gradient: f64,
}

/// One evaluated move, in selection order.
#[derive(Debug)]
pub struct MoveCandidate<'m, Sc, M> {
    pub step_index: u64,
    pub move_index: u64,
    pub score: Sc,
    pub mv: &'m M,
}

/// The result of a step.
#[derive(Debug)]
pub struct StepOutcome<'m, Sc, M> {
    pub step_index: u64,
    pub step_score: Sc,
    pub best_score: Sc,
    /// The committed move; `None` if no candidate was accepted.
    pub step_move: Option<&'m M>,
    pub undo_move: Option<&'m M>,
}

/// Trait for accepting or rejecting moves in local search.
///
/// Acceptors implement different strategies for escaping local optima,
/// such as hill climbing, simulated annealing, or tabu search.
pub trait Acceptor<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Called when a phase starts.
    fn phase_started(&mut self, _phase: &PhaseContext<S::Score>) {}

    /// Called when a step starts.
    fn step_started(&mut self, _step: &StepContext<S::Score>) {}

    /// Returns true if the candidate may be picked this step.
    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool;

    /// Called when a step ends, whether or not a move was committed.
    fn step_ended(&mut self, _outcome: &StepOutcome<'_, S::Score, M>) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}
}

impl<S, M> Acceptor<S, M> for Box<dyn Acceptor<S, M>>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        (**self).phase_started(phase)
    }

    fn step_started(&mut self, step: &StepContext<S::Score>) {
        (**self).step_started(step)
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        (**self).is_accepted(candidate)
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        (**self).step_ended(outcome)
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }
}
