//! Tabu search acceptor.

use std::collections::VecDeque;
use std::fmt::Debug;

use smallvec::SmallVec;
use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepOutcome};

/// Tabu search acceptor - rejects moves that touch something recently changed.
///
/// Three tabu lists are kept, each as a window over the most recent steps:
/// - entity tabu: the entities the step moved
/// - value tabu: the values the step assigned
/// - move tabu: the step's undo move, so the search doesn't walk straight back
///
/// A list with size `n` remembers the last `n` steps. A tabu move is only
/// accepted when aspiration is enabled and the move beats the best score.
/// Moves that aren't tabu are always accepted; the forager picks among them.
///
/// # Example
///
/// ```
/// use stepwise_solver::phase::localsearch::TabuSearchAcceptor;
/// use stepwise_test::nqueens::NQueensSolution;
/// use stepwise_solver::heuristic::r#move::ChangeMove;
///
/// let acceptor = TabuSearchAcceptor::<NQueensSolution, ChangeMove<NQueensSolution, i64>>::new()
///     .with_entity_tabu_size(7)
///     .with_aspiration(false);
/// assert_eq!(acceptor.entity_tabu_size(), Some(7));
/// ```
pub struct TabuSearchAcceptor<S: PlanningSolution, M: Move<S>> {
    entity_tabu_size: Option<usize>,
    value_tabu_size: Option<usize>,
    move_tabu_size: Option<usize>,
    aspiration_enabled: bool,
    entity_tabu: VecDeque<SmallVec<[usize; 4]>>,
    value_tabu: VecDeque<SmallVec<[M::Value; 4]>>,
    move_tabu: VecDeque<M>,
    best_score: Option<S::Score>,
}

impl<S: PlanningSolution, M: Move<S>> TabuSearchAcceptor<S, M> {
    /// Creates an acceptor with every tabu list disabled and aspiration on.
    pub fn new() -> Self {
        Self {
            entity_tabu_size: None,
            value_tabu_size: None,
            move_tabu_size: None,
            aspiration_enabled: true,
            entity_tabu: VecDeque::new(),
            value_tabu: VecDeque::new(),
            move_tabu: VecDeque::new(),
            best_score: None,
        }
    }

    pub fn with_entity_tabu_size(mut self, size: usize) -> Self {
        self.entity_tabu_size = Some(size);
        self
    }

    pub fn with_value_tabu_size(mut self, size: usize) -> Self {
        self.value_tabu_size = Some(size);
        self
    }

    pub fn with_move_tabu_size(mut self, size: usize) -> Self {
        self.move_tabu_size = Some(size);
        self
    }

    pub fn with_aspiration(mut self, enabled: bool) -> Self {
        self.aspiration_enabled = enabled;
        self
    }

    pub fn entity_tabu_size(&self) -> Option<usize> {
        self.entity_tabu_size
    }

    pub fn value_tabu_size(&self) -> Option<usize> {
        self.value_tabu_size
    }

    pub fn move_tabu_size(&self) -> Option<usize> {
        self.move_tabu_size
    }

    pub fn is_aspiration_enabled(&self) -> bool {
        self.aspiration_enabled
    }

    /// Returns true if any of the move's signatures is in a tabu list.
    pub fn is_tabu(&self, mv: &M) -> bool {
        if !self.entity_tabu.is_empty() {
            let entities = mv.planning_entities();
            if self
                .entity_tabu
                .iter()
                .any(|step| entities.iter().any(|e| step.contains(e)))
            {
                return true;
            }
        }
        if !self.value_tabu.is_empty() {
            let values = mv.planning_values();
            if self
                .value_tabu
                .iter()
                .any(|step| values.iter().any(|v| step.contains(v)))
            {
                return true;
            }
        }
        self.move_tabu.contains(mv)
    }

    fn clear(&mut self) {
        self.entity_tabu.clear();
        self.value_tabu.clear();
        self.move_tabu.clear();
    }
}

/// Appends `item`, dropping the oldest entries beyond `size`.
fn push_bounded<T>(list: &mut VecDeque<T>, size: Option<usize>, item: T) {
    let Some(size) = size else {
        return;
    };
    list.push_back(item);
    while list.len() > size {
        list.pop_front();
    }
}

impl<S: PlanningSolution, M: Move<S>> Default for TabuSearchAcceptor<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, M: Move<S>> Clone for TabuSearchAcceptor<S, M> {
    fn clone(&self) -> Self {
        Self {
            entity_tabu_size: self.entity_tabu_size,
            value_tabu_size: self.value_tabu_size,
            move_tabu_size: self.move_tabu_size,
            aspiration_enabled: self.aspiration_enabled,
            entity_tabu: self.entity_tabu.clone(),
            value_tabu: self.value_tabu.clone(),
            move_tabu: self.move_tabu.clone(),
            best_score: self.best_score,
        }
    }
}

impl<S: PlanningSolution, M: Move<S>> Debug for TabuSearchAcceptor<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabuSearchAcceptor")
            .field("entity_tabu_size", &self.entity_tabu_size)
            .field("value_tabu_size", &self.value_tabu_size)
            .field("move_tabu_size", &self.move_tabu_size)
            .field("aspiration_enabled", &self.aspiration_enabled)
            .finish()
    }
}

impl<S, M> Acceptor<S, M> for TabuSearchAcceptor<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        self.clear();
        self.best_score = Some(phase.starting_score);
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        if !self.is_tabu(candidate.mv) {
            return true;
        }
        self.aspiration_enabled && self.best_score.is_some_and(|best| candidate.score > best)
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        self.best_score = Some(outcome.best_score);
        if let Some(step_move) = outcome.step_move {
            push_bounded(
                &mut self.entity_tabu,
                self.entity_tabu_size,
                step_move.planning_entities(),
            );
            push_bounded(
                &mut self.value_tabu,
                self.value_tabu_size,
                step_move.planning_values(),
            );
        }
        if let Some(undo_move) = outcome.undo_move {
            push_bounded(&mut self.move_tabu, self.move_tabu_size, undo_move.clone());
        }
    }

    fn phase_ended(&mut self) {
        self.clear();
        self.best_score = None;
    }
}
