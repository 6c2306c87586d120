//! Moves over chained planning variables.
//!
//! A chained variable points at its predecessor, so a chain is a singly
//! linked list rooted at an anchor:
//!
//! ```text
//! anchor <- a <- b <- c
//! ```
//!
//! Relocating entities rewrites up to three links: the entity after the
//! removed part is spliced to the removed part's old predecessor, the
//! moved part is attached to its new predecessor, and the entity that
//! used to follow the new predecessor is attached to the moved part.
//! Every move reads the links it needs *before* writing any of them; the
//! chain supply is only refreshed when the variable listeners trigger.

mod change;
mod reversing;
mod sub_chain;
mod tail_chain_swap;
mod two_opt;

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::{begin_variable_change, ScoreDirector};

use super::Move;

pub use change::ChainedChangeMove;
pub use reversing::SubChainReversingChangeMove;
pub use sub_chain::SubChainChangeMove;
pub use tail_chain_swap::TailChainSwapMove;
pub use two_opt::TwoOptMove;

/// Any move over a chained variable.
///
/// A closed sum so selectors of different chained move kinds can be
/// combined in one union, and so deciders stay monomorphic.
pub enum ChainedMove<S> {
    Change(ChainedChangeMove<S>),
    SubChainChange(SubChainChangeMove<S>),
    SubChainReversingChange(SubChainReversingChangeMove<S>),
    TailChainSwap(TailChainSwapMove<S>),
    TwoOpt(TwoOptMove<S>),
}

macro_rules! dispatch {
    ($self:ident, $mv:ident => $body:expr) => {
        match $self {
            ChainedMove::Change($mv) => $body,
            ChainedMove::SubChainChange($mv) => $body,
            ChainedMove::SubChainReversingChange($mv) => $body,
            ChainedMove::TailChainSwap($mv) => $body,
            ChainedMove::TwoOpt($mv) => $body,
        }
    };
}

impl<S> Clone for ChainedMove<S> {
    fn clone(&self) -> Self {
        match self {
            ChainedMove::Change(mv) => ChainedMove::Change(mv.clone()),
            ChainedMove::SubChainChange(mv) => ChainedMove::SubChainChange(mv.clone()),
            ChainedMove::SubChainReversingChange(mv) => {
                ChainedMove::SubChainReversingChange(mv.clone())
            }
            ChainedMove::TailChainSwap(mv) => ChainedMove::TailChainSwap(mv.clone()),
            ChainedMove::TwoOpt(mv) => ChainedMove::TwoOpt(mv.clone()),
        }
    }
}

impl<S> Debug for ChainedMove<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(self, mv => Debug::fmt(mv, f))
    }
}

impl<S> PartialEq for ChainedMove<S> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ChainedMove::Change(a), ChainedMove::Change(b)) => a == b,
            (ChainedMove::SubChainChange(a), ChainedMove::SubChainChange(b)) => a == b,
            (ChainedMove::SubChainReversingChange(a), ChainedMove::SubChainReversingChange(b)) => {
                a == b
            }
            (ChainedMove::TailChainSwap(a), ChainedMove::TailChainSwap(b)) => a == b,
            (ChainedMove::TwoOpt(a), ChainedMove::TwoOpt(b)) => a == b,
            _ => false,
        }
    }
}

impl<S> Eq for ChainedMove<S> {}

impl<S> Hash for ChainedMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        dispatch!(self, mv => mv.hash(state))
    }
}

impl<S: PlanningSolution> Move<S> for ChainedMove<S> {
    type Value = ChainValue;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        dispatch!(self, mv => mv.is_doable(score_director))
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        match self {
            ChainedMove::Change(mv) => ChainedMove::Change(mv.create_undo_move(score_director)),
            ChainedMove::SubChainChange(mv) => {
                ChainedMove::SubChainChange(mv.create_undo_move(score_director))
            }
            ChainedMove::SubChainReversingChange(mv) => {
                ChainedMove::SubChainReversingChange(mv.create_undo_move(score_director))
            }
            ChainedMove::TailChainSwap(mv) => {
                ChainedMove::TailChainSwap(mv.create_undo_move(score_director))
            }
            ChainedMove::TwoOpt(mv) => ChainedMove::TwoOpt(mv.create_undo_move(score_director)),
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        dispatch!(self, mv => mv.do_move(score_director))
    }

    fn descriptor_index(&self) -> usize {
        dispatch!(self, mv => mv.descriptor_index())
    }

    fn variable_name(&self) -> &'static str {
        dispatch!(self, mv => mv.variable_name())
    }

    fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        dispatch!(self, mv => mv.planning_entities())
    }

    fn planning_values(&self) -> SmallVec<[ChainValue; 4]> {
        dispatch!(self, mv => mv.planning_values())
    }
}

macro_rules! impl_from_chained {
    ($($variant:ident($ty:ident)),+) => {
        $(
            impl<S> From<$ty<S>> for ChainedMove<S> {
                fn from(mv: $ty<S>) -> Self {
                    ChainedMove::$variant(mv)
                }
            }
        )+
    };
}

impl_from_chained!(
    Change(ChainedChangeMove),
    SubChainChange(SubChainChangeMove),
    SubChainReversingChange(SubChainReversingChangeMove),
    TailChainSwap(TailChainSwapMove),
    TwoOpt(TwoOptMove)
);

/// Returns the entity whose predecessor is `value`.
///
/// Uses the director's chain supply when it maintains one, and scans the
/// entities otherwise.
pub(crate) fn trailing_entity<S, D>(
    score_director: &D,
    descriptor: &ChainedVariableDescriptor<S>,
    value: ChainValue,
) -> Option<usize>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    if let Some(supply) = score_director.chain_supply(descriptor.variable_name()) {
        return supply.trailing_entity(value);
    }
    let solution = score_director.working_solution();
    (0..descriptor.entity_count(solution)).find(|&e| descriptor.get(solution, e) == Some(value))
}

/// Returns the anchor at the root of `value`'s chain.
pub(crate) fn anchor_of<S, D>(
    score_director: &D,
    descriptor: &ChainedVariableDescriptor<S>,
    value: ChainValue,
) -> Option<usize>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    if let Some(supply) = score_director.chain_supply(descriptor.variable_name()) {
        return supply.anchor_of_value(value);
    }
    let solution = score_director.working_solution();
    let mut cursor = value;
    for _ in 0..=descriptor.entity_count(solution) {
        match cursor {
            ChainValue::Anchor(anchor) => return Some(anchor),
            ChainValue::Entity(entity) => cursor = descriptor.get(solution, entity)?,
        }
    }
    None
}

/// Walks trailing links from `first` to `last`, both included.
///
/// Returns `None` if `last` is not downstream of `first`.
pub(crate) fn path_between<S, D>(
    score_director: &D,
    descriptor: &ChainedVariableDescriptor<S>,
    first: usize,
    last: usize,
) -> Option<Vec<usize>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let limit = descriptor.entity_count(score_director.working_solution());
    let mut path = vec![first];
    let mut cursor = first;
    while cursor != last {
        cursor = trailing_entity(score_director, descriptor, ChainValue::Entity(cursor))?;
        path.push(cursor);
        if path.len() > limit {
            return None;
        }
    }
    Some(path)
}

/// Writes one chained link, bracketed.
pub(crate) fn change_chained<S, D>(
    score_director: &mut D,
    descriptor: &ChainedVariableDescriptor<S>,
    entity: usize,
    value: Option<ChainValue>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let mut change = begin_variable_change(
        score_director,
        descriptor.descriptor_index(),
        entity,
        descriptor.variable_name(),
    );
    descriptor.set(change.working_solution_mut(), entity, value);
}

/// Reverses `entities` in place behind `to`.
///
/// `entities` runs from the entity nearest the anchor to the farthest.
/// Afterwards `to <- last <- ... <- first`, and `trailing`, if any, hangs
/// off `first`.
pub(crate) fn reverse_behind<S, D>(
    score_director: &mut D,
    descriptor: &ChainedVariableDescriptor<S>,
    entities: &[usize],
    to: ChainValue,
    trailing: Option<usize>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    let (Some(&first), Some(&last)) = (entities.first(), entities.last()) else {
        return;
    };
    change_chained(score_director, descriptor, last, Some(to));
    for pair in entities.windows(2).rev() {
        change_chained(score_director, descriptor, pair[0], Some(ChainValue::Entity(pair[1])));
    }
    if let Some(trailing) = trailing {
        change_chained(score_director, descriptor, trailing, Some(ChainValue::Entity(first)));
    }
}

/// Equality and hashing of chained moves ignore the descriptor's function
/// pointers and compare the variable it names.
pub(crate) fn same_variable<S>(
    a: &ChainedVariableDescriptor<S>,
    b: &ChainedVariableDescriptor<S>,
) -> bool {
    a.is_same_variable(b)
}

pub(crate) fn hash_variable<S, H: Hasher>(descriptor: &ChainedVariableDescriptor<S>, state: &mut H) {
    descriptor.descriptor_index().hash(state);
    descriptor.variable_name().hash(state);
}

#[cfg(test)]
mod tests;
