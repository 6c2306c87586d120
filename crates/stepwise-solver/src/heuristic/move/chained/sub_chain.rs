//! SubChainChangeMove - relocates a contiguous run of entities.

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::ScoreDirector;

use super::{change_chained, hash_variable, same_variable, trailing_entity};

/// Moves the sub-chain `entities` to sit behind `to`, keeping its order.
///
/// `entities` runs from the member nearest the anchor to the farthest.
/// Only three links change: the entity after the sub-chain closes the gap,
/// the first member attaches to `to`, and `to`'s old trailing entity hangs
/// off the last member.
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3 <- e4
/// move [e2, e3] behind e4
/// after:  a0 <- e1 <- e4 <- e2 <- e3
/// ```
pub struct SubChainChangeMove<S> {
    descriptor: ChainedVariableDescriptor<S>,
    entities: Vec<usize>,
    to_value: ChainValue,
}

impl<S> SubChainChangeMove<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>, entities: Vec<usize>, to_value: ChainValue) -> Self {
        Self {
            descriptor,
            entities,
            to_value,
        }
    }

    pub fn entities(&self) -> &[usize] {
        &self.entities
    }

    pub fn to_value(&self) -> ChainValue {
        self.to_value
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor.descriptor_index()
    }

    pub fn variable_name(&self) -> &'static str {
        self.descriptor.variable_name()
    }

    pub fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        self.entities.iter().copied().collect()
    }

    pub fn planning_values(&self) -> SmallVec<[ChainValue; 4]> {
        SmallVec::from_elem(self.to_value, 1)
    }
}

impl<S: PlanningSolution> SubChainChangeMove<S> {
    pub fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let Some(&first) = self.entities.first() else {
            return false;
        };
        let solution = score_director.working_solution();
        let Some(old_first) = self.descriptor.get(solution, first) else {
            return false;
        };
        old_first != self.to_value
            && is_attachable(&self.descriptor, solution, &self.entities, self.to_value)
            && is_contiguous(&self.descriptor, solution, &self.entities)
    }

    pub fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let old_first = self
            .entities
            .first()
            .and_then(|&first| self.descriptor.get(score_director.working_solution(), first))
            .unwrap_or(self.to_value);
        Self::new(self.descriptor, self.entities.clone(), old_first)
    }

    pub fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let (Some(&first), Some(&last)) = (self.entities.first(), self.entities.last()) else {
            return;
        };
        let old_first = self.descriptor.get(score_director.working_solution(), first);
        let old_trailing_last =
            trailing_entity(score_director, &self.descriptor, ChainValue::Entity(last));
        let new_trailing = trailing_entity(score_director, &self.descriptor, self.to_value);

        if let Some(old_trailing_last) = old_trailing_last {
            change_chained(score_director, &self.descriptor, old_trailing_last, old_first);
        }
        change_chained(score_director, &self.descriptor, first, Some(self.to_value));
        if let Some(new_trailing) = new_trailing {
            change_chained(
                score_director,
                &self.descriptor,
                new_trailing,
                Some(ChainValue::Entity(last)),
            );
        }
    }
}

/// True if `to` is assigned, exists, and is not one of `entities`.
pub(super) fn is_attachable<S>(
    descriptor: &ChainedVariableDescriptor<S>,
    solution: &S,
    entities: &[usize],
    to: ChainValue,
) -> bool {
    match to {
        ChainValue::Entity(target) => {
            !entities.contains(&target) && descriptor.get(solution, target).is_some()
        }
        ChainValue::Anchor(anchor) => anchor < descriptor.anchor_count(solution),
    }
}

/// True if each member's predecessor is the member before it.
pub(super) fn is_contiguous<S>(
    descriptor: &ChainedVariableDescriptor<S>,
    solution: &S,
    entities: &[usize],
) -> bool {
    entities
        .windows(2)
        .all(|pair| descriptor.get(solution, pair[1]) == Some(ChainValue::Entity(pair[0])))
}

impl<S> Clone for SubChainChangeMove<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            entities: self.entities.clone(),
            to_value: self.to_value,
        }
    }
}

impl<S> fmt::Debug for SubChainChangeMove<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChainChangeMove")
            .field("variable_name", &self.descriptor.variable_name())
            .field("entities", &self.entities)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S> PartialEq for SubChainChangeMove<S> {
    fn eq(&self, other: &Self) -> bool {
        same_variable(&self.descriptor, &other.descriptor)
            && self.entities == other.entities
            && self.to_value == other.to_value
    }
}

impl<S> Eq for SubChainChangeMove<S> {}

impl<S> Hash for SubChainChangeMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_variable(&self.descriptor, state);
        self.entities.hash(state);
        self.to_value.hash(state);
    }
}
