//! ChainedChangeMove - relocates a single entity inside the chains.

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::{smallvec, SmallVec};
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::ScoreDirector;

use super::{change_chained, hash_variable, same_variable, trailing_entity};

/// Moves one entity to sit behind `to`, or unassigns it when `to` is `None`.
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3       a1 <- e4
/// move e2 behind a1
/// after:  a0 <- e1 <- e3             a1 <- e2 <- e4
/// ```
pub struct ChainedChangeMove<S> {
    descriptor: ChainedVariableDescriptor<S>,
    entity_index: usize,
    to_value: Option<ChainValue>,
}

impl<S> ChainedChangeMove<S> {
    pub fn new(
        descriptor: ChainedVariableDescriptor<S>,
        entity_index: usize,
        to_value: Option<ChainValue>,
    ) -> Self {
        Self {
            descriptor,
            entity_index,
            to_value,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn to_value(&self) -> Option<ChainValue> {
        self.to_value
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor.descriptor_index()
    }

    pub fn variable_name(&self) -> &'static str {
        self.descriptor.variable_name()
    }

    pub fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        smallvec![self.entity_index]
    }

    pub fn planning_values(&self) -> SmallVec<[ChainValue; 4]> {
        self.to_value.into_iter().collect()
    }
}

impl<S: PlanningSolution> ChainedChangeMove<S> {
    pub fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let solution = score_director.working_solution();
        let current = self.descriptor.get(solution, self.entity_index);
        if current == self.to_value {
            return false;
        }
        match self.to_value {
            Some(ChainValue::Entity(target)) => {
                target != self.entity_index && self.descriptor.get(solution, target).is_some()
            }
            Some(ChainValue::Anchor(anchor)) => anchor < self.descriptor.anchor_count(solution),
            None => true,
        }
    }

    pub fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let current = self
            .descriptor
            .get(score_director.working_solution(), self.entity_index);
        Self::new(self.descriptor, self.entity_index, current)
    }

    pub fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let entity = ChainValue::Entity(self.entity_index);
        let old_value = self
            .descriptor
            .get(score_director.working_solution(), self.entity_index);
        let old_trailing = old_value
            .and_then(|_| trailing_entity(score_director, &self.descriptor, entity));
        let new_trailing = self
            .to_value
            .and_then(|to| trailing_entity(score_director, &self.descriptor, to));

        if let Some(old_trailing) = old_trailing {
            change_chained(score_director, &self.descriptor, old_trailing, old_value);
        }
        change_chained(score_director, &self.descriptor, self.entity_index, self.to_value);
        if let Some(new_trailing) = new_trailing {
            change_chained(score_director, &self.descriptor, new_trailing, Some(entity));
        }
    }
}

impl<S> Clone for ChainedChangeMove<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            entity_index: self.entity_index,
            to_value: self.to_value,
        }
    }
}

impl<S> fmt::Debug for ChainedChangeMove<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedChangeMove")
            .field("variable_name", &self.descriptor.variable_name())
            .field("entity_index", &self.entity_index)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S> PartialEq for ChainedChangeMove<S> {
    fn eq(&self, other: &Self) -> bool {
        same_variable(&self.descriptor, &other.descriptor)
            && self.entity_index == other.entity_index
            && self.to_value == other.to_value
    }
}

impl<S> Eq for ChainedChangeMove<S> {}

impl<S> Hash for ChainedChangeMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_variable(&self.descriptor, state);
        self.entity_index.hash(state);
        self.to_value.hash(state);
    }
}
