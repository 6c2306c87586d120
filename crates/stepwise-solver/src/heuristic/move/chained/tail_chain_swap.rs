//! TailChainSwapMove - exchanges the tails of two chains.

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::{smallvec, SmallVec};
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::ScoreDirector;

use super::{anchor_of, change_chained, hash_variable, same_variable, trailing_entity};

/// Swaps the tail starting at `left_entity` with the tail that follows
/// `right_value` in another chain.
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3       a1 <- e4 <- e5
/// swap tail at e2 with the tail behind e4
/// after:  a0 <- e1 <- e5             a1 <- e4 <- e2 <- e3
/// ```
///
/// Both values must lie on different chains. Within a single chain the
/// same exchange is a [`TwoOptMove`](super::TwoOptMove).
pub struct TailChainSwapMove<S> {
    descriptor: ChainedVariableDescriptor<S>,
    left_entity: usize,
    right_value: ChainValue,
}

impl<S> TailChainSwapMove<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>, left_entity: usize, right_value: ChainValue) -> Self {
        Self {
            descriptor,
            left_entity,
            right_value,
        }
    }

    pub fn left_entity(&self) -> usize {
        self.left_entity
    }

    pub fn right_value(&self) -> ChainValue {
        self.right_value
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor.descriptor_index()
    }

    pub fn variable_name(&self) -> &'static str {
        self.descriptor.variable_name()
    }

    pub fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        smallvec![self.left_entity]
    }

    pub fn planning_values(&self) -> SmallVec<[ChainValue; 4]> {
        smallvec![self.right_value]
    }
}

impl<S: PlanningSolution> TailChainSwapMove<S> {
    pub fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let left = ChainValue::Entity(self.left_entity);
        let Some(left_value) = self
            .descriptor
            .get(score_director.working_solution(), self.left_entity)
        else {
            return false;
        };
        if left_value == self.right_value || self.right_value == left {
            return false;
        }
        match (
            anchor_of(score_director, &self.descriptor, left),
            anchor_of(score_director, &self.descriptor, self.right_value),
        ) {
            (Some(left_anchor), Some(right_anchor)) => left_anchor != right_anchor,
            _ => false,
        }
    }

    pub fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let left_value = self
            .descriptor
            .get(score_director.working_solution(), self.left_entity)
            .unwrap_or(self.right_value);
        Self::new(self.descriptor, self.left_entity, left_value)
    }

    pub fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let left_value = self
            .descriptor
            .get(score_director.working_solution(), self.left_entity);
        let right_entity = trailing_entity(score_director, &self.descriptor, self.right_value);

        change_chained(
            score_director,
            &self.descriptor,
            self.left_entity,
            Some(self.right_value),
        );
        if let Some(right_entity) = right_entity {
            change_chained(score_director, &self.descriptor, right_entity, left_value);
        }
    }
}

impl<S> Clone for TailChainSwapMove<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            left_entity: self.left_entity,
            right_value: self.right_value,
        }
    }
}

impl<S> fmt::Debug for TailChainSwapMove<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TailChainSwapMove")
            .field("variable_name", &self.descriptor.variable_name())
            .field("left_entity", &self.left_entity)
            .field("right_value", &self.right_value)
            .finish()
    }
}

impl<S> PartialEq for TailChainSwapMove<S> {
    fn eq(&self, other: &Self) -> bool {
        same_variable(&self.descriptor, &other.descriptor)
            && self.left_entity == other.left_entity
            && self.right_value == other.right_value
    }
}

impl<S> Eq for TailChainSwapMove<S> {}

impl<S> Hash for TailChainSwapMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_variable(&self.descriptor, state);
        self.left_entity.hash(state);
        self.right_value.hash(state);
    }
}
