//! TwoOptMove - reverses a path inside one chain.

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::{smallvec, SmallVec};
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::ScoreDirector;

use super::{hash_variable, path_between, reverse_behind, same_variable, trailing_entity};

/// Reverses the path from `first` to `last`, both included.
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3 <- e4
/// 2-opt from e2 to e3
/// after:  a0 <- e1 <- e3 <- e2 <- e4
/// ```
///
/// `last` must be downstream of `first` on the same chain. The undo move
/// is the 2-opt from `last` back to `first`.
pub struct TwoOptMove<S> {
    descriptor: ChainedVariableDescriptor<S>,
    first_entity: usize,
    last_entity: usize,
}

impl<S> TwoOptMove<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>, first_entity: usize, last_entity: usize) -> Self {
        Self {
            descriptor,
            first_entity,
            last_entity,
        }
    }

    pub fn first_entity(&self) -> usize {
        self.first_entity
    }

    pub fn last_entity(&self) -> usize {
        self.last_entity
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor.descriptor_index()
    }

    pub fn variable_name(&self) -> &'static str {
        self.descriptor.variable_name()
    }

    pub fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        smallvec![self.first_entity, self.last_entity]
    }

    pub fn planning_values(&self) -> SmallVec<[ChainValue; 4]> {
        SmallVec::new()
    }
}

impl<S: PlanningSolution> TwoOptMove<S> {
    pub fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        if self.first_entity == self.last_entity {
            return false;
        }
        let solution = score_director.working_solution();
        if self.descriptor.get(solution, self.first_entity).is_none() {
            return false;
        }
        path_between(
            score_director,
            &self.descriptor,
            self.first_entity,
            self.last_entity,
        )
        .is_some()
    }

    pub fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self {
        Self::new(self.descriptor, self.last_entity, self.first_entity)
    }

    pub fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let Some(path) = path_between(
            score_director,
            &self.descriptor,
            self.first_entity,
            self.last_entity,
        ) else {
            return;
        };
        let Some(before) = self
            .descriptor
            .get(score_director.working_solution(), self.first_entity)
        else {
            return;
        };
        let after = trailing_entity(
            score_director,
            &self.descriptor,
            ChainValue::Entity(self.last_entity),
        );
        reverse_behind(score_director, &self.descriptor, &path, before, after);
    }
}

impl<S> Clone for TwoOptMove<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            first_entity: self.first_entity,
            last_entity: self.last_entity,
        }
    }
}

impl<S> fmt::Debug for TwoOptMove<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoOptMove")
            .field("variable_name", &self.descriptor.variable_name())
            .field("first_entity", &self.first_entity)
            .field("last_entity", &self.last_entity)
            .finish()
    }
}

impl<S> PartialEq for TwoOptMove<S> {
    fn eq(&self, other: &Self) -> bool {
        same_variable(&self.descriptor, &other.descriptor)
            && self.first_entity == other.first_entity
            && self.last_entity == other.last_entity
    }
}

impl<S> Eq for TwoOptMove<S> {}

impl<S> Hash for TwoOptMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_variable(&self.descriptor, state);
        self.first_entity.hash(state);
        self.last_entity.hash(state);
    }
}
