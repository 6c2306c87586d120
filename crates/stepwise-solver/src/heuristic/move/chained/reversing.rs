//! SubChainReversingChangeMove - relocates a sub-chain and flips its order.

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_scoring::ScoreDirector;

use super::sub_chain::{is_attachable, is_contiguous};
use super::{change_chained, hash_variable, reverse_behind, same_variable, trailing_entity};

/// Moves the sub-chain `entities` behind `to` in reverse order.
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3 <- e4
/// reverse [e2, e3] behind e4
/// after:  a0 <- e1 <- e4 <- e3 <- e2
/// ```
///
/// When `to` is the sub-chain's own predecessor the sub-chain is reversed
/// where it stands. The entity that trailed the last member then has to
/// hang off the new tail, and there is no gap to close:
///
/// ```text
/// before: a0 <- e1 <- e2 <- e3
/// reverse [e1, e2] behind a0
/// after:  a0 <- e2 <- e1 <- e3
/// ```
///
/// The undo move reverses the reversed sub-chain back behind the old
/// predecessor.
pub struct SubChainReversingChangeMove<S> {
    descriptor: ChainedVariableDescriptor<S>,
    entities: Vec<usize>,
    to_value: ChainValue,
}

impl<S> SubChainReversingChangeMove<S> {
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

impl<S: PlanningSolution> SubChainReversingChangeMove<S> {
    pub fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let Some(&first) = self.entities.first() else {
            return false;
        };
        let solution = score_director.working_solution();
        let Some(old_first) = self.descriptor.get(solution, first) else {
            return false;
        };
        // Reversing a single entity in place changes nothing.
        if old_first == self.to_value && self.entities.len() == 1 {
            return false;
        }
        is_attachable(&self.descriptor, solution, &self.entities, self.to_value)
            && is_contiguous(&self.descriptor, solution, &self.entities)
    }

    pub fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let old_first = self
            .entities
            .first()
            .and_then(|&first| self.descriptor.get(score_director.working_solution(), first))
            .unwrap_or(self.to_value);
        let reversed = self.entities.iter().rev().copied().collect();
        Self::new(self.descriptor, reversed, old_first)
    }

    pub fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let (Some(&first), Some(&last)) = (self.entities.first(), self.entities.last()) else {
            return;
        };
        let old_first = self.descriptor.get(score_director.working_solution(), first);
        let old_trailing_last =
            trailing_entity(score_director, &self.descriptor, ChainValue::Entity(last));

        if old_first == Some(self.to_value) {
            // Old and new insertion points alias: a single splice.
            reverse_behind(
                score_director,
                &self.descriptor,
                &self.entities,
                self.to_value,
                old_trailing_last,
            );
            return;
        }

        let new_trailing = trailing_entity(score_director, &self.descriptor, self.to_value);
        if let Some(old_trailing_last) = old_trailing_last {
            change_chained(score_director, &self.descriptor, old_trailing_last, old_first);
        }
        reverse_behind(
            score_director,
            &self.descriptor,
            &self.entities,
            self.to_value,
            new_trailing,
        );
    }
}

impl<S> Clone for SubChainReversingChangeMove<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            entities: self.entities.clone(),
            to_value: self.to_value,
        }
    }
}

impl<S> fmt::Debug for SubChainReversingChangeMove<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChainReversingChangeMove")
            .field("variable_name", &self.descriptor.variable_name())
            .field("entities", &self.entities)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S> PartialEq for SubChainReversingChangeMove<S> {
    fn eq(&self, other: &Self) -> bool {
        same_variable(&self.descriptor, &other.descriptor)
            && self.entities == other.entities
            && self.to_value == other.to_value
    }
}

impl<S> Eq for SubChainReversingChangeMove<S> {}

impl<S> Hash for SubChainReversingChangeMove<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_variable(&self.descriptor, state);
        self.entities.hash(state);
        self.to_value.hash(state);
    }
}
