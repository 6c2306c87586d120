//! Trailing entity and anchor lookups for one chained variable.
//!
//! # Index-Based Design
//!
//! - `trailing`: `ChainValue -> entity index` ("who points at this value?")
//! - `anchors`: `entity index -> anchor index` ("which chain am I in?")
//!
//! Both maps are maintained incrementally from variable change
//! notifications: the old link is retracted before a change, the entity
//! is marked dirty after it, and [`ChainSupply::refresh`] re-inserts dirty
//! links and re-roots the affected chains once the whole move is applied.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::domain::{ChainValue, ChainedVariableDescriptor};
use crate::error::{Result, StepwiseError};

/// Index-based supply of trailing entities and anchors for a chained variable.
///
/// # Example
///
/// ```
/// use stepwise_core::domain::{ChainSupply, ChainValue, ChainedVariableDescriptor};
///
/// #[derive(Clone)]
/// struct Route { previous: Vec<Option<ChainValue>> }
///
/// let descriptor = ChainedVariableDescriptor::<Route>::new(
///     "previous", 0,
///     |s, i| s.previous[i],
///     |s, i, v| s.previous[i] = v,
///     |s| s.previous.len(),
///     |_| 1,
/// );
///
/// // anchor#0 <- entity#1 <- entity#0
/// let route = Route {
///     previous: vec![Some(ChainValue::Entity(1)), Some(ChainValue::Anchor(0))],
/// };
/// let supply = ChainSupply::build(descriptor, &route).unwrap();
///
/// assert_eq!(supply.trailing_entity(ChainValue::Anchor(0)), Some(1));
/// assert_eq!(supply.trailing_entity(ChainValue::Entity(1)), Some(0));
/// assert_eq!(supply.trailing_entity(ChainValue::Entity(0)), None);
/// assert_eq!(supply.anchor_of(0), Some(0));
/// assert_eq!(supply.chain(0), vec![1, 0]);
/// ```
pub struct ChainSupply<S> {
    descriptor: ChainedVariableDescriptor<S>,
    trailing: HashMap<ChainValue, usize>,
    anchors: HashMap<usize, usize>,
    dirty: BTreeSet<usize>,
}

impl<S> ChainSupply<S> {
    /// Builds the supply from the current state of `solution`.
    ///
    /// Fails with a domain model error if two entities share a predecessor
    /// or an entity is part of a cycle.
    pub fn build(descriptor: ChainedVariableDescriptor<S>, solution: &S) -> Result<Self> {
        let mut supply = Self {
            descriptor,
            trailing: HashMap::new(),
            anchors: HashMap::new(),
            dirty: BTreeSet::new(),
        };
        supply.rebuild(solution)?;
        Ok(supply)
    }

    /// Recomputes both lookups from scratch.
    pub fn rebuild(&mut self, solution: &S) -> Result<()> {
        self.trailing.clear();
        self.anchors.clear();
        self.dirty.clear();

        let entity_count = self.descriptor.entity_count(solution);
        for entity in 0..entity_count {
            if let Some(value) = self.descriptor.get(solution, entity) {
                if value == ChainValue::Entity(entity) {
                    return Err(StepwiseError::DomainModel(format!(
                        "entity#{} of variable '{}' points at itself",
                        entity,
                        self.descriptor.variable_name()
                    )));
                }
                if let Some(other) = self.trailing.insert(value, entity) {
                    return Err(StepwiseError::DomainModel(format!(
                        "entities #{} and #{} of variable '{}' both follow {}",
                        other,
                        entity,
                        self.descriptor.variable_name(),
                        value
                    )));
                }
            }
        }

        let mut rooted = 0;
        for anchor in 0..self.descriptor.anchor_count(solution) {
            rooted += self.reroot(anchor, entity_count);
        }
        let assigned = self.trailing.len();
        if rooted != assigned {
            return Err(StepwiseError::DomainModel(format!(
                "{} of {} assigned entities of variable '{}' are not reachable from an anchor (cycle)",
                assigned - rooted,
                assigned,
                self.descriptor.variable_name()
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn descriptor(&self) -> &ChainedVariableDescriptor<S> {
        &self.descriptor
    }

    #[inline]
    pub fn variable_name(&self) -> &'static str {
        self.descriptor.variable_name()
    }

    /// Returns the entity whose predecessor is `value`, if any.
    #[inline]
    pub fn trailing_entity(&self, value: ChainValue) -> Option<usize> {
        self.trailing.get(&value).copied()
    }

    /// Returns the anchor index at the root of the entity's chain.
    #[inline]
    pub fn anchor_of(&self, entity: usize) -> Option<usize> {
        self.anchors.get(&entity).copied()
    }

    /// Returns the anchor of a value: the value itself for anchors.
    pub fn anchor_of_value(&self, value: ChainValue) -> Option<usize> {
        match value {
            ChainValue::Anchor(anchor) => Some(anchor),
            ChainValue::Entity(entity) => self.anchor_of(entity),
        }
    }

    /// Returns the entities of the anchor's chain, nearest to the anchor first.
    pub fn chain(&self, anchor: usize) -> Vec<usize> {
        let mut entities = Vec::new();
        let mut next = self.trailing_entity(ChainValue::Anchor(anchor));
        while let Some(entity) = next {
            entities.push(entity);
            next = self.trailing_entity(ChainValue::Entity(entity));
            if entities.len() > self.trailing.len() {
                panic!(
                    "Chain of anchor#{} for variable '{}' is cyclic",
                    anchor,
                    self.descriptor.variable_name()
                );
            }
        }
        entities
    }

    /// Returns the last entity of the chain containing `value`.
    pub fn last_entity(&self, value: ChainValue) -> Option<usize> {
        let mut last = value.entity_index();
        let mut cursor = value;
        while let Some(entity) = self.trailing_entity(cursor) {
            last = Some(entity);
            cursor = ChainValue::Entity(entity);
        }
        last
    }

    /// Called before `entity`'s variable changes: drops its current link.
    pub fn retract(&mut self, solution: &S, entity: usize) {
        if let Some(old_value) = self.descriptor.get(solution, entity) {
            if self.trailing.get(&old_value) == Some(&entity) {
                self.trailing.remove(&old_value);
            }
        }
    }

    /// Called after `entity`'s variable changed: schedules the new link.
    pub fn mark_dirty(&mut self, entity: usize) {
        self.dirty.insert(entity);
    }

    /// Returns true if links are pending since the last refresh.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Inserts pending links and re-roots every chain they touched.
    ///
    /// # Panics
    /// Panics if the pending links make two entities follow the same value
    /// or close a cycle; either means a move broke the chain.
    pub fn refresh(&mut self, solution: &S) {
        if self.dirty.is_empty() {
            return;
        }
        let dirty = std::mem::take(&mut self.dirty);
        let mut affected_anchors = BTreeSet::new();

        for &entity in &dirty {
            if let Some(old_anchor) = self.anchors.remove(&entity) {
                affected_anchors.insert(old_anchor);
            }
            if let Some(value) = self.descriptor.get(solution, entity) {
                if let Some(other) = self.trailing.insert(value, entity) {
                    if other != entity {
                        panic!(
                            "Chained variable '{}' branches: entities #{} and #{} both follow {}",
                            self.descriptor.variable_name(),
                            other,
                            entity,
                            value
                        );
                    }
                }
            }
        }

        let entity_count = self.descriptor.entity_count(solution);
        for &entity in &dirty {
            if let Some(anchor) = self.walk_to_anchor(solution, entity, entity_count) {
                affected_anchors.insert(anchor);
            }
        }
        for anchor in affected_anchors {
            self.reroot(anchor, entity_count);
        }
    }

    fn walk_to_anchor(&self, solution: &S, entity: usize, entity_count: usize) -> Option<usize> {
        let mut value = self.descriptor.get(solution, entity)?;
        for _ in 0..=entity_count {
            match value {
                ChainValue::Anchor(anchor) => return Some(anchor),
                ChainValue::Entity(previous) => value = self.descriptor.get(solution, previous)?,
            }
        }
        panic!(
            "Chained variable '{}' contains a cycle through entity#{}",
            self.descriptor.variable_name(),
            entity
        );
    }

    /// Assigns `anchor` to every entity of its chain, returning the chain length.
    fn reroot(&mut self, anchor: usize, entity_count: usize) -> usize {
        let mut count = 0;
        let mut next = self.trailing_entity(ChainValue::Anchor(anchor));
        while let Some(entity) = next {
            self.anchors.insert(entity, anchor);
            count += 1;
            if count > entity_count {
                panic!(
                    "Chain of anchor#{} for variable '{}' is cyclic",
                    anchor,
                    self.descriptor.variable_name()
                );
            }
            next = self.trailing_entity(ChainValue::Entity(entity));
        }
        count
    }
}

impl<S> Clone for ChainSupply<S> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            trailing: self.trailing.clone(),
            anchors: self.anchors.clone(),
            dirty: self.dirty.clone(),
        }
    }
}

impl<S> fmt::Debug for ChainSupply<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSupply")
            .field("variable_name", &self.descriptor.variable_name())
            .field("links", &self.trailing.len())
            .field("dirty", &self.dirty.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Chains {
        previous: Vec<Option<ChainValue>>,
        anchors: usize,
    }

    fn descriptor() -> ChainedVariableDescriptor<Chains> {
        ChainedVariableDescriptor::new(
            "previous",
            0,
            |s, i| s.previous[i],
            |s, i, v| s.previous[i] = v,
            |s| s.previous.len(),
            |s| s.anchors,
        )
    }

    // anchor#0 <- 0 <- 1 <- 2    anchor#1 <- 3
    fn two_chains() -> Chains {
        Chains {
            previous: vec![
                Some(ChainValue::Anchor(0)),
                Some(ChainValue::Entity(0)),
                Some(ChainValue::Entity(1)),
                Some(ChainValue::Anchor(1)),
            ],
            anchors: 2,
        }
    }

    fn change(supply: &mut ChainSupply<Chains>, s: &mut Chains, entity: usize, v: ChainValue) {
        supply.retract(s, entity);
        s.previous[entity] = Some(v);
        supply.mark_dirty(entity);
    }

    #[test]
    fn test_build() {
        let supply = ChainSupply::build(descriptor(), &two_chains()).unwrap();
        assert_eq!(supply.chain(0), vec![0, 1, 2]);
        assert_eq!(supply.chain(1), vec![3]);
        assert_eq!(supply.anchor_of(2), Some(0));
        assert_eq!(supply.anchor_of(3), Some(1));
        assert_eq!(supply.last_entity(ChainValue::Anchor(0)), Some(2));
        assert_eq!(supply.last_entity(ChainValue::Entity(3)), Some(3));
    }

    #[test]
    fn test_build_rejects_branch() {
        let mut chains = two_chains();
        chains.previous[3] = Some(ChainValue::Entity(0));
        let err = ChainSupply::build(descriptor(), &chains).unwrap_err();
        assert!(matches!(err, StepwiseError::DomainModel(_)));
    }

    #[test]
    fn test_build_rejects_cycle() {
        let chains = Chains {
            previous: vec![Some(ChainValue::Entity(1)), Some(ChainValue::Entity(0))],
            anchors: 1,
        };
        let err = ChainSupply::build(descriptor(), &chains).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_incremental_splice_matches_rebuild() {
        let mut chains = two_chains();
        let mut supply = ChainSupply::build(descriptor(), &chains).unwrap();

        // Move entity 1 behind entity 3: close old chain, relocate, no new trailing.
        change(&mut supply, &mut chains, 2, ChainValue::Entity(0));
        change(&mut supply, &mut chains, 1, ChainValue::Entity(3));
        assert!(supply.is_dirty());
        supply.refresh(&chains);

        assert_eq!(supply.chain(0), vec![0, 2]);
        assert_eq!(supply.chain(1), vec![3, 1]);
        assert_eq!(supply.anchor_of(1), Some(1));

        let rebuilt = ChainSupply::build(descriptor(), &chains).unwrap();
        assert_eq!(rebuilt.trailing, supply.trailing);
        assert_eq!(rebuilt.anchors, supply.anchors);
    }

    #[test]
    fn test_unassigning_entity_drops_anchor() {
        let mut chains = two_chains();
        let mut supply = ChainSupply::build(descriptor(), &chains).unwrap();

        supply.retract(&chains, 3);
        chains.previous[3] = None;
        supply.mark_dirty(3);
        supply.refresh(&chains);

        assert_eq!(supply.anchor_of(3), None);
        assert_eq!(supply.trailing_entity(ChainValue::Anchor(1)), None);
        assert!(supply.chain(1).is_empty());
    }
}
