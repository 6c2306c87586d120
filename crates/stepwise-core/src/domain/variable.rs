//! Chained planning variable metadata.
//!
//! A chained variable points at its *predecessor*: either an anchor (the
//! chain root, a problem fact) or another entity of the same chain:
//!
//! ```text
//! anchor#0 <- entity#4 <- entity#1 <- entity#7
//! ```
//!
//! Values are plain indices into the solution's anchor and entity
//! collections, so chains form an arena rather than a pointer graph.

use std::fmt;

/// Value of a chained planning variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainValue {
    /// The chain root at this anchor index.
    Anchor(usize),
    /// Another planning entity at this entity index.
    Entity(usize),
}

impl ChainValue {
    #[inline]
    pub fn is_anchor(&self) -> bool {
        matches!(self, ChainValue::Anchor(_))
    }

    /// Returns the entity index if this value is an entity.
    #[inline]
    pub fn entity_index(&self) -> Option<usize> {
        match self {
            ChainValue::Entity(idx) => Some(*idx),
            ChainValue::Anchor(_) => None,
        }
    }
}

impl fmt::Display for ChainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainValue::Anchor(idx) => write!(f, "anchor#{}", idx),
            ChainValue::Entity(idx) => write!(f, "entity#{}", idx),
        }
    }
}

/// Typed accessors for one chained planning variable of solution `S`.
///
/// Uses function pointers so moves and supplies stay monomorphized and
/// `Copy` without boxing closures.
///
/// # Example
///
/// ```
/// use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor};
///
/// #[derive(Clone)]
/// struct Route { previous: Vec<Option<ChainValue>>, vehicles: usize }
///
/// let descriptor = ChainedVariableDescriptor::<Route>::new(
///     "previous",
///     0,
///     |s, i| s.previous[i],
///     |s, i, v| s.previous[i] = v,
///     |s| s.previous.len(),
///     |s| s.vehicles,
/// );
///
/// let mut route = Route { previous: vec![None, None], vehicles: 1 };
/// descriptor.set(&mut route, 1, Some(ChainValue::Anchor(0)));
/// assert_eq!(descriptor.get(&route, 1), Some(ChainValue::Anchor(0)));
/// assert_eq!(descriptor.entity_count(&route), 2);
/// ```
pub struct ChainedVariableDescriptor<S> {
    variable_name: &'static str,
    descriptor_index: usize,
    getter: fn(&S, usize) -> Option<ChainValue>,
    setter: fn(&mut S, usize, Option<ChainValue>),
    entity_count: fn(&S) -> usize,
    anchor_count: fn(&S) -> usize,
}

impl<S> ChainedVariableDescriptor<S> {
    pub fn new(
        variable_name: &'static str,
        descriptor_index: usize,
        getter: fn(&S, usize) -> Option<ChainValue>,
        setter: fn(&mut S, usize, Option<ChainValue>),
        entity_count: fn(&S) -> usize,
        anchor_count: fn(&S) -> usize,
    ) -> Self {
        Self {
            variable_name,
            descriptor_index,
            getter,
            setter,
            entity_count,
            anchor_count,
        }
    }

    #[inline]
    pub fn variable_name(&self) -> &'static str {
        self.variable_name
    }

    #[inline]
    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    /// Reads the predecessor of `entity_index`.
    #[inline]
    pub fn get(&self, solution: &S, entity_index: usize) -> Option<ChainValue> {
        (self.getter)(solution, entity_index)
    }

    /// Writes the predecessor of `entity_index`.
    ///
    /// Callers inside the solver must bracket this with variable change
    /// notifications.
    #[inline]
    pub fn set(&self, solution: &mut S, entity_index: usize, value: Option<ChainValue>) {
        (self.setter)(solution, entity_index, value)
    }

    #[inline]
    pub fn entity_count(&self, solution: &S) -> usize {
        (self.entity_count)(solution)
    }

    #[inline]
    pub fn anchor_count(&self, solution: &S) -> usize {
        (self.anchor_count)(solution)
    }

    /// True if both descriptors address the same variable.
    pub fn is_same_variable(&self, other: &Self) -> bool {
        self.variable_name == other.variable_name && self.descriptor_index == other.descriptor_index
    }
}

impl<S> Clone for ChainedVariableDescriptor<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for ChainedVariableDescriptor<S> {}

impl<S> fmt::Debug for ChainedVariableDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedVariableDescriptor")
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .finish()
    }
}
