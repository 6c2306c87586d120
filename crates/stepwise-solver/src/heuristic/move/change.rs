//! ChangeMove - assigns a value to a planning variable.
//!
//! This is the most fundamental move type. It takes a value and assigns
//! it to a basic (non chained) planning variable on an entity.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use smallvec::{smallvec, SmallVec};
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::{begin_variable_change, ScoreDirector};

use super::Move;

/// A move that assigns a value to an entity's variable.
///
/// Stores typed function pointers, so no trait objects are involved when
/// the move reads or writes the solution.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The variable value type
///
/// # Example
///
/// ```
/// use stepwise_scoring::ScoreDirector;
/// use stepwise_solver::heuristic::r#move::{ChangeMove, Move};
/// use stepwise_test::nqueens::{get_queen_row, nqueens_director, set_queen_row};
///
/// let mut director = nqueens_director(&[0, 1, 2, 3]);
/// let mv = ChangeMove::new(1, Some(3), get_queen_row, set_queen_row, "row", 0);
///
/// let undo = mv.create_undo_move(&director);
/// mv.do_move(&mut director);
/// assert_eq!(get_queen_row(director.working_solution(), 1), Some(3));
///
/// undo.do_move(&mut director);
/// assert_eq!(get_queen_row(director.working_solution(), 1), Some(1));
/// ```
pub struct ChangeMove<S, V> {
    entity_index: usize,
    to_value: Option<V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V: Clone> Clone for ChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            to_value: self.to_value.clone(),
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V: Debug> Debug for ChangeMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMove")
            .field("entity_index", &self.entity_index)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V: PartialEq> PartialEq for ChangeMove<S, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entity_index == other.entity_index
            && self.descriptor_index == other.descriptor_index
            && self.variable_name == other.variable_name
            && self.to_value == other.to_value
    }
}

impl<S, V: Eq> Eq for ChangeMove<S, V> {}

impl<S, V: Hash> Hash for ChangeMove<S, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity_index.hash(state);
        self.descriptor_index.hash(state);
        self.variable_name.hash(state);
        self.to_value.hash(state);
    }
}

impl<S, V> ChangeMove<S, V> {
    /// Creates a new change move with typed function pointers.
    ///
    /// # Arguments
    /// * `entity_index` - Index of the entity in its collection
    /// * `to_value` - The value to assign (None to unassign)
    /// * `getter` - Function pointer to get current value from solution
    /// * `setter` - Function pointer to set value on solution
    /// * `variable_name` - Name of the variable
    /// * `descriptor_index` - Index of the entity descriptor
    pub fn new(
        entity_index: usize,
        to_value: Option<V>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_index,
            to_value,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }
}

impl<S, V> Move<S> for ChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Eq + Hash + Send + Sync + Debug + 'static,
{
    type Value = V;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let current = (self.getter)(score_director.working_solution(), self.entity_index);
        current != self.to_value
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let current = (self.getter)(score_director.working_solution(), self.entity_index);
        Self {
            to_value: current,
            ..self.clone()
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let mut change = begin_variable_change(
            score_director,
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
        (self.setter)(
            change.working_solution_mut(),
            self.entity_index,
            self.to_value.clone(),
        );
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn variable_name(&self) -> &'static str {
        self.variable_name
    }

    fn planning_entities(&self) -> SmallVec<[usize; 4]> {
        smallvec![self.entity_index]
    }

    fn planning_values(&self) -> SmallVec<[V; 4]> {
        self.to_value.iter().cloned().collect()
    }
}
