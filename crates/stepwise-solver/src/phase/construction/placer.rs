//! Entity placers for the construction heuristic.
//!
//! A placer lists the entities that still need a value, each with the
//! candidate moves that would assign one.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use crate::heuristic::r#move::{ChangeMove, Move};

/// An uninitialized entity with the moves that can initialize it.
pub struct Placement<S, M> {
    entity_index: usize,
    moves: Vec<M>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: PlanningSolution, M: Move<S>> Placement<S, M> {
    pub fn new(entity_index: usize, moves: Vec<M>) -> Self {
        Self {
            entity_index,
            moves,
            _phantom: PhantomData,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Takes ownership of the move at `index`.
    pub fn take_move(&mut self, index: usize) -> M {
        self.moves.swap_remove(index)
    }
}

impl<S, M> Debug for Placement<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placement")
            .field("entity_index", &self.entity_index)
            .field("move_count", &self.moves.len())
            .finish()
    }
}

/// Lists the placements of a construction phase.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait EntityPlacer<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Returns one placement per uninitialized entity, in placing order.
    fn get_placements<D: ScoreDirector<S>>(&self, score_director: &D) -> Vec<Placement<S, M>>;
}

/// Places entities in index order, trying every value of the range.
///
/// # Example
///
/// ```
/// use stepwise_solver::phase::construction::{EntityPlacer, QueuedEntityPlacer};
/// use stepwise_test::toy::{entity_count, get_value, set_value, toy_director, value_range, ToySolution};
///
/// let placer = QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0);
/// let director = toy_director(ToySolution::with_values(&[0, 1, 0, 1]));
/// // Nothing left to place.
/// assert!(placer.get_placements(&director).is_empty());
/// ```
pub struct QueuedEntityPlacer<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    entity_count: fn(&S) -> usize,
    value_range: fn(&S) -> Vec<V>,
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> QueuedEntityPlacer<S, V> {
    pub fn new(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        entity_count: fn(&S) -> usize,
        value_range: fn(&S) -> Vec<V>,
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            getter,
            setter,
            entity_count,
            value_range,
            variable_name,
            descriptor_index,
        }
    }
}

impl<S, V> Debug for QueuedEntityPlacer<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedEntityPlacer")
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .finish()
    }
}

impl<S, V> EntityPlacer<S, ChangeMove<S, V>> for QueuedEntityPlacer<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Eq + Hash + Send + Sync + Debug + 'static,
{
    fn get_placements<D: ScoreDirector<S>>(
        &self,
        score_director: &D,
    ) -> Vec<Placement<S, ChangeMove<S, V>>> {
        let solution = score_director.working_solution();
        let values = (self.value_range)(solution);

        (0..(self.entity_count)(solution))
            .filter(|&entity| (self.getter)(solution, entity).is_none())
            .filter_map(|entity| {
                let moves: Vec<_> = values
                    .iter()
                    .map(|value| {
                        ChangeMove::new(
                            entity,
                            Some(value.clone()),
                            self.getter,
                            self.setter,
                            self.variable_name,
                            self.descriptor_index,
                        )
                    })
                    .collect();
                (!moves.is_empty()).then(|| Placement::new(entity, moves))
            })
            .collect()
    }
}
