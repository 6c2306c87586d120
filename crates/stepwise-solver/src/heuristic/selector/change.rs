//! Change move selector for basic planning variables.

use std::fmt::Debug;
use std::marker::PhantomData;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use crate::heuristic::r#move::ChangeMove;

use super::move_selector::MoveSelector;
use super::selection_order::SelectionOrder;

/// Generates a `ChangeMove` for every entity and every value of its range.
///
/// Stores typed function pointers, like the moves it creates.
///
/// # Example
///
/// ```
/// use stepwise_solver::heuristic::selector::{ChangeMoveSelector, MoveSelector};
/// use stepwise_test::nqueens::{
///     get_queen_row, nqueens_director, queen_count, row_values, set_queen_row,
/// };
///
/// let mut selector = ChangeMoveSelector::new(
///     get_queen_row, set_queen_row, queen_count, row_values, "row", 0,
/// );
/// let director = nqueens_director(&[0, 1, 2, 3]);
/// // 4 queens times 4 rows
/// assert_eq!(selector.iter_moves(&director).count(), 16);
/// ```
pub struct ChangeMoveSelector<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    entity_count: fn(&S) -> usize,
    value_range: fn(&S) -> Vec<V>,
    variable_name: &'static str,
    descriptor_index: usize,
    selection_order: SelectionOrder,
    rng: ChaCha8Rng,
    _phantom: PhantomData<fn() -> V>,
}

impl<S, V> ChangeMoveSelector<S, V> {
    /// Creates a selector in original order.
    ///
    /// # Arguments
    /// * `getter` - Reads the variable of an entity
    /// * `setter` - Writes the variable of an entity
    /// * `entity_count` - Number of entities carrying the variable
    /// * `value_range` - Values the variable may take
    /// * `variable_name` - Name of the variable
    /// * `descriptor_index` - Index of the entity descriptor
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
            selection_order: SelectionOrder::Original,
            rng: ChaCha8Rng::seed_from_u64(0),
            _phantom: PhantomData,
        }
    }

    pub fn with_selection_order(mut self, selection_order: SelectionOrder) -> Self {
        self.selection_order = selection_order;
        self
    }

    pub fn selection_order(&self) -> SelectionOrder {
        self.selection_order
    }
}

impl<S, V> Debug for ChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("variable_name", &self.variable_name)
            .field("descriptor_index", &self.descriptor_index)
            .field("selection_order", &self.selection_order)
            .finish()
    }
}

impl<S, V> MoveSelector<S, ChangeMove<S, V>> for ChangeMoveSelector<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Eq + std::hash::Hash + Send + Sync + Debug + 'static,
{
    fn phase_started(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a mut self,
        score_director: &D,
    ) -> Box<dyn Iterator<Item = ChangeMove<S, V>> + 'a> {
        let solution = score_director.working_solution();
        let entity_count = (self.entity_count)(solution);
        let values = (self.value_range)(solution);
        let (getter, setter) = (self.getter, self.setter);
        let (variable_name, descriptor_index) = (self.variable_name, self.descriptor_index);
        let make = move |entity: usize, value: V| {
            ChangeMove::new(entity, Some(value), getter, setter, variable_name, descriptor_index)
        };

        match self.selection_order {
            SelectionOrder::Original => Box::new((0..entity_count).flat_map(move |entity| {
                values.clone().into_iter().map(move |value| make(entity, value))
            })),
            SelectionOrder::Shuffled => {
                let mut pairs: Vec<(usize, usize)> = (0..entity_count)
                    .flat_map(|entity| (0..values.len()).map(move |value| (entity, value)))
                    .collect();
                pairs.shuffle(&mut self.rng);
                Box::new(
                    pairs
                        .into_iter()
                        .map(move |(entity, value)| make(entity, values[value].clone())),
                )
            }
            SelectionOrder::Random => {
                if entity_count == 0 || values.is_empty() {
                    return Box::new(std::iter::empty());
                }
                let rng = &mut self.rng;
                Box::new(std::iter::repeat_with(move || {
                    let entity = rng.random_range(0..entity_count);
                    let value = values[rng.random_range(0..values.len())].clone();
                    make(entity, value)
                }))
            }
        }
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        (self.entity_count)(solution) * (self.value_range)(solution).len()
    }

    fn is_never_ending(&self) -> bool {
        self.selection_order.is_never_ending()
    }
}
