//! Move selectors for chained planning variables.
//!
//! Each selector snapshots the chains at the start of the step and yields
//! only moves that are doable on that snapshot.

use std::collections::HashMap;
use std::fmt::Debug;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_core::error::Result;
use stepwise_core::StepwiseError;
use stepwise_scoring::ScoreDirector;

use crate::heuristic::r#move::{
    ChainedChangeMove, ChainedMove, SubChainChangeMove, SubChainReversingChangeMove,
    TailChainSwapMove, TwoOptMove,
};

use super::move_selector::MoveSelector;
use super::selection_order::{iter_in_order, SelectionOrder};

/// The chains of one variable, read from the working solution.
struct ChainSnapshot {
    anchor_count: usize,
    chains: Vec<Vec<usize>>,
    anchor_of: HashMap<usize, usize>,
    predecessor: Vec<Option<ChainValue>>,
}

impl ChainSnapshot {
    fn take<S>(descriptor: &ChainedVariableDescriptor<S>, solution: &S) -> Self {
        let anchor_count = descriptor.anchor_count(solution);
        let predecessor: Vec<Option<ChainValue>> = (0..descriptor.entity_count(solution))
            .map(|entity| descriptor.get(solution, entity))
            .collect();
        let trailing: HashMap<ChainValue, usize> = predecessor
            .iter()
            .enumerate()
            .filter_map(|(entity, value)| value.map(|value| (value, entity)))
            .collect();

        let mut chains = Vec::with_capacity(anchor_count);
        let mut anchor_of = HashMap::new();
        for anchor in 0..anchor_count {
            let mut chain = Vec::new();
            let mut cursor = ChainValue::Anchor(anchor);
            while let Some(&entity) = trailing.get(&cursor) {
                if anchor_of.insert(entity, anchor).is_some() || chain.len() > predecessor.len() {
                    break;
                }
                chain.push(entity);
                cursor = ChainValue::Entity(entity);
            }
            chains.push(chain);
        }
        Self {
            anchor_count,
            chains,
            anchor_of,
            predecessor,
        }
    }

    /// Anchors first, then every entity that sits on a chain.
    fn values(&self) -> Vec<ChainValue> {
        let mut values: Vec<ChainValue> = (0..self.anchor_count).map(ChainValue::Anchor).collect();
        values.extend(self.chains.iter().flatten().copied().map(ChainValue::Entity));
        values
    }

    fn anchor_of_value(&self, value: ChainValue) -> Option<usize> {
        match value {
            ChainValue::Anchor(anchor) => Some(anchor),
            ChainValue::Entity(entity) => self.anchor_of.get(&entity).copied(),
        }
    }
}

macro_rules! impl_chained_selector {
    ($name:ident) => {
        impl<S> $name<S> {
            pub fn with_selection_order(mut self, selection_order: SelectionOrder) -> Self {
                self.selection_order = selection_order;
                self
            }
        }

        impl<S> Debug for $name<S> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("variable_name", &self.descriptor.variable_name())
                    .field("selection_order", &self.selection_order)
                    .finish()
            }
        }

        impl<S: PlanningSolution> MoveSelector<S, ChainedMove<S>> for $name<S> {
            fn phase_started(&mut self, seed: u64) {
                self.rng = ChaCha8Rng::seed_from_u64(seed);
            }

            fn iter_moves<'a, D: ScoreDirector<S>>(
                &'a mut self,
                score_director: &D,
            ) -> Box<dyn Iterator<Item = ChainedMove<S>> + 'a> {
                let solution = score_director.working_solution();
                let snapshot = ChainSnapshot::take(&self.descriptor, solution);
                let candidates = self.candidates(&snapshot);
                iter_in_order(candidates, self.selection_order, &mut self.rng)
            }

            fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
                let solution = score_director.working_solution();
                self.candidates(&ChainSnapshot::take(&self.descriptor, solution)).len()
            }

            fn is_never_ending(&self) -> bool {
                self.selection_order.is_never_ending()
            }
        }
    };
}

/// Selects a new predecessor for every entity.
pub struct ChainedChangeMoveSelector<S> {
    descriptor: ChainedVariableDescriptor<S>,
    selection_order: SelectionOrder,
    rng: ChaCha8Rng,
}

impl<S> ChainedChangeMoveSelector<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>) -> Self {
        Self {
            descriptor,
            selection_order: SelectionOrder::Original,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    fn candidates(&self, snapshot: &ChainSnapshot) -> Vec<ChainedMove<S>> {
        let values = snapshot.values();
        let mut moves = Vec::new();
        for (entity, &current) in snapshot.predecessor.iter().enumerate() {
            for &value in &values {
                if value == ChainValue::Entity(entity) || Some(value) == current {
                    continue;
                }
                moves.push(ChainedChangeMove::new(self.descriptor, entity, Some(value)).into());
            }
        }
        moves
    }
}

impl_chained_selector!(ChainedChangeMoveSelector);

/// Selects sub-chains and a new predecessor for each, optionally reversed.
///
/// # Example
///
/// ```
/// use stepwise_solver::heuristic::selector::{MoveSelector, SubChainChangeMoveSelector};
/// use stepwise_test::routing::{previous_descriptor, routing_director, RoutingSolution};
///
/// let solution = RoutingSolution::line(2, 3, 10).with_chains(&[&[0, 1], &[2]]);
/// let director = routing_director(solution).unwrap();
///
/// let mut selector = SubChainChangeMoveSelector::new(previous_descriptor())
///     .with_maximum_sub_chain_size(1)
///     .unwrap()
///     .with_reversing(false);
/// // Each of the 3 single-entity sub-chains can go behind the 3 values
/// // that are neither itself nor its current predecessor.
/// assert_eq!(selector.iter_moves(&director).count(), 9);
/// ```
pub struct SubChainChangeMoveSelector<S> {
    descriptor: ChainedVariableDescriptor<S>,
    minimum_sub_chain_size: usize,
    maximum_sub_chain_size: Option<usize>,
    select_reversing_move_too: bool,
    selection_order: SelectionOrder,
    rng: ChaCha8Rng,
}

impl<S> SubChainChangeMoveSelector<S> {
    /// Creates a selector over sub-chains of any size, with reversing moves.
    pub fn new(descriptor: ChainedVariableDescriptor<S>) -> Self {
        Self {
            descriptor,
            minimum_sub_chain_size: 1,
            maximum_sub_chain_size: None,
            select_reversing_move_too: true,
            selection_order: SelectionOrder::Original,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Sets the smallest sub-chain to select.
    ///
    /// Fails with [`StepwiseError::Config`] if `size` is 0 or above the
    /// maximum sub-chain size.
    pub fn with_minimum_sub_chain_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(StepwiseError::Config(
                "minimum sub-chain size must be at least 1".to_string(),
            ));
        }
        if let Some(maximum) = self.maximum_sub_chain_size.filter(|&maximum| size > maximum) {
            return Err(StepwiseError::Config(format!(
                "minimum sub-chain size ({}) exceeds the maximum sub-chain size ({})",
                size, maximum
            )));
        }
        self.minimum_sub_chain_size = size;
        Ok(self)
    }

    /// Sets the largest sub-chain to select.
    ///
    /// Fails with [`StepwiseError::Config`] if `size` is 0 or below the
    /// minimum sub-chain size.
    pub fn with_maximum_sub_chain_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(StepwiseError::Config(
                "maximum sub-chain size must be at least 1".to_string(),
            ));
        }
        if size < self.minimum_sub_chain_size {
            return Err(StepwiseError::Config(format!(
                "maximum sub-chain size ({}) is below the minimum sub-chain size ({})",
                size, self.minimum_sub_chain_size
            )));
        }
        self.maximum_sub_chain_size = Some(size);
        Ok(self)
    }

    /// Also yields a reversing move for every sub-chain and destination.
    pub fn with_reversing(mut self, select_reversing_move_too: bool) -> Self {
        self.select_reversing_move_too = select_reversing_move_too;
        self
    }

    fn candidates(&self, snapshot: &ChainSnapshot) -> Vec<ChainedMove<S>> {
        let values = snapshot.values();
        let mut moves = Vec::new();
        for chain in &snapshot.chains {
            for start in 0..chain.len() {
                let longest = self
                    .maximum_sub_chain_size
                    .map_or(chain.len() - start, |max| max.min(chain.len() - start));
                for size in self.minimum_sub_chain_size..=longest {
                    let sub_chain = &chain[start..start + size];
                    let old_first = snapshot.predecessor[sub_chain[0]];
                    for &value in &values {
                        if value.entity_index().is_some_and(|e| sub_chain.contains(&e)) {
                            continue;
                        }
                        let unmoved = Some(value) == old_first;
                        if !unmoved {
                            moves.push(
                                SubChainChangeMove::new(self.descriptor, sub_chain.to_vec(), value)
                                    .into(),
                            );
                        }
                        if self.select_reversing_move_too && !(unmoved && size == 1) {
                            moves.push(
                                SubChainReversingChangeMove::new(
                                    self.descriptor,
                                    sub_chain.to_vec(),
                                    value,
                                )
                                .into(),
                            );
                        }
                    }
                }
            }
        }
        moves
    }
}

impl_chained_selector!(SubChainChangeMoveSelector);

/// Selects an entity and a value on another chain whose tails to swap.
pub struct TailChainSwapMoveSelector<S> {
    descriptor: ChainedVariableDescriptor<S>,
    selection_order: SelectionOrder,
    rng: ChaCha8Rng,
}

impl<S> TailChainSwapMoveSelector<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>) -> Self {
        Self {
            descriptor,
            selection_order: SelectionOrder::Original,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    fn candidates(&self, snapshot: &ChainSnapshot) -> Vec<ChainedMove<S>> {
        let values = snapshot.values();
        let mut moves = Vec::new();
        for (left_anchor, chain) in snapshot.chains.iter().enumerate() {
            for &left in chain {
                for &value in &values {
                    if snapshot.anchor_of_value(value) == Some(left_anchor) {
                        continue;
                    }
                    moves.push(TailChainSwapMove::new(self.descriptor, left, value).into());
                }
            }
        }
        moves
    }
}

impl_chained_selector!(TailChainSwapMoveSelector);

/// Selects every path of two or more entities inside one chain.
pub struct TwoOptMoveSelector<S> {
    descriptor: ChainedVariableDescriptor<S>,
    selection_order: SelectionOrder,
    rng: ChaCha8Rng,
}

impl<S> TwoOptMoveSelector<S> {
    pub fn new(descriptor: ChainedVariableDescriptor<S>) -> Self {
        Self {
            descriptor,
            selection_order: SelectionOrder::Original,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    fn candidates(&self, snapshot: &ChainSnapshot) -> Vec<ChainedMove<S>> {
        let mut moves = Vec::new();
        for chain in &snapshot.chains {
            for (i, &first) in chain.iter().enumerate() {
                for &last in &chain[i + 1..] {
                    moves.push(TwoOptMove::new(self.descriptor, first, last).into());
                }
            }
        }
        moves
    }
}

impl_chained_selector!(TwoOptMoveSelector);
