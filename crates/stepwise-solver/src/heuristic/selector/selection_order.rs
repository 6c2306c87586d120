//! Selection order configuration for selectors.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Defines the order in which a selector yields its moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionOrder {
    /// Every move once, in the order of the underlying collections.
    ///
    /// Deterministic and reproducible.
    #[default]
    Original,

    /// Moves drawn at random with replacement.
    ///
    /// The same move may be selected multiple times and the iterator never
    /// ends; the forager or the termination stops the step.
    Random,

    /// Every move once, in an order shuffled at the start of each step.
    Shuffled,
}

impl SelectionOrder {
    /// Returns `true` if this selection order uses the selector's random generator.
    pub fn is_random(&self) -> bool {
        matches!(self, SelectionOrder::Random | SelectionOrder::Shuffled)
    }

    /// Returns `true` if iterators in this order never end on their own.
    pub fn is_never_ending(&self) -> bool {
        matches!(self, SelectionOrder::Random)
    }
}

/// Yields `candidates` in `order`, drawing from `rng` where needed.
pub(crate) fn iter_in_order<'a, M: Clone + 'a>(
    mut candidates: Vec<M>,
    order: SelectionOrder,
    rng: &'a mut ChaCha8Rng,
) -> Box<dyn Iterator<Item = M> + 'a> {
    match order {
        SelectionOrder::Original => Box::new(candidates.into_iter()),
        SelectionOrder::Shuffled => {
            candidates.shuffle(rng);
            Box::new(candidates.into_iter())
        }
        SelectionOrder::Random if candidates.is_empty() => Box::new(std::iter::empty()),
        SelectionOrder::Random => Box::new(std::iter::repeat_with(move || {
            candidates[rng.random_range(0..candidates.len())].clone()
        })),
    }
}
