//! The move selector trait and its generic combinators.

use std::fmt::Debug;
use std::marker::PhantomData;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

/// A source of candidate moves for one step.
///
/// The iterator returned by [`iter_moves`](Self::iter_moves) reads what it
/// needs from the score director up front and only borrows the selector,
/// so the caller can evaluate each move on the same director while
/// iterating.
///
/// Lifecycle hooks mirror the solver's phases and steps. Random selectors
/// reseed from the seed handed to [`phase_started`](Self::phase_started).
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait MoveSelector<S: PlanningSolution, M: Move<S>>: Send + Debug {
    fn phase_started(&mut self, _seed: u64) {}

    fn step_started(&mut self) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}

    /// Returns the candidate moves for the current step.
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a mut self,
        score_director: &D,
    ) -> Box<dyn Iterator<Item = M> + 'a>;

    /// Returns the number of distinct moves this selector can produce.
    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize;

    /// Returns true if the iterator never ends on its own.
    fn is_never_ending(&self) -> bool {
        false
    }
}

/// Yields a fixed list of moves every step.
///
/// # Example
///
/// ```
/// use stepwise_solver::heuristic::r#move::ChangeMove;
/// use stepwise_solver::heuristic::selector::{MoveSelector, VecMoveSelector};
/// use stepwise_test::nqueens::{get_queen_row, nqueens_director, set_queen_row, NQueensSolution};
///
/// let moves: Vec<ChangeMove<NQueensSolution, i64>> = (0..4)
///     .map(|row| ChangeMove::new(0, Some(row), get_queen_row, set_queen_row, "row", 0))
///     .collect();
/// let mut selector = VecMoveSelector::new(moves);
/// let director = nqueens_director(&[0, 1, 2, 3]);
/// assert_eq!(selector.iter_moves(&director).count(), 4);
/// ```
pub struct VecMoveSelector<S, M> {
    moves: Vec<M>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M> VecMoveSelector<S, M> {
    pub fn new(moves: Vec<M>) -> Self {
        Self {
            moves,
            _phantom: PhantomData,
        }
    }
}

impl<S, M: Debug> Debug for VecMoveSelector<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecMoveSelector")
            .field("moves", &self.moves.len())
            .finish()
    }
}

impl<S, M> MoveSelector<S, M> for VecMoveSelector<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a mut self,
        _score_director: &D,
    ) -> Box<dyn Iterator<Item = M> + 'a> {
        Box::new(self.moves.iter().cloned())
    }

    fn size<D: ScoreDirector<S>>(&self, _score_director: &D) -> usize {
        self.moves.len()
    }
}

/// Combines moves from two selectors into a single stream.
///
/// In original order, yields all moves of the first selector, then all
/// moves of the second. In random order, each move comes from a child
/// picked with probability proportional to its size, and the stream never
/// ends.
pub struct UnionMoveSelector<S, M, A, B> {
    first: A,
    second: B,
    random: bool,
    rng: ChaCha8Rng,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, A, B> UnionMoveSelector<S, M, A, B> {
    /// Creates a union that exhausts `first` before `second`.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            random: false,
            rng: ChaCha8Rng::seed_from_u64(0),
            _phantom: PhantomData,
        }
    }

    /// Creates a union that interleaves both children at random.
    ///
    /// Both children should select randomly as well.
    pub fn random(first: A, second: B) -> Self {
        Self {
            random: true,
            ..Self::new(first, second)
        }
    }
}

impl<S, M, A: Debug, B: Debug> Debug for UnionMoveSelector<S, M, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("random", &self.random)
            .finish()
    }
}

impl<S, M, A, B> MoveSelector<S, M> for UnionMoveSelector<S, M, A, B>
where
    S: PlanningSolution,
    M: Move<S>,
    A: MoveSelector<S, M>,
    B: MoveSelector<S, M>,
{
    fn phase_started(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.first.phase_started(seed.wrapping_add(1));
        self.second.phase_started(seed.wrapping_add(2));
    }

    fn step_started(&mut self) {
        self.first.step_started();
        self.second.step_started();
    }

    fn step_ended(&mut self) {
        self.first.step_ended();
        self.second.step_ended();
    }

    fn phase_ended(&mut self) {
        self.first.phase_ended();
        self.second.phase_ended();
    }

    fn iter_moves<'a, D: ScoreDirector<S>>(
        &'a mut self,
        score_director: &D,
    ) -> Box<dyn Iterator<Item = M> + 'a> {
        if !self.random {
            let first = self.first.iter_moves(score_director);
            let second = self.second.iter_moves(score_director);
            return Box::new(first.chain(second));
        }

        let first_size = self.first.size(score_director);
        let total = first_size + self.second.size(score_director);
        if total == 0 {
            return Box::new(std::iter::empty());
        }
        let mut first = self.first.iter_moves(score_director);
        let mut second = self.second.iter_moves(score_director);
        let rng = &mut self.rng;
        Box::new(std::iter::from_fn(move || {
            if rng.random_range(0..total) < first_size {
                first.next().or_else(|| second.next())
            } else {
                second.next().or_else(|| first.next())
            }
        }))
    }

    fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        self.first.size(score_director) + self.second.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.random || self.first.is_never_ending() || self.second.is_never_ending()
    }
}
