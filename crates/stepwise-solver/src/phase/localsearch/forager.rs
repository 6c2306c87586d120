//! Foragers for local search move selection
//!
//! Foragers collect accepted moves during a step and select the
//! best one to apply.

use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepwise_config::PickEarlyType;
use stepwise_core::domain::PlanningSolution;

use crate::heuristic::r#move::Move;

/// Trait for collecting and selecting moves in local search.
///
/// Foragers are responsible for:
/// - Collecting accepted moves during move evaluation
/// - Deciding when to quit evaluating early
/// - Selecting the best move to apply
pub trait LocalSearchForager<S, M>: Send + Debug
where
    S: PlanningSolution,
    M: Move<S>,
{
    /// Called when a phase starts, with the seed for tie breaking.
    fn phase_started(&mut self, _seed: u64) {}

    /// Called at the start of each step to reset state.
    fn step_started(&mut self, best_score: S::Score, last_step_score: S::Score);

    /// Adds an accepted move to the forager.
    fn add_move(&mut self, mv: M, score: S::Score);

    /// Returns true if the forager has collected enough moves and
    /// wants to stop evaluating more.
    fn is_quit_early(&self) -> bool;

    /// Picks the best move from those collected.
    ///
    /// Returns None if no moves were accepted.
    fn pick_move(&mut self) -> Option<(M, S::Score)>;

    fn phase_ended(&mut self) {}
}

/// Picks the highest scoring accepted move.
///
/// Evaluation of a step stops early once `accepted_count_limit` moves were
/// accepted, or as soon as a move satisfies the pick early type. Moves tied
/// for the highest score are finalists: the first one seen wins, or one is
/// chosen uniformly at random when ties are broken randomly.
///
/// # Example
///
/// ```
/// use stepwise_core::score::SimpleScore;
/// use stepwise_solver::heuristic::r#move::ChangeMove;
/// use stepwise_solver::phase::localsearch::{AcceptedCountForager, LocalSearchForager};
/// use stepwise_test::nqueens::{get_queen_row, set_queen_row, NQueensSolution};
///
/// type RowMove = ChangeMove<NQueensSolution, i64>;
/// let row = |r| RowMove::new(0, Some(r), get_queen_row, set_queen_row, "row", 0);
///
/// let mut forager = AcceptedCountForager::<NQueensSolution, RowMove>::new();
/// forager.step_started(SimpleScore::of(-5), SimpleScore::of(-5));
/// forager.add_move(row(1), SimpleScore::of(-6));
/// forager.add_move(row(2), SimpleScore::of(-4));
/// forager.add_move(row(3), SimpleScore::of(-4));
///
/// let (picked, score) = forager.pick_move().unwrap();
/// assert_eq!(picked, row(2));
/// assert_eq!(score, SimpleScore::of(-4));
/// ```
pub struct AcceptedCountForager<S, M>
where
    S: PlanningSolution,
{
    accepted_count_limit: usize,
    pick_early_type: PickEarlyType,
    break_tie_randomly: bool,
    rng: ChaCha8Rng,
    best_score: Option<S::Score>,
    last_step_score: Option<S::Score>,
    accepted_count: usize,
    /// Accepted moves tied for the highest score, in acceptance order.
    finalists: Vec<(M, S::Score)>,
    picked_early: bool,
}

impl<S, M> AcceptedCountForager<S, M>
where
    S: PlanningSolution,
{
    /// Creates a forager that evaluates every move and breaks ties by
    /// acceptance order.
    pub fn new() -> Self {
        Self {
            accepted_count_limit: usize::MAX,
            pick_early_type: PickEarlyType::Never,
            break_tie_randomly: false,
            rng: ChaCha8Rng::seed_from_u64(0),
            best_score: None,
            last_step_score: None,
            accepted_count: 0,
            finalists: Vec::new(),
            picked_early: false,
        }
    }

    /// Stop evaluating a step after this many accepted moves.
    pub fn with_accepted_count_limit(mut self, limit: usize) -> Self {
        self.accepted_count_limit = limit.max(1);
        self
    }

    pub fn with_pick_early_type(mut self, pick_early_type: PickEarlyType) -> Self {
        self.pick_early_type = pick_early_type;
        self
    }

    pub fn with_break_tie_randomly(mut self, break_tie_randomly: bool) -> Self {
        self.break_tie_randomly = break_tie_randomly;
        self
    }

    pub fn accepted_count_limit(&self) -> usize {
        self.accepted_count_limit
    }

    pub fn pick_early_type(&self) -> PickEarlyType {
        self.pick_early_type
    }

    /// Number of moves accepted in the current step.
    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    fn is_pick_early(&self, score: S::Score) -> bool {
        match self.pick_early_type {
            PickEarlyType::Never => false,
            PickEarlyType::FirstBestScoreImproving => {
                self.best_score.is_some_and(|best| score > best)
            }
            PickEarlyType::FirstLastStepScoreImproving => {
                self.last_step_score.is_some_and(|last| score > last)
            }
        }
    }
}

impl<S, M> Default for AcceptedCountForager<S, M>
where
    S: PlanningSolution,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> Debug for AcceptedCountForager<S, M>
where
    S: PlanningSolution,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceptedCountForager")
            .field("accepted_count_limit", &self.accepted_count_limit)
            .field("pick_early_type", &self.pick_early_type)
            .field("break_tie_randomly", &self.break_tie_randomly)
            .field("accepted_count", &self.accepted_count)
            .finish()
    }
}

impl<S, M> LocalSearchForager<S, M> for AcceptedCountForager<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn step_started(&mut self, best_score: S::Score, last_step_score: S::Score) {
        self.best_score = Some(best_score);
        self.last_step_score = Some(last_step_score);
        self.accepted_count = 0;
        self.finalists.clear();
        self.picked_early = false;
    }

    fn add_move(&mut self, mv: M, score: S::Score) {
        self.accepted_count += 1;
        if self.is_pick_early(score) {
            self.picked_early = true;
        }
        match self.finalists.first().map(|(_, top)| *top) {
            Some(top) if score < top => {}
            Some(top) if score == top => self.finalists.push((mv, score)),
            _ => {
                self.finalists.clear();
                self.finalists.push((mv, score));
            }
        }
    }

    fn is_quit_early(&self) -> bool {
        self.picked_early || self.accepted_count >= self.accepted_count_limit
    }

    fn pick_move(&mut self) -> Option<(M, S::Score)> {
        if self.finalists.is_empty() {
            return None;
        }
        let index = if self.break_tie_randomly && self.finalists.len() > 1 {
            self.rng.random_range(0..self.finalists.len())
        } else {
            0
        };
        let picked = self.finalists.swap_remove(index);
        self.finalists.clear();
        Some(picked)
    }

    fn phase_ended(&mut self) {
        self.finalists.clear();
        self.best_score = None;
        self.last_step_score = None;
    }
}
