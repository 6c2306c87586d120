//! Core domain traits

use crate::score::Score;

/// Trait for planning solutions.
///
/// A planning solution represents both the problem definition and the
/// (potentially partial) solution. It owns every planning entity; moves and
/// score directors address entities by their index, never by reference.
///
/// # Example
///
/// ```
/// use stepwise_core::{PlanningSolution, score::SimpleScore};
///
/// #[derive(Clone, Debug)]
/// struct NQueens {
///     rows: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
///
///     fn uninitialized_variable_count(&self) -> usize {
///         self.rows.iter().filter(|r| r.is_none()).count()
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Planning solutions must be `Clone + Send + Sync` so the multi-threaded
/// decider can hand every worker its own deep copy.
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);

    /// Number of genuine planning variables that are still unassigned.
    ///
    /// Score directors turn this into the score's init score.
    fn uninitialized_variable_count(&self) -> usize {
        0
    }

    /// Returns true if this solution is fully initialized.
    fn is_initialized(&self) -> bool {
        self.uninitialized_variable_count() == 0
    }
}
