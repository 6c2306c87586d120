//! Score director trait definition.

use stepwise_core::domain::{ChainSupply, PlanningSolution};
use stepwise_core::error::Result;

use crate::calculator::ConstraintMatchTotal;

/// Owns the working solution and computes its score.
///
/// Every write to a genuine planning variable must be bracketed by
/// [`before_variable_changed`](Self::before_variable_changed) and
/// [`after_variable_changed`](Self::after_variable_changed), and
/// [`trigger_variable_listeners`](Self::trigger_variable_listeners) must run
/// before the next [`calculate_score`](Self::calculate_score). Moves should
/// use [`begin_variable_change`](crate::begin_variable_change), which makes
/// the closing call on drop.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    /// Returns a reference to the working solution.
    fn working_solution(&self) -> &S;

    /// Returns a mutable reference to the working solution.
    ///
    /// Writes through this reference bypass the notification protocol;
    /// use it only between a before/after pair.
    fn working_solution_mut(&mut self) -> &mut S;

    /// Installs a new working solution and invalidates every cached value.
    fn set_working_solution(&mut self, solution: S) -> Result<()>;

    /// Calculates and returns the current score, including the init score.
    fn calculate_score(&mut self) -> S::Score;

    /// Called before a planning variable is changed.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    );

    /// Called after a planning variable is changed.
    ///
    /// # Panics
    /// Panics if no matching `before_variable_changed` call is open.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    );

    /// Propagates genuine variable changes to supplies and shadow variables.
    fn trigger_variable_listeners(&mut self);

    /// Returns the trailing entity and anchor lookups of a chained variable.
    fn chain_supply(&self, variable_name: &str) -> Option<&ChainSupply<S>>;

    /// Clones the working solution.
    fn clone_working_solution(&self) -> S {
        self.working_solution().clone()
    }

    /// Creates an independent director over a deep copy of the working solution.
    ///
    /// Used to give each move evaluation thread its own director.
    fn clone_for_worker(&self) -> Self
    where
        Self: Sized;

    /// Number of score calculations performed so far.
    fn calculation_count(&self) -> u64;

    /// Returns true if this score director supports incremental scoring.
    fn is_incremental(&self) -> bool {
        false
    }

    /// Per-constraint totals, if the score calculator tracks them.
    fn constraint_match_totals(&self) -> Vec<ConstraintMatchTotal<S::Score>> {
        Vec::new()
    }

    /// Recalculates the score from scratch and compares it to `working_score`.
    ///
    /// Returns a score corruption error describing the discrepancy.
    fn assert_working_score_from_scratch(
        &mut self,
        working_score: S::Score,
        context: &str,
    ) -> Result<()>;
}
