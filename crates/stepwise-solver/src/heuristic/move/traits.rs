//! Move trait definition.

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;

/// A reversible change of one or more planning variables.
///
/// Moves are plain data: they address entities by index and never hold a
/// reference to the working solution. Undo is another move of the same
/// type, built by [`create_undo_move`](Move::create_undo_move) *before*
/// the move is applied, because afterwards the old links are gone.
///
/// `Hash + Eq` compare the move's data, so tabu search can remember moves
/// and look them up.
///
/// # Lifecycle
///
/// ```text
/// selector -> is_doable -> create_undo_move -> do_move -> score
///                                                 |
///                      undo.do_move (evaluation) or keep (step)
/// ```
pub trait Move<S: PlanningSolution>: Send + Sync + Debug + Clone + Hash + Eq + 'static {
    /// The planning value type the move assigns.
    type Value: Clone + Hash + Eq + Debug + Send + Sync + 'static;

    /// Returns true if doing this move changes the working solution
    /// without breaking its invariants.
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Builds the move that reverts this one.
    ///
    /// Must be called on the state the move will be applied to.
    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self;

    /// Applies this move, bracketing every variable write.
    ///
    /// Callers trigger the variable listeners afterwards.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D);

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &'static str;

    /// Entities whose variables this move writes, as far as known without
    /// the working solution.
    fn planning_entities(&self) -> SmallVec<[usize; 4]>;

    /// Values this move assigns.
    fn planning_values(&self) -> SmallVec<[Self::Value; 4]>;
}
