//! Foragers for the construction heuristic.
//!
//! A forager picks one move of a placement and returns its index, so the
//! phase can take the move out of the placement without cloning it.

use std::fmt::Debug;
use std::marker::PhantomData;

use stepwise_config::EnvironmentMode;
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::Move;
use crate::phase::localsearch::evaluate_move;

use super::Placement;

/// Picks the move that initializes a placement's entity.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
pub trait ConstructionForager<S: PlanningSolution, M: Move<S>>: Send + Debug {
    /// Returns the index of the picked move, or `None` if no move of the
    /// placement is doable.
    fn pick_move_index<D: ScoreDirector<S>>(
        &self,
        placement: &Placement<S, M>,
        score_director: &mut D,
        environment_mode: EnvironmentMode,
    ) -> Result<Option<usize>>;
}

/// Picks the first doable move without scoring anything.
pub struct FirstFitForager<S, M> {
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M> FirstFitForager<S, M> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S, M> Default for FirstFitForager<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> Debug for FirstFitForager<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstFitForager").finish()
    }
}

impl<S: PlanningSolution, M: Move<S>> ConstructionForager<S, M> for FirstFitForager<S, M> {
    fn pick_move_index<D: ScoreDirector<S>>(
        &self,
        placement: &Placement<S, M>,
        score_director: &mut D,
        _environment_mode: EnvironmentMode,
    ) -> Result<Option<usize>> {
        Ok(placement
            .moves()
            .iter()
            .position(|mv| mv.is_doable(score_director)))
    }
}

/// Scores every doable move and picks the best one.
///
/// Ties go to the move that comes first in the placement.
pub struct BestFitForager<S, M> {
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M> BestFitForager<S, M> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S, M> Default for BestFitForager<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> Debug for BestFitForager<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestFitForager").finish()
    }
}

impl<S: PlanningSolution, M: Move<S>> ConstructionForager<S, M> for BestFitForager<S, M> {
    fn pick_move_index<D: ScoreDirector<S>>(
        &self,
        placement: &Placement<S, M>,
        score_director: &mut D,
        environment_mode: EnvironmentMode,
    ) -> Result<Option<usize>> {
        let before_score = score_director.calculate_score();
        let mut best: Option<(usize, S::Score)> = None;

        for (index, mv) in placement.moves().iter().enumerate() {
            if !mv.is_doable(score_director) {
                continue;
            }
            let score =
                evaluate_move::<S, D, M>(score_director, mv, environment_mode, before_score)?;
            trace!(event = "construction_move", entity = placement.entity_index(), score = %score);
            let improves = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if improves {
                best = Some((index, score));
            }
        }
        Ok(best.map(|(index, _)| index))
    }
}
