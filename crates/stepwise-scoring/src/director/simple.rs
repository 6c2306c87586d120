//! Simple score director with full recalculation.

use std::sync::Arc;

use stepwise_core::domain::{ChainSupply, PlanningSolution};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::score::Score;

use super::listener_support::VariableListenerSupport;
use super::traits::ScoreDirector;

/// A score director that recalculates the full score after every change.
///
/// Inefficient but correct. Used for testing, for small problems and as
/// the from-scratch reference of incremental calculators.
pub struct SimpleScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    score_calculator: Arc<C>,
    listeners: VariableListenerSupport<S>,
    score_dirty: bool,
    cached_score: Option<S::Score>,
    calculation_count: u64,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    /// Creates a director without chained variables or shadow listeners.
    pub fn new(solution: S, score_calculator: C) -> Self {
        SimpleScoreDirector {
            working_solution: solution,
            score_calculator: Arc::new(score_calculator),
            listeners: VariableListenerSupport::empty(),
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        }
    }

    /// Creates a director that maintains the given supplies and shadows.
    ///
    /// Fails if the solution's chains are malformed.
    pub fn with_listeners(
        mut solution: S,
        score_calculator: C,
        mut listeners: VariableListenerSupport<S>,
    ) -> Result<Self> {
        listeners.reset(&mut solution)?;
        Ok(SimpleScoreDirector {
            working_solution: solution,
            score_calculator: Arc::new(score_calculator),
            listeners,
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        })
    }

    fn calculate_from_scratch(&self) -> S::Score {
        let uninitialized = self.working_solution.uninitialized_variable_count();
        (self.score_calculator)(&self.working_solution)
            .with_init_score(-(uninitialized.min(i32::MAX as usize) as i32))
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.score_dirty = true;
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, mut solution: S) -> Result<()> {
        self.listeners.reset(&mut solution)?;
        self.working_solution = solution;
        self.score_dirty = true;
        self.cached_score = None;
        Ok(())
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }

        let score = self.calculate_from_scratch();
        self.calculation_count += 1;
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        score
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        self.listeners.before_variable_changed(
            &self.working_solution,
            descriptor_index,
            entity_index,
            variable_name,
        );
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        self.listeners
            .after_variable_changed(descriptor_index, entity_index, variable_name);
        self.score_dirty = true;
    }

    fn trigger_variable_listeners(&mut self) {
        self.listeners.trigger(&mut self.working_solution, &mut ());
    }

    fn chain_supply(&self, variable_name: &str) -> Option<&ChainSupply<S>> {
        self.listeners.chain_supply(variable_name)
    }

    fn clone_for_worker(&self) -> Self {
        SimpleScoreDirector {
            working_solution: self.working_solution.clone(),
            score_calculator: Arc::clone(&self.score_calculator),
            listeners: self.listeners.clone(),
            score_dirty: self.score_dirty,
            cached_score: self.cached_score,
            calculation_count: 0,
        }
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn assert_working_score_from_scratch(
        &mut self,
        working_score: S::Score,
        context: &str,
    ) -> Result<()> {
        let expected = self.calculate_from_scratch();
        if working_score == expected {
            return Ok(());
        }
        Err(StepwiseError::ScoreCorruption {
            context: context.to_string(),
            working: working_score.to_string(),
            expected: expected.to_string(),
            analysis: String::new(),
        })
    }
}
