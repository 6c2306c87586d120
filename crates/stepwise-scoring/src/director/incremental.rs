//! Score director driven by an incremental score calculator.

use std::collections::BTreeMap;
use std::fmt::Write;

use stepwise_core::domain::{ChainSupply, PlanningSolution};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::score::Score;

use super::listener_support::VariableListenerSupport;
use super::traits::ScoreDirector;
use crate::calculator::{CalculatorObserver, ConstraintMatchTotal, IncrementalScoreCalculator};

type TotalPair<'a, Sc> = (
    Option<&'a ConstraintMatchTotal<Sc>>,
    Option<&'a ConstraintMatchTotal<Sc>>,
);

/// A score director that forwards every variable change to an
/// [`IncrementalScoreCalculator`].
///
/// Shadow variable updates made while triggering listeners are forwarded
/// too, so the calculator always sees the complete delta of a move.
pub struct IncrementalScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    calculator: C,
    listeners: VariableListenerSupport<S>,
    calculation_count: u64,
}

impl<S, C> IncrementalScoreDirector<S, C>
where
    S: PlanningSolution,
    C: IncrementalScoreCalculator<S, Score = S::Score>,
{
    pub fn new(solution: S, calculator: C) -> Self {
        let mut director = IncrementalScoreDirector {
            working_solution: solution,
            calculator,
            listeners: VariableListenerSupport::empty(),
            calculation_count: 0,
        };
        director
            .calculator
            .reset_working_solution(&director.working_solution);
        director
    }

    /// Creates a director that maintains the given supplies and shadows.
    pub fn with_listeners(
        mut solution: S,
        mut calculator: C,
        mut listeners: VariableListenerSupport<S>,
    ) -> Result<Self> {
        listeners.reset(&mut solution)?;
        calculator.reset_working_solution(&solution);
        Ok(IncrementalScoreDirector {
            working_solution: solution,
            calculator,
            listeners,
            calculation_count: 0,
        })
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    fn init_score(&self) -> i32 {
        let uninitialized = self.working_solution.uninitialized_variable_count();
        -(uninitialized.min(i32::MAX as usize) as i32)
    }

    /// Describes which constraints disagree between the working calculator
    /// and a freshly reset one.
    fn corruption_analysis(&self, fresh: &C) -> String {
        let working = self.calculator.constraint_match_totals();
        let expected = fresh.constraint_match_totals();
        if working.is_empty() && expected.is_empty() {
            return String::new();
        }

        let mut by_name: BTreeMap<&str, TotalPair<'_, S::Score>> = BTreeMap::new();
        for total in &working {
            by_name.entry(total.constraint_name.as_str()).or_default().0 = Some(total);
        }
        for total in &expected {
            by_name.entry(total.constraint_name.as_str()).or_default().1 = Some(total);
        }

        let mut analysis = String::new();
        for (name, pair) in by_name {
            match pair {
                (Some(w), Some(e)) if w == e => {}
                (Some(w), Some(e)) => {
                    let _ = write!(
                        analysis,
                        "\n  Constraint '{}': working {} ({} matches), expected {} ({} matches).",
                        name, w.score, w.match_count, e.score, e.match_count
                    );
                }
                (Some(w), None) => {
                    let _ = write!(
                        analysis,
                        "\n  Constraint '{}': working {} ({} matches) is unexpected.",
                        name, w.score, w.match_count
                    );
                }
                (None, Some(e)) => {
                    let _ = write!(
                        analysis,
                        "\n  Constraint '{}': expected {} ({} matches) is missing.",
                        name, e.score, e.match_count
                    );
                }
                (None, None) => {}
            }
        }
        if analysis.is_empty() {
            analysis.push_str("\n  All constraint totals match; check the calculator's score sum.");
        }
        analysis
    }
}

impl<S, C> ScoreDirector<S> for IncrementalScoreDirector<S, C>
where
    S: PlanningSolution,
    C: IncrementalScoreCalculator<S, Score = S::Score>,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, mut solution: S) -> Result<()> {
        self.listeners.reset(&mut solution)?;
        self.calculator.reset_working_solution(&solution);
        self.working_solution = solution;
        Ok(())
    }

    fn calculate_score(&mut self) -> S::Score {
        let score = self
            .calculator
            .calculate_score()
            .with_init_score(self.init_score());
        self.calculation_count += 1;
        self.working_solution.set_score(Some(score));
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
        self.calculator.before_variable_changed(
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
        self.calculator.after_variable_changed(
            &self.working_solution,
            descriptor_index,
            entity_index,
            variable_name,
        );
    }

    fn trigger_variable_listeners(&mut self) {
        let mut observer = CalculatorObserver(&mut self.calculator);
        self.listeners
            .trigger(&mut self.working_solution, &mut observer);
    }

    fn chain_supply(&self, variable_name: &str) -> Option<&ChainSupply<S>> {
        self.listeners.chain_supply(variable_name)
    }

    fn clone_for_worker(&self) -> Self {
        IncrementalScoreDirector {
            working_solution: self.working_solution.clone(),
            calculator: self.calculator.clone(),
            listeners: self.listeners.clone(),
            calculation_count: 0,
        }
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn is_incremental(&self) -> bool {
        true
    }

    fn constraint_match_totals(&self) -> Vec<ConstraintMatchTotal<S::Score>> {
        self.calculator.constraint_match_totals()
    }

    fn assert_working_score_from_scratch(
        &mut self,
        working_score: S::Score,
        context: &str,
    ) -> Result<()> {
        let mut fresh = self.calculator.clone();
        fresh.reset_working_solution(&self.working_solution);
        let expected = fresh.calculate_score().with_init_score(self.init_score());
        if working_score == expected {
            return Ok(());
        }
        Err(StepwiseError::ScoreCorruption {
            context: context.to_string(),
            working: working_score.to_string(),
            expected: expected.to_string(),
            analysis: self.corruption_analysis(&fresh),
        })
    }
}
