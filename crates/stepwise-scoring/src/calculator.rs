//! Incremental score calculators.

use std::fmt;

use stepwise_core::domain::PlanningSolution;

use crate::director::ShadowObserver;

/// Score impact of one constraint, summed over all of its matches.
#[derive(Clone, PartialEq, Eq)]
pub struct ConstraintMatchTotal<Sc> {
    pub constraint_name: String,
    pub match_count: usize,
    pub score: Sc,
}

impl<Sc> ConstraintMatchTotal<Sc> {
    pub fn new(constraint_name: impl Into<String>, match_count: usize, score: Sc) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            match_count,
            score,
        }
    }
}

impl<Sc: fmt::Display> fmt::Debug for ConstraintMatchTotal<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} matches): {}",
            self.constraint_name, self.match_count, self.score
        )
    }
}

/// A score calculator that maintains its score from variable change deltas.
///
/// The calculator sees the working solution *before* each change in
/// `before_variable_changed` and *after* it in `after_variable_changed`,
/// for genuine and shadow variables alike. `calculate_score` must then
/// return the same value a fresh calculator would after
/// `reset_working_solution`.
///
/// `Clone` must produce an independent calculator; score directors clone
/// calculators for move threads and for from-scratch verification.
///
/// # Example
///
/// ```
/// use stepwise_core::score::SimpleScore;
/// use stepwise_scoring::IncrementalScoreCalculator;
///
/// // Counts assigned values; each costs one point.
/// #[derive(Clone, Default)]
/// struct AssignedCount { assigned: i64 }
///
/// impl IncrementalScoreCalculator<Vec<Option<u8>>> for AssignedCount {
///     type Score = SimpleScore;
///
///     fn reset_working_solution(&mut self, solution: &Vec<Option<u8>>) {
///         self.assigned = solution.iter().flatten().count() as i64;
///     }
///     fn before_variable_changed(&mut self, s: &Vec<Option<u8>>, _: usize, entity: usize, _: &str) {
///         self.assigned -= s[entity].is_some() as i64;
///     }
///     fn after_variable_changed(&mut self, s: &Vec<Option<u8>>, _: usize, entity: usize, _: &str) {
///         self.assigned += s[entity].is_some() as i64;
///     }
///     fn calculate_score(&self) -> SimpleScore {
///         SimpleScore::of(-self.assigned)
///     }
/// }
///
/// let mut solution = vec![Some(1), None];
/// let mut calculator = AssignedCount::default();
/// calculator.reset_working_solution(&solution);
/// calculator.before_variable_changed(&solution, 0, 1, "value");
/// solution[1] = Some(4);
/// calculator.after_variable_changed(&solution, 0, 1, "value");
/// assert_eq!(calculator.calculate_score(), SimpleScore::of(-2));
/// ```
pub trait IncrementalScoreCalculator<S>: Send + Clone {
    type Score;

    /// Recomputes all internal state from `solution`.
    fn reset_working_solution(&mut self, solution: &S);

    fn before_variable_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    fn after_variable_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// The score of the solution after all notified changes, without the
    /// init score.
    fn calculate_score(&self) -> Self::Score;

    /// Per-constraint totals used to explain score corruption.
    fn constraint_match_totals(&self) -> Vec<ConstraintMatchTotal<Self::Score>> {
        Vec::new()
    }
}

/// Forwards shadow variable notifications to a calculator.
pub(crate) struct CalculatorObserver<'a, C>(pub(crate) &'a mut C);

impl<S, C> ShadowObserver<S> for CalculatorObserver<'_, C>
where
    S: PlanningSolution,
    C: IncrementalScoreCalculator<S, Score = S::Score>,
{
    fn before_shadow_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        shadow_name: &'static str,
    ) {
        self.0
            .before_variable_changed(solution, descriptor_index, entity_index, shadow_name);
    }

    fn after_shadow_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        shadow_name: &'static str,
    ) {
        self.0
            .after_variable_changed(solution, descriptor_index, entity_index, shadow_name);
    }
}
