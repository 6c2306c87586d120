//! Scoped variable change notifications.

use std::marker::PhantomData;

use stepwise_core::domain::PlanningSolution;

use super::traits::ScoreDirector;

/// An open variable change on a score director.
///
/// Created by [`begin_variable_change`], which sends the "before"
/// notification. Dropping the guard sends the matching "after"
/// notification, on every exit path.
pub struct VariableChange<'a, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + ?Sized,
{
    director: &'a mut D,
    descriptor_index: usize,
    entity_index: usize,
    variable_name: &'static str,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, D> VariableChange<'_, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + ?Sized,
{
    #[inline]
    pub fn working_solution(&self) -> &S {
        self.director.working_solution()
    }

    /// Mutable access for writing the announced variable.
    #[inline]
    pub fn working_solution_mut(&mut self) -> &mut S {
        self.director.working_solution_mut()
    }

    #[inline]
    pub fn entity_index(&self) -> usize {
        self.entity_index
    }
}

impl<S, D> Drop for VariableChange<'_, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + ?Sized,
{
    fn drop(&mut self) {
        self.director.after_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
    }
}

/// Announces a change of `variable_name` on `entity_index`.
///
/// # Example
///
/// ```
/// use stepwise_core::domain::PlanningSolution;
/// use stepwise_core::score::SimpleScore;
/// use stepwise_scoring::{begin_variable_change, ScoreDirector, SimpleScoreDirector};
///
/// #[derive(Clone, Debug)]
/// struct Slots { values: Vec<Option<i64>>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Slots {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// let solution = Slots { values: vec![Some(1), Some(2)], score: None };
/// let mut director = SimpleScoreDirector::new(solution, |s: &Slots| {
///     SimpleScore::of(s.values.iter().flatten().sum())
/// });
/// assert_eq!(director.calculate_score(), SimpleScore::of(3));
///
/// {
///     let mut change = begin_variable_change(&mut director, 0, 1, "value");
///     change.working_solution_mut().values[1] = Some(10);
/// } // "after" notification sent here
///
/// director.trigger_variable_listeners();
/// assert_eq!(director.calculate_score(), SimpleScore::of(11));
/// ```
pub fn begin_variable_change<'a, S, D>(
    director: &'a mut D,
    descriptor_index: usize,
    entity_index: usize,
    variable_name: &'static str,
) -> VariableChange<'a, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + ?Sized,
{
    director.before_variable_changed(descriptor_index, entity_index, variable_name);
    VariableChange {
        director,
        descriptor_index,
        entity_index,
        variable_name,
        _phantom: PhantomData,
    }
}
