use stepwise_core::score::{Score, SimpleScore};

use super::{doubled_listener, doubled_penalty, Slots};
use crate::director::{
    begin_variable_change, ScoreDirector, SimpleScoreDirector, VariableListenerSupport,
};

fn sum_director(values: Vec<Option<i64>>) -> SimpleScoreDirector<Slots, fn(&Slots) -> SimpleScore> {
    fn sum(s: &Slots) -> SimpleScore {
        SimpleScore::of(-s.values.iter().flatten().sum::<i64>())
    }
    SimpleScoreDirector::new(Slots::new(values), sum as fn(&Slots) -> SimpleScore)
}

#[test]
fn test_uninitialized_variables_lower_init_score() {
    let mut director = sum_director(vec![Some(1), None, None]);
    let score = director.calculate_score();
    assert_eq!(score.init_score(), -2);
    assert_eq!(score.score(), -1);
    assert!(!score.is_solution_initialized());
    assert_eq!(director.working_solution().score, Some(score));
}

#[test]
fn test_score_is_cached_until_change() {
    let mut director = sum_director(vec![Some(1), Some(2)]);
    director.calculate_score();
    director.calculate_score();
    assert_eq!(director.calculation_count(), 1);

    {
        let mut change = begin_variable_change(&mut director, 0, 0, "value");
        change.working_solution_mut().values[0] = Some(5);
    }
    director.trigger_variable_listeners();
    assert_eq!(director.calculate_score(), SimpleScore::of(-7));
    assert_eq!(director.calculation_count(), 2);
}

#[test]
#[should_panic(expected = "without a matching before_variable_changed")]
fn test_after_without_before_panics() {
    let mut director = sum_director(vec![Some(1)]);
    director.after_variable_changed(0, 0, "value");
}

#[test]
#[should_panic(expected = "without a matching before_variable_changed")]
fn test_after_for_other_entity_panics() {
    let mut director = sum_director(vec![Some(1), Some(2)]);
    director.before_variable_changed(0, 0, "value");
    director.after_variable_changed(0, 1, "value");
}

#[test]
fn test_shadow_listener_runs_on_trigger() {
    let support = VariableListenerSupport::new(Vec::new(), vec![doubled_listener()]).unwrap();
    let mut director =
        SimpleScoreDirector::with_listeners(Slots::new(vec![Some(1), Some(2)]), doubled_penalty, support)
            .unwrap();

    // Shadows are computed when the solution is installed.
    assert_eq!(director.working_solution().doubled, vec![2, 4]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));

    {
        let mut change = begin_variable_change(&mut director, 0, 1, "value");
        change.working_solution_mut().values[1] = Some(10);
    }
    assert_eq!(director.working_solution().doubled, vec![2, 4]);
    director.trigger_variable_listeners();
    assert_eq!(director.working_solution().doubled, vec![2, 20]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-22));
}

#[test]
fn test_clone_for_worker_is_independent() {
    let mut director = sum_director(vec![Some(1), Some(2)]);
    director.calculate_score();

    let mut worker = director.clone_for_worker();
    {
        let mut change = begin_variable_change(&mut worker, 0, 0, "value");
        change.working_solution_mut().values[0] = Some(100);
    }
    worker.trigger_variable_listeners();

    assert_eq!(worker.calculate_score(), SimpleScore::of(-102));
    assert_eq!(director.calculate_score(), SimpleScore::of(-3));
    assert_eq!(worker.calculation_count(), 1);
}

#[test]
fn test_from_scratch_detects_unnotified_change() {
    let mut director = sum_director(vec![Some(1), Some(2)]);
    let score = director.calculate_score();
    director.working_solution_mut().values[0] = Some(4);

    let err = director
        .assert_working_score_from_scratch(score, "after step 0")
        .unwrap_err();
    assert!(err.is_corruption());
    assert!(err.to_string().contains("after step 0"));
}
