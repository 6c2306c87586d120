use stepwise_core::error::StepwiseError;
use stepwise_core::score::SimpleScore;

use super::{doubled_listener, DoubledCalculator, Slots};
use crate::director::{
    begin_variable_change, IncrementalScoreDirector, ScoreDirector, VariableListenerSupport,
};

fn director(calculator: DoubledCalculator) -> IncrementalScoreDirector<Slots, DoubledCalculator> {
    let support = VariableListenerSupport::new(Vec::new(), vec![doubled_listener()]).unwrap();
    IncrementalScoreDirector::with_listeners(
        Slots::new(vec![Some(1), Some(2), Some(3)]),
        calculator,
        support,
    )
    .unwrap()
}

fn set_value(director: &mut IncrementalScoreDirector<Slots, DoubledCalculator>, entity: usize, value: i64) {
    {
        let mut change = begin_variable_change(director, 0, entity, "value");
        change.working_solution_mut().values[entity] = Some(value);
    }
    director.trigger_variable_listeners();
}

#[test]
fn test_calculator_observes_shadow_changes() {
    let mut director = director(DoubledCalculator::default());
    assert!(director.is_incremental());
    assert_eq!(director.calculate_score(), SimpleScore::of(-12));

    set_value(&mut director, 1, 7);
    let score = director.calculate_score();
    assert_eq!(score, SimpleScore::of(-22));
    director
        .assert_working_score_from_scratch(score, "after move")
        .unwrap();
}

#[test]
fn test_corruption_is_reported_with_constraint_analysis() {
    let mut director = director(DoubledCalculator {
        skip_entity: Some(0),
        ..DoubledCalculator::default()
    });

    set_value(&mut director, 0, 5);
    let working = director.calculate_score();
    assert_eq!(working, SimpleScore::of(-12));

    let err = director
        .assert_working_score_from_scratch(working, "after step 4")
        .unwrap_err();
    match &err {
        StepwiseError::ScoreCorruption {
            context,
            working,
            expected,
            analysis,
        } => {
            assert_eq!(context, "after step 4");
            assert_eq!(working, "-12");
            assert_eq!(expected, "-20");
            assert!(analysis.contains("Constraint 'doubled penalty'"));
        }
        other => panic!("expected score corruption, got {:?}", other),
    }
}

#[test]
fn test_set_working_solution_resets_calculator() {
    let mut director = director(DoubledCalculator::default());
    director
        .set_working_solution(Slots::new(vec![Some(10), None]))
        .unwrap();

    let score = director.calculate_score();
    assert_eq!(score, SimpleScore::of_uninitialized(-1, -20));
    assert_eq!(director.working_solution().doubled, vec![20, 0]);
}

#[test]
fn test_worker_clone_keeps_calculator_state() {
    let mut director = director(DoubledCalculator::default());
    let mut worker = director.clone_for_worker();

    set_value(&mut worker, 2, 0);
    assert_eq!(worker.calculate_score(), SimpleScore::of(-6));
    assert_eq!(director.calculate_score(), SimpleScore::of(-12));
}
