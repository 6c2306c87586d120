//! Tests for termination conditions.

use std::time::Duration;

use super::*;
use crate::scope::{PhaseScope, SolverScope};
use stepwise_core::score::{HardSoftScore, SimpleScore};
use stepwise_scoring::{ScoreDirector, SimpleScoreDirector};
use stepwise_test::nqueens::{nqueens_director, ConflictFn, NQueensSolution};
use stepwise_test::toy::{toy_director, ToySolution};

type QueensDirector = SimpleScoreDirector<NQueensSolution, ConflictFn>;
type QueensScope = SolverScope<NQueensSolution, QueensDirector>;

fn started_scope() -> QueensScope {
    // [0, 0, 0, 0] has six conflicting pairs
    let mut scope = SolverScope::new(nqueens_director(&[0, 0, 0, 0]));
    scope.start_solving();
    scope
}

#[test]
fn test_step_count_termination() {
    let mut scope = started_scope();
    let term = StepCountTermination::new(3);

    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    assert!((term.solver_time_gradient(&scope) - 2.0 / 3.0).abs() < 1e-9);
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
    assert_eq!(term.solver_time_gradient(&scope), 1.0);
}

#[test]
fn test_step_count_termination_counts_phase_steps() {
    let mut scope = started_scope();
    scope.increment_step_count();
    scope.increment_step_count();
    let term = StepCountTermination::new(2);
    assert!(term.is_solver_terminated(&scope));

    let mut phase = PhaseScope::new(&mut scope, 1);
    assert!(!term.is_phase_terminated(&phase));
    phase.step_completed(SimpleScore::of(-6));
    assert!(!term.is_phase_terminated(&phase));
    assert_eq!(term.phase_time_gradient(&phase), 0.5);
    phase.step_completed(SimpleScore::of(-6));
    assert!(term.is_phase_terminated(&phase));
}

#[test]
fn test_time_termination() {
    let scope = started_scope();

    let expired = TimeTermination::new(Duration::ZERO);
    assert!(expired.is_solver_terminated(&scope));
    assert_eq!(expired.solver_time_gradient(&scope), 1.0);

    let distant = TimeTermination::seconds(3600);
    assert!(!distant.is_solver_terminated(&scope));
    assert!(distant.solver_time_gradient(&scope) < 0.01);
}

#[test]
fn test_unimproved_step_count_termination() {
    let mut scope = started_scope();
    let term = UnimprovedStepCountTermination::new(2);
    let mut phase = PhaseScope::new(&mut scope, 0);

    phase.step_completed(SimpleScore::of(-6));
    assert!(!term.is_phase_terminated(&phase));
    phase.step_completed(SimpleScore::of(-4));
    assert_eq!(phase.last_improved_step_count(), 2);
    assert!(!term.is_phase_terminated(&phase));
    phase.step_completed(SimpleScore::of(-5));
    assert!(!term.is_phase_terminated(&phase));
    phase.step_completed(SimpleScore::of(-4));
    assert!(term.is_phase_terminated(&phase));
    assert!(term.is_solver_terminated(phase.solver_scope()));
}

#[test]
fn test_best_score_termination() {
    let mut scope = started_scope();
    let term = BestScoreTermination::new(SimpleScore::of(0));
    assert!(!term.is_solver_terminated(&scope));
    assert_eq!(term.solver_time_gradient(&scope), 0.0);

    assert!(scope.update_best_solution(SimpleScore::of(-3)));
    assert!(!term.is_solver_terminated(&scope));
    assert!((term.solver_time_gradient(&scope) - 0.5).abs() < 1e-9);

    assert!(scope.update_best_solution(SimpleScore::of(0)));
    assert!(term.is_solver_terminated(&scope));
    assert_eq!(term.solver_time_gradient(&scope), 1.0);
}

#[test]
fn test_best_score_termination_before_solving() {
    let scope = SolverScope::new(nqueens_director(&[0, 1, 2, 3]));
    let term = BestScoreTermination::new(SimpleScore::of(0));
    assert!(!term.is_solver_terminated(&scope));
}

#[test]
fn test_best_score_feasible_termination() {
    let mut unassigned = SolverScope::new(toy_director(ToySolution::new()));
    unassigned.start_solving();
    let term = BestScoreFeasibleTermination::new();
    assert!(!term.is_solver_terminated(&unassigned));

    let mut assigned = SolverScope::new(toy_director(ToySolution::with_values(&[0, 0, 0, 0])));
    assert_eq!(assigned.start_solving(), HardSoftScore::of_soft(-10));
    assert!(term.is_solver_terminated(&assigned));
}

#[test]
fn test_score_calculation_count_termination() {
    let mut scope = started_scope();
    let term = ScoreCalculationCountTermination::new(3);
    // start_solving calculated once
    assert!(!term.is_solver_terminated(&scope));
    for rows in [[0, 1, 2, 3], [3, 2, 1, 0]] {
        scope
            .score_director_mut()
            .set_working_solution(NQueensSolution::with_rows(&rows))
            .unwrap();
        scope.calculate_score();
    }
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_or_termination() {
    let mut scope = started_scope();
    let term = OrTermination((
        StepCountTermination::new(4),
        StepCountTermination::new(2),
    ));
    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    assert_eq!(term.solver_time_gradient(&scope), 0.5);
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_and_termination() {
    let mut scope = started_scope();
    let term = AndTermination((
        StepCountTermination::new(4),
        StepCountTermination::new(2),
    ));
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(!term.is_solver_terminated(&scope));
    assert_eq!(term.solver_time_gradient(&scope), 0.5);
    scope.increment_step_count();
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));
}

#[test]
fn test_boxed_vec_termination() {
    let mut scope = started_scope();
    let children: Vec<Box<dyn Termination<NQueensSolution, QueensDirector>>> = vec![
        Box::new(TimeTermination::seconds(3600)),
        Box::new(StepCountTermination::new(1)),
    ];
    let term = OrTermination::new(children);
    assert!(!term.is_solver_terminated(&scope));
    scope.increment_step_count();
    assert!(term.is_solver_terminated(&scope));

    let empty: AndTermination<Vec<Box<dyn Termination<NQueensSolution, QueensDirector>>>> = AndTermination::new(Vec::new());
    assert!(!empty.is_solver_terminated(&scope));
}

#[test]
fn test_no_termination() {
    let mut scope = started_scope();
    for _ in 0..100 {
        scope.increment_step_count();
    }
    assert!(!NoTermination.is_solver_terminated(&scope));
}
