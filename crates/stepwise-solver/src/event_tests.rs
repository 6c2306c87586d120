//! Tests for the event system.

use super::*;
use stepwise_core::score::SimpleScore;
use stepwise_test::nqueens::NQueensSolution;

fn solution() -> NQueensSolution {
    NQueensSolution::with_rows(&[1, 3, 0, 2])
}

#[test]
fn test_event_support_new() {
    let support: SolverEventSupport<NQueensSolution> = SolverEventSupport::new();

    assert_eq!(support.solver_listener_count(), 0);
    assert_eq!(support.phase_listener_count(), 0);
    assert_eq!(support.step_listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_event_support_fire_events() {
    let mut support: SolverEventSupport<NQueensSolution> = SolverEventSupport::new();

    let listener = Arc::new(CountingEventListener::new());
    support.add_solver_listener(listener.clone());
    support.add_phase_listener(listener.clone());
    support.add_step_listener(listener.clone());
    assert!(support.has_listeners());

    let solution = solution();
    support.fire_solving_started(&solution);
    support.fire_best_solution_changed(&solution, &SimpleScore::of(-5));
    support.fire_phase_started(0, "LocalSearch");
    support.fire_step_started(0);
    support.fire_step_ended(0, &SimpleScore::of(-3));
    support.fire_phase_ended(0, "LocalSearch");
    support.fire_solving_error(&StepwiseError::Internal("boom".to_string()));
    support.fire_solving_ended(&solution, false);

    assert_eq!(listener.solving_started_count(), 1);
    assert_eq!(listener.best_solution_count(), 1);
    assert_eq!(listener.phase_started_count(), 1);
    assert_eq!(listener.step_started_count(), 1);
    assert_eq!(listener.step_ended_count(), 1);
    assert_eq!(listener.phase_ended_count(), 1);
    assert_eq!(listener.solving_error_count(), 1);
    assert_eq!(listener.solving_ended_count(), 1);
}

#[test]
fn test_event_support_clear_listeners() {
    let mut support: SolverEventSupport<NQueensSolution> = SolverEventSupport::new();
    support.add_solver_listener(Arc::new(CountingEventListener::new()));

    support.clear_listeners();

    assert!(!support.has_listeners());
    assert_eq!(support.solver_listener_count(), 0);
}

#[test]
fn test_counting_listener_reset() {
    let listener = CountingEventListener::new();
    listener.best_solution_count.store(5, Ordering::SeqCst);
    listener.phase_started_count.store(3, Ordering::SeqCst);

    listener.reset();

    assert_eq!(listener.best_solution_count(), 0);
    assert_eq!(listener.phase_started_count(), 0);
}

#[test]
fn test_multiple_listeners_all_notified() {
    let mut support: SolverEventSupport<NQueensSolution> = SolverEventSupport::new();
    let first = Arc::new(CountingEventListener::new());
    let second = Arc::new(CountingEventListener::new());
    support.add_solver_listener(first.clone());
    support.add_solver_listener(second.clone());

    support.fire_best_solution_changed(&solution(), &SimpleScore::of(0));

    assert_eq!(first.best_solution_count(), 1);
    assert_eq!(second.best_solution_count(), 1);
}
