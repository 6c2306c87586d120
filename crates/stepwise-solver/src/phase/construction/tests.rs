use std::sync::Arc;

use stepwise_config::EnvironmentMode;
use stepwise_core::score::{HardSoftScore, Score, SimpleScore};
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::SimpleScoreDirector;
use stepwise_test::nqueens::{
    calculate_conflicts, get_queen_row, nqueens_incremental_director, queen_count, row_values,
    set_queen_row, ConflictFn, NQueensSolution,
};
use stepwise_test::toy::{
    entity_count, get_value, set_value, toy_director, value_range, ToySolution,
};

use super::*;
use crate::event::{CountingEventListener, SolverEventSupport};
use crate::heuristic::r#move::ChangeMove;
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::StepCountTermination;

type ToyMove = ChangeMove<ToySolution, u8>;
type QueenMove = ChangeMove<NQueensSolution, i64>;

fn toy_placer() -> QueuedEntityPlacer<ToySolution, u8> {
    QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0)
}

fn queen_placer() -> QueuedEntityPlacer<NQueensSolution, i64> {
    QueuedEntityPlacer::new(get_queen_row, set_queen_row, queen_count, row_values, "row", 0)
}

fn queens_director(
    rows: &[Option<i64>],
) -> SimpleScoreDirector<NQueensSolution, ConflictFn> {
    SimpleScoreDirector::new(
        NQueensSolution::with_optional_rows(rows),
        calculate_conflicts as ConflictFn,
    )
}

#[test]
fn test_placer_skips_initialized_entities() {
    let director = queens_director(&[Some(0), None, Some(3), None]);
    let placements = queen_placer().get_placements(&director);

    let entities: Vec<usize> = placements.iter().map(|p| p.entity_index()).collect();
    assert_eq!(entities, vec![1, 3]);
    assert!(placements.iter().all(|p| p.moves().len() == 4));
}

#[test]
fn test_first_fit_assigns_first_value() {
    let mut scope = SolverScope::new(toy_director(ToySolution::new()));
    let starting = scope.start_solving();
    assert_eq!(starting.init_score(), -4);

    let mut phase = ConstructionHeuristicPhase::new(toy_placer(), FirstFitForager::<ToySolution, ToyMove>::new());
    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.working_solution().values, vec![Some(0); 4]);
    assert_eq!(scope.total_step_count(), 4);
    assert_eq!(scope.best_score(), Some(HardSoftScore::of_soft(-10)));
    assert!(scope.best_solution().unwrap().is_initialized());
}

#[test]
fn test_best_fit_builds_toy_optimum() {
    let mut scope = SolverScope::new(toy_director(ToySolution::new()));
    scope.start_solving();

    let mut phase = ConstructionHeuristicPhase::new(toy_placer(), BestFitForager::<ToySolution, ToyMove>::new());
    phase.solve(&mut scope).unwrap();

    let expected = vec![Some(1), Some(0), Some(1), Some(0)];
    assert_eq!(scope.working_solution().values, expected);
    assert_eq!(scope.best_score(), Some(HardSoftScore::of_soft(-4)));
    assert_eq!(scope.best_solution().unwrap().values, expected);
}

#[test]
fn test_best_fit_in_full_assert_mode() {
    let director = nqueens_incremental_director(NQueensSolution::uninitialized(4));
    let mut scope = SolverScope::new(director).with_environment_mode(EnvironmentMode::FullAssert);
    scope.start_solving();

    let mut phase = ConstructionHeuristicPhase::new(queen_placer(), BestFitForager::<NQueensSolution, QueenMove>::new());
    phase.solve(&mut scope).unwrap();

    let score = scope.calculate_score();
    assert_eq!(score, calculate_conflicts(scope.working_solution()));
    assert_eq!(score.init_score(), 0);
    assert!(scope.working_solution().rows().iter().all(Option::is_some));
}

#[test]
fn test_phase_termination_stops_placing() {
    let mut scope = SolverScope::new(toy_director(ToySolution::new()));
    scope.start_solving();

    let mut phase = ConstructionHeuristicPhase::new(toy_placer(), FirstFitForager::<ToySolution, ToyMove>::new())
        .with_termination(StepCountTermination::new(2));
    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.working_solution().values, vec![Some(0), Some(0), None, None]);
    assert_eq!(scope.calculate_score().init_score(), -2);
}

#[test]
fn test_every_step_improves_best_score() {
    let counter = Arc::new(CountingEventListener::new());
    let mut events = SolverEventSupport::new();
    events.add_solver_listener(counter.clone());
    events.add_phase_listener(counter.clone());
    events.add_step_listener(counter.clone());

    let mut scope = SolverScope::new(toy_director(ToySolution::new())).with_events(Arc::new(events));
    scope.start_solving();
    let mut phase = ConstructionHeuristicPhase::new(toy_placer(), FirstFitForager::<ToySolution, ToyMove>::new());
    phase.solve(&mut scope).unwrap();

    // Every step initializes one more variable.
    assert_eq!(counter.step_ended_count(), 4);
    assert_eq!(counter.best_solution_count(), 4);
    assert_eq!(counter.phase_started_count(), 1);
    assert_eq!(counter.phase_ended_count(), 1);
}

#[test]
fn test_empty_solution() {
    let mut scope = SolverScope::new(queens_director(&[]));
    scope.start_solving();
    let mut phase = ConstructionHeuristicPhase::new(queen_placer(), FirstFitForager::<NQueensSolution, QueenMove>::new());
    phase.solve(&mut scope).unwrap();

    assert_eq!(scope.total_step_count(), 0);
    assert_eq!(scope.best_score(), Some(SimpleScore::of(0)));
}
