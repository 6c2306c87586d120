use std::sync::{Arc, Mutex};

use stepwise_config::{PhaseConfig, SolverConfig};
use stepwise_core::score::{HardSoftScore, Score, SimpleScore};
use stepwise_test::nqueens::{
    get_queen_row, nqueens_director, queen_count, row_values, set_queen_row, ConflictFn,
    NQueensSolution,
};
use stepwise_test::toy::{
    entity_count, get_value, set_value, toy_director, value_range, ToyScoreFn, ToySolution,
};

use super::*;
use crate::builder::PhaseBuilder;
use crate::event::CountingEventListener;
use crate::heuristic::r#move::ChangeMove;
use crate::heuristic::selector::ChangeMoveSelector;
use crate::phase::construction::{ConstructionHeuristicPhase, FirstFitForager, QueuedEntityPlacer};
use crate::phase::localsearch::{
    AcceptedCountForager, HillClimbingAcceptor, LocalSearchPhase, SingleThreadedDecider,
};
use crate::termination::{NoTermination, StepCountTermination};
use stepwise_scoring::SimpleScoreDirector;

type ToyMove = ChangeMove<ToySolution, u8>;
type ToyDirector = SimpleScoreDirector<ToySolution, ToyScoreFn>;
type QueenMove = ChangeMove<NQueensSolution, i64>;
type QueensDirector = SimpleScoreDirector<NQueensSolution, ConflictFn>;

fn toy_placer() -> QueuedEntityPlacer<ToySolution, u8> {
    QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0)
}

fn toy_selector() -> ChangeMoveSelector<ToySolution, u8> {
    ChangeMoveSelector::new(get_value, set_value, entity_count, value_range, "value", 0)
}

fn toy_hill_climbing(
) -> LocalSearchPhase<
    ToySolution,
    ToyDirector,
    SingleThreadedDecider<
        ToySolution,
        ToyMove,
        ChangeMoveSelector<ToySolution, u8>,
        HillClimbingAcceptor<ToySolution>,
        AcceptedCountForager<ToySolution, ToyMove>,
    >,
    NoTermination,
> {
    LocalSearchPhase::new(
        SingleThreadedDecider::new(
            toy_selector(),
            HillClimbingAcceptor::new(),
            AcceptedCountForager::new(),
        ),
        NoTermination,
    )
}

fn queens_hill_climbing(
) -> LocalSearchPhase<
    NQueensSolution,
    QueensDirector,
    SingleThreadedDecider<
        NQueensSolution,
        QueenMove,
        ChangeMoveSelector<NQueensSolution, i64>,
        HillClimbingAcceptor<NQueensSolution>,
        AcceptedCountForager<NQueensSolution, QueenMove>,
    >,
    NoTermination,
> {
    LocalSearchPhase::new(
        SingleThreadedDecider::new(
            ChangeMoveSelector::new(get_queen_row, set_queen_row, queen_count, row_values, "row", 0),
            HillClimbingAcceptor::new(),
            AcceptedCountForager::new(),
        ),
        NoTermination,
    )
}

#[derive(Debug, Default)]
struct BestScores(Mutex<Vec<HardSoftScore>>);

impl SolverEventListener<ToySolution> for BestScores {
    fn on_best_solution_changed(&self, _solution: &ToySolution, score: &HardSoftScore) {
        self.0.lock().unwrap().push(*score);
    }
}

/// Stops the solver once `steps` steps have ended.
#[derive(Debug)]
struct StopAfterSteps {
    handle: SolverHandle,
    steps: u64,
}

impl StepLifecycleListener<NQueensSolution> for StopAfterSteps {
    fn on_step_started(&self, _step_index: u64) {}

    fn on_step_ended(&self, step_index: u64, _score: &SimpleScore) {
        if step_index + 1 >= self.steps {
            self.handle.terminate_early();
        }
    }
}

/// Stops the solver before the first phase starts.
#[derive(Debug)]
struct StopOnStart(SolverHandle);

impl SolverEventListener<NQueensSolution> for StopOnStart {
    fn on_best_solution_changed(&self, _solution: &NQueensSolution, _score: &SimpleScore) {}

    fn on_solving_started(&self, _solution: &NQueensSolution) {
        self.0.terminate_early();
    }
}

#[derive(Debug)]
struct FailingPhase;

impl<S: PlanningSolution, D: ScoreDirector<S>> Phase<S, D> for FailingPhase {
    fn solve(&mut self, _solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        Err(StepwiseError::InvalidState("phase failed".to_string()))
    }

    fn phase_type_name(&self) -> &'static str {
        "Failing"
    }
}

#[test]
fn test_construction_then_hill_climbing_on_toy() {
    let best_scores = Arc::new(BestScores::default());
    let construction =
        ConstructionHeuristicPhase::new(toy_placer(), FirstFitForager::<ToySolution, ToyMove>::new());
    let mut solver = Solver::new((construction, toy_hill_climbing()))
        .with_termination(StepCountTermination::new(10))
        .with_solver_listener(best_scores.clone());

    let result = solver.solve(toy_director(ToySolution::new())).unwrap();

    assert!(result.is_ok());
    assert_eq!(result.step_count, 10);
    assert_eq!(result.score, HardSoftScore::of_soft(-4));
    assert_eq!(
        result.solution.values,
        vec![Some(1), Some(0), Some(1), Some(0)]
    );

    let scores = best_scores.0.lock().unwrap();
    // Four construction steps, then two improving local search steps.
    assert_eq!(scores.len(), 6);
    assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", scores);
    assert_eq!(scores[3], HardSoftScore::of_soft(-10));
    assert!(scores[..3].iter().all(|score| score.init_score() < 0));
}

#[test]
fn test_error_before_any_step_is_returned() {
    let counter = Arc::new(CountingEventListener::new());
    let mut solver: Solver<_, NQueensSolution, QueensDirector> =
        Solver::new((FailingPhase,)).with_solver_listener(counter.clone());

    let err = solver.solve(nqueens_director(&[0, 0, 0, 0])).unwrap_err();

    assert!(matches!(err, StepwiseError::InvalidState(_)));
    assert_eq!(counter.solving_error_count(), 1);
    assert_eq!(counter.solving_ended_count(), 1);
    assert!(!solver.is_solving());
}

#[test]
fn test_error_after_steps_keeps_best_solution() {
    let construction =
        ConstructionHeuristicPhase::new(toy_placer(), FirstFitForager::<ToySolution, ToyMove>::new());
    let mut solver: Solver<_, ToySolution, ToyDirector> =
        Solver::new((construction, FailingPhase));

    let result = solver.solve(toy_director(ToySolution::new())).unwrap();

    assert_eq!(result.step_count, 4);
    assert!(matches!(result.error, Some(StepwiseError::InvalidState(_))));
    assert_eq!(result.solution.values, vec![Some(0); 4]);
    assert_eq!(result.score, HardSoftScore::of_soft(-10));
}

#[test]
fn test_terminate_early_from_listener() {
    let solver = Solver::new((queens_hill_climbing(),));
    let stop = Arc::new(StopAfterSteps {
        handle: solver.handle(),
        steps: 2,
    });
    let mut solver = solver.with_step_listener(stop);

    let result = solver.solve(nqueens_director(&[0, 0, 0, 0, 0, 0])).unwrap();

    assert!(result.terminated_early);
    assert_eq!(result.step_count, 2);
    assert!(result.is_ok());
    assert!(!solver.handle().is_solving());
    assert!(!solver.handle().terminate_early());
}

#[test]
fn test_cancelled_before_any_step() {
    let solver = Solver::new((queens_hill_climbing(),));
    let stop = Arc::new(StopOnStart(solver.handle()));
    let mut solver = solver.with_solver_listener(stop);

    let err = solver.solve(nqueens_director(&[0, 0, 0, 0])).unwrap_err();
    assert!(matches!(err, StepwiseError::Cancelled));
}

#[test]
fn test_best_solutions_are_sent() {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut solver = Solver::new((queens_hill_climbing(),))
        .with_termination(StepCountTermination::new(5))
        .with_best_solution_sender(sender);

    let result = solver.solve(nqueens_director(&[0, 0, 0, 0])).unwrap();

    let mut received = Vec::new();
    while let Ok(best) = receiver.try_recv() {
        received.push(best);
    }
    assert!(!received.is_empty());
    let last = received.last().unwrap();
    assert_eq!(last.score, result.score);
    assert_eq!(last.solution.rows(), result.solution.rows());
    assert!(received.windows(2).all(|pair| pair[0].step_count < pair[1].step_count));
}

#[test]
fn test_solver_is_reusable() {
    let mut solver = Solver::new((queens_hill_climbing(),))
        .with_termination(StepCountTermination::new(3));

    let first = solver.solve(nqueens_director(&[0, 0, 0, 0])).unwrap();
    let second = solver.solve(nqueens_director(&[0, 0, 0, 0])).unwrap();

    assert_eq!(first.step_count, 3);
    assert_eq!(second.step_count, 3);
    assert_eq!(first.solution.rows(), second.solution.rows());
}

#[test]
fn test_solver_from_config() {
    let config = SolverConfig::from_toml_str(
        r#"
        environment_mode = "full_assert"
        random_seed = 3

        [termination]
        step_count_limit = 6

        [[phases]]
        type = "construction_heuristic"
        construction_heuristic_type = "best_fit"

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "hill_climbing"
        "#,
    )
    .unwrap();

    let mut phases: Vec<Box<dyn Phase<ToySolution, ToyDirector>>> = Vec::new();
    for phase in &config.phases {
        phases.push(match phase {
            PhaseConfig::ConstructionHeuristic(ch) => {
                PhaseBuilder::construction_heuristic::<_, _, ToyMove, _>(ch, toy_placer()).unwrap()
            }
            PhaseConfig::LocalSearch(ls) => {
                PhaseBuilder::local_search::<_, _, ToyMove, _>(ls, &config, toy_selector()).unwrap()
            }
        });
    }
    let mut solver = Solver::new(phases).with_config(&config).unwrap();
    assert!(solver.environment_mode().is_fully_asserted());

    let result = solver.solve(toy_director(ToySolution::new())).unwrap();
    assert!(result.is_ok());
    assert_eq!(result.step_count, 6);
    assert_eq!(result.score, HardSoftScore::of_soft(-4));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SolverConfig::from_toml_str(
        r#"
        [termination]
        best_score_limit = "zero"
        "#,
    )
    .unwrap();
    let err = Solver::new((queens_hill_climbing(),))
        .with_config(&config)
        .unwrap_err();
    assert!(matches!(err, StepwiseError::Config(_)));
}
