//! Solver entry point that hides the phase wiring.

use stepwise_config::{ConstructionHeuristicConfig, LocalSearchConfig, PhaseConfig, SolverConfig};
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_core::score::ParseableScore;
use stepwise_scoring::ScoreDirector;
use stepwise_solver::heuristic::{Move, MoveSelector};
use stepwise_solver::phase::construction::EntityPlacer;
use stepwise_solver::{Phase, PhaseBuilder, SolveResult, Solver};
use tracing::debug;

/// Builds the configured phases and solves.
///
/// `placer` and `move_selector` are called once per construction heuristic
/// and local search phase. Without configured phases, a first fit
/// construction heuristic is followed by a late acceptance local search,
/// which only stops on the configured solver termination.
///
/// # Example
///
/// ```
/// use stepwise::run_solver;
/// use stepwise::config::SolverConfig;
/// use stepwise::solver::heuristic::ChangeMoveSelector;
/// use stepwise::solver::phase::construction::QueuedEntityPlacer;
/// use stepwise_test::toy::{
///     entity_count, get_value, set_value, toy_director, value_range, ToySolution,
/// };
///
/// let config = SolverConfig::from_toml_str(
///     r#"
///     [termination]
///     step_count_limit = 8
///     "#,
/// )
/// .unwrap();
///
/// let result = run_solver(
///     toy_director(ToySolution::new()),
///     &config,
///     || QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0),
///     || ChangeMoveSelector::new(get_value, set_value, entity_count, value_range, "value", 0),
/// )
/// .unwrap();
/// assert_eq!(result.step_count, 8);
/// assert!(result.solution.values.iter().all(Option::is_some));
/// ```
pub fn run_solver<S, D, M, P, MS>(
    score_director: D,
    config: &SolverConfig,
    placer: impl Fn() -> P,
    move_selector: impl Fn() -> MS,
) -> Result<SolveResult<S>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
    P: EntityPlacer<S, M> + 'static,
    MS: MoveSelector<S, M> + 'static,
{
    let default_phases;
    let phase_configs = if config.phases.is_empty() {
        debug!(event = "default_phases");
        default_phases = vec![
            PhaseConfig::ConstructionHeuristic(ConstructionHeuristicConfig::default()),
            PhaseConfig::LocalSearch(LocalSearchConfig::default()),
        ];
        &default_phases
    } else {
        &config.phases
    };

    let mut phases: Vec<Box<dyn Phase<S, D>>> = Vec::with_capacity(phase_configs.len());
    for phase_config in phase_configs {
        let phase = match phase_config {
            PhaseConfig::ConstructionHeuristic(ch) => {
                PhaseBuilder::construction_heuristic::<S, D, M, P>(ch, placer())?
            }
            PhaseConfig::LocalSearch(ls) => {
                PhaseBuilder::local_search::<S, D, M, MS>(ls, config, move_selector())?
            }
        };
        phases.push(phase);
    }

    let mut solver = Solver::new(phases).with_config(config)?;
    solver.solve(score_director)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_config::TerminationConfig;
    use stepwise_core::score::HardSoftScore;
    use stepwise_solver::heuristic::ChangeMoveSelector;
    use stepwise_solver::phase::construction::QueuedEntityPlacer;
    use stepwise_test::toy::{
        entity_count, get_value, set_value, toy_director, value_range, ToySolution,
    };

    fn placer() -> QueuedEntityPlacer<ToySolution, u8> {
        QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0)
    }

    fn selector() -> ChangeMoveSelector<ToySolution, u8> {
        ChangeMoveSelector::new(get_value, set_value, entity_count, value_range, "value", 0)
    }

    #[test]
    fn test_configured_phases() {
        let config = SolverConfig::from_toml_str(
            r#"
            [termination]
            step_count_limit = 7

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

        let result = run_solver(toy_director(ToySolution::new()), &config, placer, selector).unwrap();

        assert_eq!(result.step_count, 7);
        assert_eq!(result.score, HardSoftScore::of_soft(-4));
    }

    #[test]
    fn test_default_phases_keep_construction_result() {
        let config = SolverConfig {
            termination: Some(TerminationConfig::default().with_step_count_limit(12)),
            ..SolverConfig::new()
        };

        let result = run_solver(toy_director(ToySolution::new()), &config, placer, selector).unwrap();

        assert_eq!(result.step_count, 12);
        assert!(result.solution.values.iter().all(Option::is_some));
        assert!(result.score >= HardSoftScore::of_soft(-10));
    }

    #[test]
    fn test_missing_temperature_is_rejected() {
        let config = SolverConfig::from_toml_str(
            r#"
            [[phases]]
            type = "local_search"
            [phases.acceptor]
            type = "simulated_annealing"
            "#,
        )
        .unwrap();

        let err = run_solver(toy_director(ToySolution::new()), &config, placer, selector).unwrap_err();
        assert!(matches!(err, stepwise_core::StepwiseError::Config(_)));
    }
}
