//! Builders turning configuration into solver components.
//!
//! Score strings in the configuration (temperatures, water levels, best
//! score limits) are parsed here, where the score type is known. Every
//! invalid value is reported as a [`StepwiseError::Config`] before any step
//! runs.

use stepwise_config::{
    AcceptorConfig, ConstructionHeuristicConfig, ConstructionHeuristicType, ForagerConfig,
    GreatDelugeConfig, LocalSearchConfig, SolverConfig, TabuSearchConfig, TerminationConfig,
};
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_core::score::ParseableScore;
use stepwise_core::StepwiseError;
use stepwise_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::phase::construction::{
    BestFitForager, ConstructionHeuristicPhase, EntityPlacer, FirstFitForager,
};
use crate::phase::localsearch::{
    AcceptedCountForager, Acceptor, CompositeAcceptor, GreatDelugeAcceptor, HillClimbingAcceptor,
    LateAcceptanceAcceptor, LocalSearchPhase, MultiThreadedDecider, SimulatedAnnealingAcceptor,
    SingleThreadedDecider, TabuSearchAcceptor,
};
use crate::phase::Phase;
use crate::termination::{
    BestScoreFeasibleTermination, BestScoreTermination, NoTermination, OrTermination,
    ScoreCalculationCountTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};

/// Late acceptance size used when a local search phase names no acceptor.
pub const DEFAULT_LATE_ACCEPTANCE_SIZE: usize = 400;

/// Parses a score string of a configuration field.
fn parse_score<Sc: ParseableScore>(field: &str, value: &str) -> Result<Sc> {
    Sc::parse(value).map_err(|e| {
        StepwiseError::Config(format!("{} '{}' is not a valid score: {}", field, value, e))
    })
}

/// Builder for acceptors.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    /// Builds an acceptor from configuration.
    pub fn build<S, M>(config: &AcceptorConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        M: Move<S>,
    {
        config.validate()?;
        Self::build_validated(config)
    }

    /// Late acceptance over the last [`DEFAULT_LATE_ACCEPTANCE_SIZE`] steps.
    pub fn default_acceptor<S, M>() -> Box<dyn Acceptor<S, M>>
    where
        S: PlanningSolution,
        M: Move<S>,
    {
        Box::new(LateAcceptanceAcceptor::<S>::new(DEFAULT_LATE_ACCEPTANCE_SIZE))
    }

    fn build_validated<S, M>(config: &AcceptorConfig) -> Result<Box<dyn Acceptor<S, M>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        M: Move<S>,
    {
        let acceptor: Box<dyn Acceptor<S, M>> = match config {
            AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::<S>::new()),
            AcceptorConfig::TabuSearch(tabu) => Box::new(Self::tabu_search::<S, M>(tabu)),
            AcceptorConfig::SimulatedAnnealing(sa) => {
                let temperature = sa.starting_temperature.as_deref().ok_or_else(|| {
                    StepwiseError::Config(
                        "simulated annealing needs a starting_temperature".to_string(),
                    )
                })?;
                let temperature = parse_score("starting_temperature", temperature)?;
                Box::new(SimulatedAnnealingAcceptor::<S>::new(temperature))
            }
            AcceptorConfig::LateAcceptance(la) => Box::new(LateAcceptanceAcceptor::<S>::new(
                la.late_acceptance_size
                    .unwrap_or(DEFAULT_LATE_ACCEPTANCE_SIZE),
            )),
            AcceptorConfig::GreatDeluge(gd) => Box::new(Self::great_deluge::<S>(gd)?),
            AcceptorConfig::Composite(composite) => {
                let acceptors = composite
                    .acceptors
                    .iter()
                    .map(Self::build_validated::<S, M>)
                    .collect::<Result<Vec<_>>>()?;
                Box::new(CompositeAcceptor::new(acceptors))
            }
        };
        Ok(acceptor)
    }

    fn tabu_search<S, M>(config: &TabuSearchConfig) -> TabuSearchAcceptor<S, M>
    where
        S: PlanningSolution,
        M: Move<S>,
    {
        let mut acceptor =
            TabuSearchAcceptor::new().with_aspiration(config.aspiration_enabled.unwrap_or(true));
        if let Some(size) = config.entity_tabu_size {
            acceptor = acceptor.with_entity_tabu_size(size);
        }
        if let Some(size) = config.value_tabu_size {
            acceptor = acceptor.with_value_tabu_size(size);
        }
        if let Some(size) = config.move_tabu_size {
            acceptor = acceptor.with_move_tabu_size(size);
        }
        acceptor
    }

    fn great_deluge<S>(config: &GreatDelugeConfig) -> Result<GreatDelugeAcceptor<S>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
    {
        let mut acceptor = GreatDelugeAcceptor::new();
        if let Some(level) = &config.water_level {
            acceptor = acceptor.with_water_level(parse_score("water_level", level)?);
        }
        if let Some(increment) = &config.water_level_increment_score {
            acceptor = acceptor
                .with_increment_score(parse_score("water_level_increment_score", increment)?);
        }
        if let Some(ratio) = config.water_level_increment_ratio {
            acceptor = acceptor.with_increment_ratio(ratio);
        }
        Ok(acceptor)
    }
}

/// Builder for local search foragers.
pub struct ForagerBuilder;

impl ForagerBuilder {
    /// Builds a forager, with the forager defaults where `config` is silent.
    pub fn build<S, M>(config: Option<&ForagerConfig>) -> Result<AcceptedCountForager<S, M>>
    where
        S: PlanningSolution,
        M: Move<S>,
    {
        let mut forager = AcceptedCountForager::new();
        let Some(config) = config else {
            return Ok(forager);
        };
        if let Some(limit) = config.accepted_count_limit {
            if limit == 0 {
                return Err(StepwiseError::Config(
                    "accepted_count_limit must be at least 1".to_string(),
                ));
            }
            forager = forager.with_accepted_count_limit(limit);
        }
        if let Some(pick_early_type) = config.pick_early_type {
            forager = forager.with_pick_early_type(pick_early_type);
        }
        if let Some(break_tie_randomly) = config.break_tie_randomly {
            forager = forager.with_break_tie_randomly(break_tie_randomly);
        }
        Ok(forager)
    }
}

/// Builder for terminations.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Builds the OR of every configured limit, or `None` when no limit is
    /// configured.
    pub fn build<S, D>(config: &TerminationConfig) -> Result<Option<Box<dyn Termination<S, D>>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S> + 'static,
    {
        let mut terminations: Vec<Box<dyn Termination<S, D>>> = Vec::new();

        if let Some(limit) = config.time_limit() {
            terminations.push(Box::new(TimeTermination::new(limit)));
        }
        if let Some(limit) = &config.best_score_limit {
            let target: S::Score = parse_score("best_score_limit", limit)?;
            terminations.push(Box::new(BestScoreTermination::new(target)));
        }
        if config.best_score_feasible == Some(true) {
            terminations.push(Box::new(BestScoreFeasibleTermination::new()));
        }
        if let Some(limit) = config.step_count_limit {
            terminations.push(Box::new(StepCountTermination::new(limit)));
        }
        if let Some(limit) = config.unimproved_step_count_limit {
            terminations.push(Box::new(UnimprovedStepCountTermination::new(limit)));
        }
        if let Some(limit) = config.score_calculation_count_limit {
            terminations.push(Box::new(ScoreCalculationCountTermination::new(limit)));
        }

        Ok(match terminations.len() {
            0 => None,
            1 => terminations.pop(),
            _ => Some(Box::new(OrTermination::new(terminations))),
        })
    }

    /// Builds a phase termination, never terminating when unconfigured.
    pub fn build_or_never<S, D>(
        config: Option<&TerminationConfig>,
    ) -> Result<Box<dyn Termination<S, D>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S> + 'static,
    {
        let built = match config {
            Some(config) => Self::build(config)?,
            None => None,
        };
        Ok(built.unwrap_or_else(|| Box::new(NoTermination)))
    }
}

/// Builder for phases.
///
/// The configuration picks the algorithms. The domain supplies what the
/// configuration can't: the placer or the move selector.
pub struct PhaseBuilder;

impl PhaseBuilder {
    /// Builds a construction heuristic phase around `placer`.
    pub fn construction_heuristic<S, D, M, P>(
        config: &ConstructionHeuristicConfig,
        placer: P,
    ) -> Result<Box<dyn Phase<S, D>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S> + 'static,
        M: Move<S>,
        P: EntityPlacer<S, M> + 'static,
    {
        let termination = TerminationBuilder::build_or_never::<S, D>(config.termination.as_ref())?;
        let phase: Box<dyn Phase<S, D>> = match config.construction_heuristic_type {
            ConstructionHeuristicType::FirstFit => Box::new(
                ConstructionHeuristicPhase::new(placer, FirstFitForager::<S, M>::new())
                    .with_termination(termination),
            ),
            ConstructionHeuristicType::BestFit => Box::new(
                ConstructionHeuristicPhase::new(placer, BestFitForager::<S, M>::new())
                    .with_termination(termination),
            ),
        };
        Ok(phase)
    }

    /// Builds a local search phase around `move_selector`.
    ///
    /// Moves are evaluated on worker threads when the solver configuration
    /// asks for move threads.
    pub fn local_search<S, D, M, MS>(
        config: &LocalSearchConfig,
        solver_config: &SolverConfig,
        move_selector: MS,
    ) -> Result<Box<dyn Phase<S, D>>>
    where
        S: PlanningSolution,
        S::Score: ParseableScore,
        D: ScoreDirector<S> + 'static,
        M: Move<S>,
        MS: MoveSelector<S, M> + 'static,
    {
        config.validate()?;
        let acceptor = match &config.acceptor {
            Some(acceptor) => AcceptorBuilder::build::<S, M>(acceptor)?,
            None => AcceptorBuilder::default_acceptor::<S, M>(),
        };
        let forager = match (&config.acceptor, &config.forager) {
            // Late acceptance by default, which evaluates a single accepted move.
            (None, None) => AcceptedCountForager::new().with_accepted_count_limit(1),
            (_, forager) => ForagerBuilder::build::<S, M>(forager.as_ref())?,
        };
        let termination = TerminationBuilder::build_or_never::<S, D>(config.termination.as_ref())?;

        let phase: Box<dyn Phase<S, D>> = match solver_config.move_thread_count.resolve() {
            Some(0) => {
                return Err(StepwiseError::Config(
                    "move_thread_count must be at least 1".to_string(),
                ))
            }
            Some(move_thread_count) => {
                let mut decider =
                    MultiThreadedDecider::new(move_selector, acceptor, forager, move_thread_count);
                match solver_config.move_thread_buffer_size {
                    Some(0) => {
                        return Err(StepwiseError::Config(
                            "move_thread_buffer_size must be at least 1".to_string(),
                        ))
                    }
                    Some(size) => decider = decider.with_move_thread_buffer_size(size),
                    None => {}
                }
                Box::new(LocalSearchPhase::new(decider, termination))
            }
            None => Box::new(LocalSearchPhase::new(
                SingleThreadedDecider::new(move_selector, acceptor, forager),
                termination,
            )),
        };
        Ok(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_config::{
        CompositeAcceptorConfig, EnvironmentMode, LateAcceptanceConfig, MoveThreadCount,
        SimulatedAnnealingConfig,
    };
    use stepwise_core::score::{HardSoftScore, SimpleScore};
    use stepwise_scoring::SimpleScoreDirector;
    use stepwise_test::nqueens::{
        get_queen_row, nqueens_director, queen_count, row_values, set_queen_row, ConflictFn,
        NQueensSolution,
    };
    use stepwise_test::toy::{
        entity_count, get_value, set_value, toy_director, value_range, ToyScoreFn, ToySolution,
    };

    use crate::heuristic::r#move::ChangeMove;
    use crate::heuristic::selector::ChangeMoveSelector;
    use crate::phase::construction::QueuedEntityPlacer;
    use crate::scope::SolverScope;

    type QueenMove = ChangeMove<NQueensSolution, i64>;
    type QueensDirector = SimpleScoreDirector<NQueensSolution, ConflictFn>;
    type ToyDirector = SimpleScoreDirector<ToySolution, ToyScoreFn>;

    fn build_acceptor(config: &AcceptorConfig) -> Result<Box<dyn Acceptor<NQueensSolution, QueenMove>>> {
        AcceptorBuilder::build(config)
    }

    fn row_selector() -> ChangeMoveSelector<NQueensSolution, i64> {
        ChangeMoveSelector::new(get_queen_row, set_queen_row, queen_count, row_values, "row", 0)
    }

    #[test]
    fn test_builds_each_acceptor() {
        let configs = [
            (AcceptorConfig::HillClimbing, "HillClimbingAcceptor"),
            (
                AcceptorConfig::TabuSearch(TabuSearchConfig {
                    entity_tabu_size: Some(5),
                    ..Default::default()
                }),
                "TabuSearchAcceptor",
            ),
            (
                AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
                    starting_temperature: Some("2".to_string()),
                }),
                "SimulatedAnnealingAcceptor",
            ),
            (
                AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
                    late_acceptance_size: Some(10),
                }),
                "LateAcceptanceAcceptor",
            ),
            (
                AcceptorConfig::GreatDeluge(GreatDelugeConfig {
                    water_level_increment_score: Some("1".to_string()),
                    ..Default::default()
                }),
                "GreatDelugeAcceptor",
            ),
        ];
        for (config, name) in configs {
            let acceptor = build_acceptor(&config).unwrap();
            assert!(format!("{:?}", acceptor).contains(name), "{:?}", acceptor);
        }
    }

    #[test]
    fn test_composite_acceptor() {
        let config = AcceptorConfig::Composite(CompositeAcceptorConfig {
            acceptors: vec![
                AcceptorConfig::HillClimbing,
                AcceptorConfig::TabuSearch(TabuSearchConfig {
                    move_tabu_size: Some(3),
                    ..Default::default()
                }),
            ],
        });
        let acceptor = build_acceptor(&config).unwrap();
        assert!(format!("{:?}", acceptor).contains("CompositeAcceptor"));
    }

    #[test]
    fn test_invalid_acceptors_are_config_errors() {
        let configs = [
            AcceptorConfig::TabuSearch(TabuSearchConfig {
                entity_tabu_size: Some(0),
                ..Default::default()
            }),
            AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
                late_acceptance_size: Some(0),
            }),
            AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
                starting_temperature: Some("warm".to_string()),
            }),
            AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig::default()),
            AcceptorConfig::Composite(CompositeAcceptorConfig { acceptors: vec![] }),
        ];
        for config in configs {
            let err = build_acceptor(&config).unwrap_err();
            assert!(matches!(err, StepwiseError::Config(_)), "{:?}: {}", config, err);
        }
    }

    #[test]
    fn test_score_strings_use_the_solution_score_type() {
        let config = AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some("0hard/2soft".to_string()),
        });
        let acceptor: Result<Box<dyn Acceptor<ToySolution, ChangeMove<ToySolution, u8>>>> =
            AcceptorBuilder::build(&config);
        assert!(acceptor.is_ok());

        let err = build_acceptor(&config).unwrap_err();
        assert!(err.to_string().contains("starting_temperature"));
    }

    #[test]
    fn test_forager_rejects_zero_accepted_count() {
        let config = ForagerConfig {
            accepted_count_limit: Some(0),
            ..Default::default()
        };
        let err = ForagerBuilder::build::<NQueensSolution, QueenMove>(Some(&config)).unwrap_err();
        assert!(matches!(err, StepwiseError::Config(_)));
        assert!(ForagerBuilder::build::<NQueensSolution, QueenMove>(None).is_ok());
    }

    #[test]
    fn test_empty_termination_builds_nothing() {
        let built =
            TerminationBuilder::build::<NQueensSolution, QueensDirector>(&TerminationConfig::default())
                .unwrap();
        assert!(built.is_none());
    }

    #[test]
    fn test_best_score_limit_termination() {
        let config = TerminationConfig {
            best_score_limit: Some("0".to_string()),
            step_count_limit: Some(100),
            ..Default::default()
        };
        let termination = TerminationBuilder::build::<NQueensSolution, QueensDirector>(&config)
            .unwrap()
            .unwrap();

        let mut solved = SolverScope::new(nqueens_director(&[1, 3, 0, 2]));
        solved.start_solving();
        assert!(termination.is_solver_terminated(&solved));

        let mut unsolved = SolverScope::new(nqueens_director(&[0, 0, 0, 0]));
        unsolved.start_solving();
        assert!(!termination.is_solver_terminated(&unsolved));
    }

    #[test]
    fn test_unparsable_best_score_limit() {
        let config = TerminationConfig {
            best_score_limit: Some("0hard".to_string()),
            ..Default::default()
        };
        let err = TerminationBuilder::build::<NQueensSolution, QueensDirector>(&config).unwrap_err();
        assert!(matches!(err, StepwiseError::Config(_)));
    }

    #[test]
    fn test_local_search_picks_decider_from_thread_count() {
        let config = LocalSearchConfig::default();

        let single = PhaseBuilder::local_search::<NQueensSolution, QueensDirector, _, _>(
            &config,
            &SolverConfig::new(),
            row_selector(),
        )
        .unwrap();
        assert!(format!("{:?}", single).contains("SingleThreadedDecider"));

        let threaded = SolverConfig::new().with_move_thread_count(MoveThreadCount::Count(2));
        let multi = PhaseBuilder::local_search::<NQueensSolution, QueensDirector, _, _>(
            &config,
            &threaded,
            row_selector(),
        )
        .unwrap();
        assert!(format!("{:?}", multi).contains("MultiThreadedDecider"));
    }

    #[test]
    fn test_zero_move_thread_buffer_is_rejected() {
        let mut solver_config = SolverConfig::new().with_move_thread_count(MoveThreadCount::Count(2));
        solver_config.move_thread_buffer_size = Some(0);
        let err = PhaseBuilder::local_search::<NQueensSolution, QueensDirector, _, _>(
            &LocalSearchConfig::default(),
            &solver_config,
            row_selector(),
        )
        .unwrap_err();
        assert!(matches!(err, StepwiseError::Config(_)));
    }

    #[test]
    fn test_built_construction_phase_solves() {
        let config = ConstructionHeuristicConfig {
            construction_heuristic_type: ConstructionHeuristicType::BestFit,
            termination: None,
        };
        let placer =
            QueuedEntityPlacer::new(get_value, set_value, entity_count, value_range, "value", 0);
        let mut phase =
            PhaseBuilder::construction_heuristic::<ToySolution, ToyDirector, _, _>(&config, placer)
                .unwrap();

        let mut scope = SolverScope::new(toy_director(ToySolution::new()))
            .with_environment_mode(EnvironmentMode::FastAssert);
        scope.start_solving();
        phase.solve(&mut scope).unwrap();
        assert_eq!(scope.best_score(), Some(HardSoftScore::of_soft(-4)));
    }

    #[test]
    fn test_built_local_search_phase_improves() {
        let config = LocalSearchConfig::default()
            .with_acceptor(AcceptorConfig::HillClimbing)
            .with_termination(TerminationConfig::default().with_step_count_limit(3));
        let mut phase = PhaseBuilder::local_search::<NQueensSolution, QueensDirector, _, _>(
            &config,
            &SolverConfig::new(),
            row_selector(),
        )
        .unwrap();

        let mut scope = SolverScope::new(nqueens_director(&[0, 0, 0, 0]));
        scope.start_solving();
        phase.solve(&mut scope).unwrap();
        assert_eq!(scope.total_step_count(), 3);
        assert!(scope.best_score().unwrap() > SimpleScore::of(-6));
    }
}
