//! Stepwise solver engine
//!
//! This crate provides the local search machinery:
//! - Solver and its phase sequence
//! - Phases (construction heuristic, local search)
//! - Moves and move selectors, including chained variables
//! - Acceptors, foragers and single or multi threaded deciders
//! - Termination conditions
//! - Best solution tracking and the event system
//! - Configuration wiring (builder module)

pub mod builder;
pub mod event;
pub mod heuristic;
pub mod phase;
pub mod recaller;
pub mod scope;
pub mod solver;
pub mod termination;

pub use builder::{
    AcceptorBuilder, ForagerBuilder, PhaseBuilder, TerminationBuilder,
    DEFAULT_LATE_ACCEPTANCE_SIZE,
};
pub use event::{
    CountingEventListener, PhaseLifecycleListener, SolverEventListener, SolverEventSupport,
    StepLifecycleListener,
};
pub use heuristic::{
    ChainedChangeMove, ChainedChangeMoveSelector, ChainedMove, ChangeMove, ChangeMoveSelector,
    Move, MoveSelector, SelectionOrder, SubChainChangeMove, SubChainChangeMoveSelector,
    SubChainReversingChangeMove, TailChainSwapMove, TailChainSwapMoveSelector, TwoOptMove,
    TwoOptMoveSelector, UnionMoveSelector, VecMoveSelector,
};
pub use phase::{
    construction::{
        BestFitForager, ConstructionForager, ConstructionHeuristicPhase, EntityPlacer,
        FirstFitForager, Placement, QueuedEntityPlacer,
    },
    localsearch::{
        evaluate_move, AcceptedCountForager, Acceptor, CompositeAcceptor, GreatDelugeAcceptor,
        HillClimbingAcceptor, LateAcceptanceAcceptor, LocalSearchDecider, LocalSearchForager,
        LocalSearchPhase, MoveCandidate, MultiThreadedDecider, PhaseContext,
        SimulatedAnnealingAcceptor, SingleThreadedDecider, StepContext, StepOutcome,
        TabuSearchAcceptor,
    },
    Phase,
};
pub use recaller::{BestSolution, BestSolutionRecaller};
pub use scope::{PhaseScope, SolverScope, StepScope};
pub use solver::{PhaseSequence, SolveResult, Solver, SolverHandle};
pub use termination::{
    AndTermination, BestScoreFeasibleTermination, BestScoreTermination, NoTermination,
    OrTermination, ScoreCalculationCountTermination, StepCountTermination, Termination,
    TimeTermination, UnimprovedStepCountTermination,
};
