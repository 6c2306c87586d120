//! Stepwise - A metaheuristic local search solver in Rust
//!
//! Describe the planning variables with function pointers, score the
//! solution with a score director, and let the configured phases improve it.
//!
//! # Example
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(score.is_feasible());
//! ```

pub use stepwise_config as config;
pub use stepwise_scoring as scoring;
pub use stepwise_solver as solver;

// Score types
pub use stepwise_core::score::{
    BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore,
    Score, SimpleScore,
};

pub use stepwise_core::domain::PlanningSolution;
pub use stepwise_core::{Result, StepwiseError};
pub use stepwise_scoring::{ScoreDirector, SimpleScoreDirector};

mod run;
pub use run::run_solver;

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore,
        Score, SimpleScore,
    };
    pub use super::{PlanningSolution, ScoreDirector, SimpleScoreDirector, StepwiseError};
    pub use stepwise_config::{EnvironmentMode, SolverConfig};
    pub use stepwise_solver::{
        ChangeMove, ChangeMoveSelector, ConstructionHeuristicPhase, LocalSearchPhase, Move,
        MoveSelector, QueuedEntityPlacer, SolveResult, Solver, SolverHandle,
    };
}
