//! Local search phase
//!
//! Improves an existing solution by iteratively applying moves
//! that are accepted according to an acceptance criterion.
//!
//! ```text
//! LocalSearchPhase
//!   └── decider (single or multi threaded)
//!         ├── move selector   which moves to try
//!         ├── acceptor        which evaluated moves qualify
//!         └── forager         which qualifying move to commit
//! ```

mod acceptor;
mod decider;
mod forager;
mod phase;

pub use acceptor::{
    Acceptor, CompositeAcceptor, GreatDelugeAcceptor, HillClimbingAcceptor,
    LateAcceptanceAcceptor, MoveCandidate, PhaseContext, SimulatedAnnealingAcceptor,
    StepContext, StepOutcome, TabuSearchAcceptor,
};
pub use decider::{
    evaluate_move, LocalSearchDecider, MultiThreadedDecider, SingleThreadedDecider,
};
pub use forager::{AcceptedCountForager, LocalSearchForager};
pub use phase::LocalSearchPhase;
