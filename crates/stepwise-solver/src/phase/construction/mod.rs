//! Construction heuristic phase.
//!
//! Builds an initial solution by assigning a value to every uninitialized
//! planning variable, one entity per step.

mod forager;
mod phase;
mod placer;

pub use forager::{BestFitForager, ConstructionForager, FirstFitForager};
pub use phase::ConstructionHeuristicPhase;
pub use placer::{EntityPlacer, Placement, QueuedEntityPlacer};

#[cfg(test)]
mod tests;
