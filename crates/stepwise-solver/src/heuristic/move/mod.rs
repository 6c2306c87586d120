//! Move system for modifying planning solutions.
//!
//! Moves are the fundamental operations that modify planning variables during
//! solving. The solver explores the solution space by evaluating moves
//! against the working solution and committing the one the forager picks.
//!
//! # Architecture
//!
//! All moves are fully typed, plain data addressed by entity index:
//! - `ChangeMove<S, V>` - assigns a value to a basic variable
//! - `ChainedMove<S>` - any of the chained variable moves:
//!   - `ChainedChangeMove<S>` - relocates one entity
//!   - `SubChainChangeMove<S>` - relocates a contiguous sub-chain
//!   - `SubChainReversingChangeMove<S>` - relocates and reverses a sub-chain
//!   - `TailChainSwapMove<S>` - swaps the tails of two chains
//!   - `TwoOptMove<S>` - reverses a path inside one chain
//!
//! Every move builds its own undo move before it is applied.

mod change;
pub mod chained;
mod traits;

pub use change::ChangeMove;
pub use chained::{
    ChainedChangeMove, ChainedMove, SubChainChangeMove, SubChainReversingChangeMove,
    TailChainSwapMove, TwoOptMove,
};
pub use traits::Move;

#[cfg(test)]
mod tests;
