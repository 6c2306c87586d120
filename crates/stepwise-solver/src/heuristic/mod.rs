//! Heuristic components for solving
//!
//! This module contains:
//! - Moves: Operations that modify planning variables
//! - Selectors: Components that enumerate moves

pub mod r#move;
pub mod selector;

pub use r#move::{
    ChainedChangeMove, ChainedMove, ChangeMove, Move, SubChainChangeMove,
    SubChainReversingChangeMove, TailChainSwapMove, TwoOptMove,
};
pub use selector::{
    ChainedChangeMoveSelector, ChangeMoveSelector, MoveSelector, SelectionOrder,
    SubChainChangeMoveSelector, TailChainSwapMoveSelector, TwoOptMoveSelector, UnionMoveSelector,
    VecMoveSelector,
};
