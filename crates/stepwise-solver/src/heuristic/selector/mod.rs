//! Move selectors.
//!
//! Selectors enumerate the moves that the solver considers each step.

mod chained;
mod change;
mod move_selector;
mod selection_order;

pub use chained::{
    ChainedChangeMoveSelector, SubChainChangeMoveSelector, TailChainSwapMoveSelector,
    TwoOptMoveSelector,
};
pub use change::ChangeMoveSelector;
pub use move_selector::{MoveSelector, UnionMoveSelector, VecMoveSelector};
pub use selection_order::SelectionOrder;

#[cfg(test)]
mod tests;
