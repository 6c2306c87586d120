//! Domain model traits for defining planning problems
//!
//! - `PlanningSolution`: the container for the complete problem and solution
//! - `ChainedVariableDescriptor`: typed access to a chained planning variable
//! - `ChainSupply`: trailing entity and anchor lookups for a chained variable
//! - `ShadowVariableListener`: derived variables recomputed from genuine ones

mod traits;
mod variable;
pub mod listener;
pub mod supply;

pub use listener::{ListenerGraph, ShadowVariableListener};
pub use supply::ChainSupply;
pub use traits::PlanningSolution;
pub use variable::{ChainValue, ChainedVariableDescriptor};
