//! Score director implementations.
//!
//! The score director owns the working solution and keeps its score,
//! chain supplies and shadow variables consistent with every change.
//!
//! # Score Director Types
//!
//! - [`SimpleScoreDirector`] - Full recalculation (baseline)
//! - [`IncrementalScoreDirector`] - Delta-based scoring through an
//!   [`IncrementalScoreCalculator`](crate::IncrementalScoreCalculator)

mod guard;
mod incremental;
mod listener_support;
mod simple;
mod traits;


pub use guard::{begin_variable_change, VariableChange};
pub use incremental::IncrementalScoreDirector;
pub use listener_support::{ShadowObserver, VariableListenerSupport};
pub use simple::SimpleScoreDirector;
pub use traits::ScoreDirector;
