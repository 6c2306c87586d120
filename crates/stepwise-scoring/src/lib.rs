//! Score directors for Stepwise.
//!
//! This crate provides:
//! - The [`ScoreDirector`] trait that moves and phases mutate solutions through
//! - [`SimpleScoreDirector`] for full recalculation
//! - [`IncrementalScoreDirector`] for delta-based [`IncrementalScoreCalculator`]s
//! - Chain supply and shadow variable maintenance shared by both

pub mod calculator;
pub mod director;

pub use calculator::{ConstraintMatchTotal, IncrementalScoreCalculator};
pub use director::{
    begin_variable_change, IncrementalScoreDirector, ScoreDirector, ShadowObserver,
    SimpleScoreDirector, VariableChange, VariableListenerSupport,
};
