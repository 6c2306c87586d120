//! Stepwise Core - Core types and traits for local search solving
//!
//! This crate provides the fundamental abstractions for Stepwise:
//! - Score types for representing solution quality
//! - Domain traits for defining planning problems
//! - Chained variable metadata and supplies
//! - The workspace error type

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
pub use error::{Result, StepwiseError};
pub use score::{
    BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore, Score,
    ScoreLevel, ScoreParseError, SimpleScore,
};
