//! Core Score trait definition

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Core trait for all score types in Stepwise.
///
/// Scores represent the quality of a planning solution. Higher is better.
/// All score implementations are immutable value types: every operation
/// returns a new instance.
///
/// # Score Levels
///
/// Every score carries an *init score* in front of its levels. The init
/// score is zero for fully initialized solutions and minus the number of
/// uninitialized planning variables otherwise. It is compared before any
/// other level, so an initialized solution always beats an uninitialized one.
///
/// After the init score, hard levels are compared first, then medium (if
/// any), then soft levels.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if this score represents a feasible solution.
    ///
    /// A solution is feasible when it is fully initialized and every hard
    /// level is `>= 0`.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels, excluding the init score.
    fn levels_count() -> usize;

    /// Returns the init score: `0` when initialized, negative otherwise.
    fn init_score(&self) -> i32;

    /// Returns a copy of this score with the given init score.
    fn with_init_score(&self, init_score: i32) -> Self;

    /// Returns the level values, highest priority first, excluding the init score.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Returns the level values as floating point numbers.
    ///
    /// Fixed point scores override this to undo their scaling.
    fn to_level_doubles(&self) -> Vec<f64> {
        self.to_level_numbers().into_iter().map(|v| v as f64).collect()
    }

    /// Creates an initialized score from level numbers.
    ///
    /// # Panics
    /// Panics if the number of levels doesn't match `levels_count()`.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Multiplies this score by a scalar.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Divides this score by a scalar.
    fn divide(&self, divisor: f64) -> Self;

    /// Returns the absolute value of this score.
    fn abs(&self) -> Self;

    /// Returns the semantic label for the score level at the given index.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    /// Returns true if the init score is zero.
    fn is_solution_initialized(&self) -> bool {
        self.init_score() >= 0
    }

    /// Compares two scores, returning the ordering.
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Returns true if this score is better than the other score.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns true if this score is worse than the other score.
    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// Scores that can be parsed from their textual form.
pub trait ParseableScore: Score {
    /// Parses a score from a string representation.
    ///
    /// # Format
    /// - SimpleScore: `"42"` or `"-1init/42"`
    /// - HardSoftScore: `"0hard/-100soft"` or `"-2init/-1hard/0soft"`
    /// - HardMediumSoftScore: `"0hard/0medium/-100soft"`
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string representation of this score.
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl std::fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}

/// Splits an optional leading `"<n>init/"` part off a score string.
pub(crate) fn split_init_score(s: &str) -> Result<(i32, &str), ScoreParseError> {
    let s = s.trim();
    match s.split_once('/') {
        Some((head, rest)) if head.trim().ends_with("init") => {
            let num = head.trim().trim_end_matches("init");
            let init = num.parse::<i32>().map_err(|e| ScoreParseError {
                message: format!("Invalid init score '{}': {}", num, e),
            })?;
            if init > 0 {
                return Err(ScoreParseError {
                    message: format!("Init score {} must not be positive", init),
                });
            }
            Ok((init, rest))
        }
        _ => Ok((0, s)),
    }
}

/// Writes the `"<n>init/"` prefix when the score is not initialized.
pub(crate) fn write_init_prefix(f: &mut std::fmt::Formatter<'_>, init_score: i32) -> std::fmt::Result {
    if init_score != 0 {
        write!(f, "{}init/", init_score)?;
    }
    Ok(())
}
