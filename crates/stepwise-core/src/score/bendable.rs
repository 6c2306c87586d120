//! BendableScore - Multi-level score with a compile-time number of levels

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::traits::{split_init_score, write_init_prefix, ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with `H` hard levels followed by `S` soft levels.
///
/// The level counts are const generics so the score stays `Copy` and
/// allocation free, like every other score type.
///
/// # Examples
///
/// ```
/// use stepwise_core::score::{BendableScore, Score};
///
/// let score = BendableScore::<2, 3>::of([-1, -2], [-10, -20, -30]);
///
/// assert_eq!(score.hard_score(1), -2);
/// assert_eq!(score.soft_score(2), -30);
/// assert!(!score.is_feasible());
/// assert_eq!(BendableScore::<2, 3>::levels_count(), 5);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BendableScore<const H: usize, const S: usize> {
    init_score: i32,
    hard_scores: [i64; H],
    soft_scores: [i64; S],
}

impl<const H: usize, const S: usize> BendableScore<H, S> {
    /// Creates a new initialized score.
    pub const fn of(hard_scores: [i64; H], soft_scores: [i64; S]) -> Self {
        BendableScore {
            init_score: 0,
            hard_scores,
            soft_scores,
        }
    }

    /// Returns the hard score at the given level.
    ///
    /// # Panics
    /// Panics if the level is out of bounds.
    pub fn hard_score(&self, level: usize) -> i64 {
        self.hard_scores[level]
    }

    /// Returns the soft score at the given level.
    ///
    /// # Panics
    /// Panics if the level is out of bounds.
    pub fn soft_score(&self, level: usize) -> i64 {
        self.soft_scores[level]
    }

    pub fn hard_scores(&self) -> &[i64; H] {
        &self.hard_scores
    }

    pub fn soft_scores(&self) -> &[i64; S] {
        &self.soft_scores
    }

    fn map_levels(&self, init_score: i32, f: impl Fn(i64) -> i64) -> Self {
        BendableScore {
            init_score,
            hard_scores: self.hard_scores.map(&f),
            soft_scores: self.soft_scores.map(&f),
        }
    }

    fn zip_levels(&self, other: &Self, init_score: i32, f: impl Fn(i64, i64) -> i64) -> Self {
        let mut result = *self;
        result.init_score = init_score;
        for (level, value) in result.hard_scores.iter_mut().enumerate() {
            *value = f(self.hard_scores[level], other.hard_scores[level]);
        }
        for (level, value) in result.soft_scores.iter_mut().enumerate() {
            *value = f(self.soft_scores[level], other.soft_scores[level]);
        }
        result
    }
}

impl<const H: usize, const S: usize> Default for BendableScore<H, S> {
    fn default() -> Self {
        BendableScore::of([0; H], [0; S])
    }
}

impl<const H: usize, const S: usize> Score for BendableScore<H, S> {
    fn is_feasible(&self) -> bool {
        self.init_score >= 0 && self.hard_scores.iter().all(|&s| s >= 0)
    }

    fn zero() -> Self {
        Self::default()
    }

    fn levels_count() -> usize {
        H + S
    }

    fn init_score(&self) -> i32 {
        self.init_score
    }

    fn with_init_score(&self, init_score: i32) -> Self {
        BendableScore { init_score, ..*self }
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        self.hard_scores
            .iter()
            .chain(self.soft_scores.iter())
            .copied()
            .collect()
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        assert_eq!(
            levels.len(),
            H + S,
            "BendableScore requires exactly {} levels",
            H + S
        );
        let mut score = Self::default();
        score.hard_scores.copy_from_slice(&levels[..H]);
        score.soft_scores.copy_from_slice(&levels[H..]);
        score
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        let init = (self.init_score as f64 * multiplicand).floor() as i32;
        self.map_levels(init, |v| (v as f64 * multiplicand).round() as i64)
    }

    fn divide(&self, divisor: f64) -> Self {
        let init = (self.init_score as f64 / divisor).floor() as i32;
        self.map_levels(init, |v| (v as f64 / divisor).round() as i64)
    }

    fn abs(&self) -> Self {
        self.map_levels(self.init_score.abs(), i64::abs)
    }

    fn level_label(index: usize) -> ScoreLevel {
        if index < H {
            ScoreLevel::Hard
        } else if index < H + S {
            ScoreLevel::Soft
        } else {
            panic!("BendableScore has {} levels, got index {}", H + S, index)
        }
    }
}

impl<const H: usize, const S: usize> Ord for BendableScore<H, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.init_score
            .cmp(&other.init_score)
            .then_with(|| self.hard_scores.cmp(&other.hard_scores))
            .then_with(|| self.soft_scores.cmp(&other.soft_scores))
    }
}

impl<const H: usize, const S: usize> PartialOrd for BendableScore<H, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const H: usize, const S: usize> Add for BendableScore<H, S> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_levels(&other, self.init_score + other.init_score, |a, b| a + b)
    }
}

impl<const H: usize, const S: usize> Sub for BendableScore<H, S> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_levels(&other, self.init_score - other.init_score, |a, b| a - b)
    }
}

impl<const H: usize, const S: usize> Neg for BendableScore<H, S> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map_levels(-self.init_score, |v| -v)
    }
}

fn join_levels(levels: &[i64]) -> String {
    levels
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

impl<const H: usize, const S: usize> fmt::Debug for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BendableScore({}, {:?}, {:?})",
            self.init_score, self.hard_scores, self.soft_scores
        )
    }
}

impl<const H: usize, const S: usize> fmt::Display for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_init_prefix(f, self.init_score)?;
        write!(
            f,
            "[{}]hard/[{}]soft",
            join_levels(&self.hard_scores),
            join_levels(&self.soft_scores)
        )
    }
}

fn parse_bracketed<const N: usize>(part: &str, suffix: &str) -> Result<[i64; N], ScoreParseError> {
    let inner = part
        .trim()
        .strip_suffix(suffix)
        .and_then(|p| p.strip_prefix('['))
        .and_then(|p| p.strip_suffix(']'))
        .ok_or_else(|| ScoreParseError {
            message: format!("Score part '{}' must look like '[..]{}'", part.trim(), suffix),
        })?;
    let mut levels = [0; N];
    let values: Vec<&str> = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split('/').collect()
    };
    if values.len() != N {
        return Err(ScoreParseError {
            message: format!("Expected {} {} levels in '{}'", N, suffix, part.trim()),
        });
    }
    for (slot, value) in levels.iter_mut().zip(values) {
        *slot = value.trim().parse::<i64>().map_err(|e| ScoreParseError {
            message: format!("Invalid {} level '{}': {}", suffix, value, e),
        })?;
    }
    Ok(levels)
}

impl<const H: usize, const S: usize> ParseableScore for BendableScore<H, S> {
    /// Parses `"[h1/h2]hard/[s1/s2/s3]soft"`, optionally prefixed by `"Ninit/"`.
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let (init_score, rest) = split_init_score(s)?;
        let split = rest.find("hard/").ok_or_else(|| ScoreParseError {
            message: format!("Invalid BendableScore format '{}'", s.trim()),
        })?;
        let (hard, soft) = rest.split_at(split + "hard".len());
        Ok(BendableScore {
            init_score,
            hard_scores: parse_bracketed::<H>(hard, "hard")?,
            soft_scores: parse_bracketed::<S>(&soft[1..], "soft")?,
        })
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}
