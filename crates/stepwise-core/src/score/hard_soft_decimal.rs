//! HardSoftDecimalScore - Two-level fixed point score with ×100000 scaling
//!
//! Represents decimal scores without heap allocation. Internal values are
//! scaled by 100000 to provide 5 decimal places of precision.

use std::fmt;

use super::traits::{split_init_score, write_init_prefix, ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// Scale factor for 5 decimal places of precision.
const SCALE: i64 = 100_000;

/// A score with hard and soft levels stored as scaled `i64` values.
///
/// Use [`of`](Self::of) for unscaled input or [`of_scaled`](Self::of_scaled)
/// for pre-scaled values.
///
/// # Examples
///
/// ```
/// use stepwise_core::{HardSoftDecimalScore, Score};
///
/// let score1 = HardSoftDecimalScore::of(-1, -100);
/// assert_eq!(score1.hard_scaled(), -100000);
///
/// let score2 = HardSoftDecimalScore::of_scaled(-3050000, 0);  // -30.5 hard
/// assert!(!score2.is_feasible());
///
/// let score3 = HardSoftDecimalScore::of_scaled(-150000, -250000);
/// assert_eq!(format!("{}", score3), "-1.5hard/-2.5soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftDecimalScore {
    init_score: i32,
    hard: i64,
    soft: i64,
}

impl HardSoftDecimalScore {
    pub const ZERO: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(0, 0);
    pub const ONE_HARD: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(SCALE, 0);
    pub const ONE_SOFT: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(0, SCALE);

    /// Creates a new score from unscaled values.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore::of_scaled(hard * SCALE, soft * SCALE)
    }

    /// Creates a new score from pre-scaled values.
    #[inline]
    pub const fn of_scaled(hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore {
            init_score: 0,
            hard,
            soft,
        }
    }

    #[inline]
    pub const fn hard_scaled(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft_scaled(&self) -> i64 {
        self.soft
    }
}

impl Score for HardSoftDecimalScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.init_score >= 0 && self.hard >= 0
    }

    #[inline]
    fn zero() -> Self {
        HardSoftDecimalScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        2
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        vec![self.hard, self.soft]
    }

    fn to_level_doubles(&self) -> Vec<f64> {
        vec![
            self.hard as f64 / SCALE as f64,
            self.soft as f64 / SCALE as f64,
        ]
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        assert_eq!(
            levels.len(),
            2,
            "HardSoftDecimalScore requires exactly 2 levels"
        );
        HardSoftDecimalScore::of_scaled(levels[0], levels[1])
    }

    impl_score_scale!(HardSoftDecimalScore { hard, soft });

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Hard,
            1 => ScoreLevel::Soft,
            _ => panic!("HardSoftDecimalScore has 2 levels, got index {}", index),
        }
    }
}

impl_score_ops!(HardSoftDecimalScore { hard, soft });

fn format_scaled(scaled: i64) -> String {
    if scaled % SCALE == 0 {
        (scaled / SCALE).to_string()
    } else {
        let formatted = format!("{:.5}", scaled as f64 / SCALE as f64);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn parse_scaled(part: &str, suffix: &str) -> Result<i64, ScoreParseError> {
    let part = part.trim();
    let num = part.strip_suffix(suffix).ok_or_else(|| ScoreParseError {
        message: format!("Score part '{}' must end with '{}'", part, suffix),
    })?;
    let value = num.parse::<f64>().map_err(|e| ScoreParseError {
        message: format!("Invalid {} score '{}': {}", suffix, num, e),
    })?;
    Ok((value * SCALE as f64).round() as i64)
}

impl fmt::Debug for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HardSoftDecimalScore({}, {}, {})",
            self.init_score,
            format_scaled(self.hard),
            format_scaled(self.soft)
        )
    }
}

impl fmt::Display for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_init_prefix(f, self.init_score)?;
        write!(
            f,
            "{}hard/{}soft",
            format_scaled(self.hard),
            format_scaled(self.soft)
        )
    }
}

impl ParseableScore for HardSoftDecimalScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let (init_score, rest) = split_init_score(s)?;
        let (hard, soft) = rest.split_once('/').ok_or_else(|| ScoreParseError {
            message: format!(
                "Invalid HardSoftDecimalScore format '{}': expected 'Xhard/Ysoft'",
                s.trim()
            ),
        })?;
        Ok(HardSoftDecimalScore {
            init_score,
            hard: parse_scaled(hard, "hard")?,
            soft: parse_scaled(soft, "soft")?,
        })
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}
