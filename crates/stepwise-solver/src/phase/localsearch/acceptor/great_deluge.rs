//! Great deluge acceptor.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::Score;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepOutcome};

/// Default share of the water level's magnitude added each step.
pub const DEFAULT_WATER_LEVEL_INCREMENT_RATIO: f64 = 0.00000005;

/// How the water level rises after each step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rise<Sc> {
    /// A fixed score added every step.
    Score(Sc),
    /// The water level's magnitude times the ratio, added every step.
    Ratio(f64),
}

/// Great deluge acceptor - accepts moves at or above a rising water level.
///
/// The water level starts at the configured level, or at the phase's
/// starting score, and rises after every step, so the search is squeezed
/// toward better scores over time.
pub struct GreatDelugeAcceptor<S: PlanningSolution> {
    initial_water_level: Option<S::Score>,
    rise: Rise<S::Score>,
    water_level: Option<S::Score>,
}

impl<S: PlanningSolution> GreatDelugeAcceptor<S> {
    /// Creates an acceptor rising by the default ratio.
    pub fn new() -> Self {
        Self {
            initial_water_level: None,
            rise: Rise::Ratio(DEFAULT_WATER_LEVEL_INCREMENT_RATIO),
            water_level: None,
        }
    }

    pub fn with_water_level(mut self, water_level: S::Score) -> Self {
        self.initial_water_level = Some(water_level);
        self
    }

    /// Rises by `increment` every step.
    pub fn with_increment_score(mut self, increment: S::Score) -> Self {
        self.rise = Rise::Score(increment);
        self
    }

    /// Rises by `|water level| * ratio` every step.
    ///
    /// On integer scores a small ratio rounds the rise down to nothing, so
    /// a positive ratio always raises the level by at least one unit of the
    /// lowest score level.
    pub fn with_increment_ratio(mut self, ratio: f64) -> Self {
        self.rise = Rise::Ratio(ratio);
        self
    }

    pub fn water_level(&self) -> Option<S::Score> {
        self.water_level
    }
}

impl<S: PlanningSolution> Default for GreatDelugeAcceptor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Clone for GreatDelugeAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            initial_water_level: self.initial_water_level,
            rise: self.rise,
            water_level: self.water_level,
        }
    }
}

impl<S: PlanningSolution> Debug for GreatDelugeAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GreatDelugeAcceptor")
            .field("water_level", &self.water_level)
            .field("rise", &self.rise)
            .finish()
    }
}

fn ratio_increment<Sc: Score>(level: Sc, ratio: f64) -> Sc {
    let magnitude = level.abs();
    let increment = magnitude.multiply(ratio);
    if ratio > 0.0 && increment == Sc::zero() && magnitude != Sc::zero() {
        let mut levels = vec![0; Sc::levels_count()];
        if let Some(lowest) = levels.last_mut() {
            *lowest = 1;
        }
        return Sc::from_level_numbers(&levels);
    }
    increment
}

impl<S, M> Acceptor<S, M> for GreatDelugeAcceptor<S>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        self.water_level = Some(self.initial_water_level.unwrap_or(phase.starting_score));
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        match self.water_level {
            Some(level) => candidate.score >= level,
            None => true,
        }
    }

    fn step_ended(&mut self, _outcome: &StepOutcome<'_, S::Score, M>) {
        if let Some(level) = self.water_level {
            let increment = match self.rise {
                Rise::Score(increment) => increment,
                Rise::Ratio(ratio) => ratio_increment(level, ratio),
            };
            self.water_level = Some(level + increment);
        }
    }

    fn phase_ended(&mut self) {
        self.water_level = None;
    }
}
