//! Simulated annealing acceptor.

use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::Score;

use crate::heuristic::r#move::Move;

use super::{Acceptor, MoveCandidate, PhaseContext, StepContext, StepOutcome};

/// Simulated annealing acceptor - accepts worse moves with a probability
/// that shrinks as the phase runs out of time.
///
/// The starting temperature is a score, one temperature per score level.
/// Each step the temperature of level `i` is
/// `starting_temperature[i] * (1 - time_gradient)`. A move at least as good
/// as the last step is always accepted; otherwise it is accepted with
/// chance
///
/// ```text
/// product over levels with delta[i] < 0 of exp(delta[i] / temperature[i])
/// ```
///
/// where `delta` is the move score minus the last step score. A level that
/// has cooled down to zero rejects every loss on that level. The random
/// draws come from a generator seeded at phase start, so runs with the same
/// seed and the same candidate scores make the same decisions.
pub struct SimulatedAnnealingAcceptor<S: PlanningSolution> {
    starting_temperature: S::Score,
    starting_levels: Vec<f64>,
    temperature_levels: Vec<f64>,
    last_step_score: Option<S::Score>,
    rng: ChaCha8Rng,
}

impl<S: PlanningSolution> SimulatedAnnealingAcceptor<S> {
    /// Creates an acceptor with the given starting temperature.
    ///
    /// Negative levels are treated as their absolute value.
    pub fn new(starting_temperature: S::Score) -> Self {
        let starting_levels: Vec<f64> = starting_temperature
            .to_level_doubles()
            .into_iter()
            .map(f64::abs)
            .collect();
        Self {
            starting_temperature,
            temperature_levels: starting_levels.clone(),
            starting_levels,
            last_step_score: None,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    pub fn starting_temperature(&self) -> S::Score {
        self.starting_temperature
    }

    /// Current temperature per score level.
    pub fn temperature_levels(&self) -> &[f64] {
        &self.temperature_levels
    }

    fn accept_chance(&self, last_step_score: S::Score, move_score: S::Score) -> f64 {
        let last = last_step_score.to_level_doubles();
        let candidate = move_score.to_level_doubles();
        let mut chance = 1.0;
        for (i, (move_level, last_level)) in candidate.iter().zip(&last).enumerate() {
            let delta = move_level - last_level;
            if delta >= 0.0 {
                continue;
            }
            let temperature = self.temperature_levels.get(i).copied().unwrap_or(0.0);
            if temperature <= 0.0 {
                return 0.0;
            }
            chance *= (delta / temperature).exp();
        }
        chance
    }
}

impl<S: PlanningSolution> Clone for SimulatedAnnealingAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            starting_temperature: self.starting_temperature,
            starting_levels: self.starting_levels.clone(),
            temperature_levels: self.temperature_levels.clone(),
            last_step_score: self.last_step_score,
            rng: self.rng.clone(),
        }
    }
}

impl<S: PlanningSolution> Debug for SimulatedAnnealingAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedAnnealingAcceptor")
            .field("starting_temperature", &self.starting_temperature)
            .field("temperature_levels", &self.temperature_levels)
            .finish()
    }
}

impl<S, M> Acceptor<S, M> for SimulatedAnnealingAcceptor<S>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn phase_started(&mut self, phase: &PhaseContext<S::Score>) {
        self.rng = ChaCha8Rng::seed_from_u64(phase.seed);
        self.temperature_levels = self.starting_levels.clone();
        self.last_step_score = Some(phase.starting_score);
    }

    fn step_started(&mut self, step: &StepContext<S::Score>) {
        let remaining = (1.0 - step.time_gradient).clamp(0.0, 1.0);
        self.temperature_levels = self
            .starting_levels
            .iter()
            .map(|level| level * remaining)
            .collect();
        self.last_step_score = Some(step.last_step_score);
    }

    fn is_accepted(&mut self, candidate: &MoveCandidate<'_, S::Score, M>) -> bool {
        let Some(last) = self.last_step_score else {
            return true;
        };
        if candidate.score >= last {
            return true;
        }
        if candidate.score.init_score() < last.init_score() {
            return false;
        }
        let chance = self.accept_chance(last, candidate.score);
        chance > 0.0 && self.rng.random::<f64>() < chance
    }

    fn step_ended(&mut self, outcome: &StepOutcome<'_, S::Score, M>) {
        self.last_step_score = Some(outcome.step_score);
    }

    fn phase_ended(&mut self) {
        self.last_step_score = None;
    }
}
