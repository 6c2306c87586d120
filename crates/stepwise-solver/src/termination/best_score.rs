//! Score-based termination conditions.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::Score;
use stepwise_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates when the best score reaches or exceeds a target.
///
/// The time gradient measures progress from the starting score towards the
/// target on the most significant level that has not reached it yet.
///
/// # Example
///
/// ```
/// use stepwise_solver::termination::BestScoreTermination;
/// use stepwise_core::score::SimpleScore;
///
/// let term: BestScoreTermination<SimpleScore> = BestScoreTermination::new(SimpleScore::of(0));
/// assert_eq!(term.target_score(), SimpleScore::of(0));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    target_score: Sc,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(target_score: Sc) -> Self {
        Self { target_score }
    }

    pub fn target_score(&self) -> Sc {
        self.target_score
    }

    fn is_reached(&self, best_score: Option<Sc>) -> bool {
        best_score.is_some_and(|score| score >= self.target_score)
    }

    fn gradient(&self, starting_score: Option<Sc>, best_score: Option<Sc>) -> f64 {
        let (Some(start), Some(best)) = (starting_score, best_score) else {
            return 0.0;
        };
        if best >= self.target_score {
            return 1.0;
        }
        if best.init_score() < 0 {
            return 0.0;
        }
        let start = start.to_level_doubles();
        let best = best.to_level_doubles();
        let target = self.target_score.to_level_doubles();
        for level in 0..target.len() {
            if best[level] >= target[level] {
                continue;
            }
            let span = target[level] - start[level];
            if span <= 0.0 {
                return 0.0;
            }
            return ((best[level] - start[level]) / span).clamp(0.0, 1.0);
        }
        1.0
    }
}

impl<S, Sc, D> Termination<S, D> for BestScoreTermination<Sc>
where
    S: PlanningSolution<Score = Sc>,
    Sc: Score,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.is_reached(solver_scope.best_score())
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.is_reached(phase_scope.best_score())
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.gradient(solver_scope.starting_score(), solver_scope.best_score())
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.gradient(Some(phase_scope.starting_score()), phase_scope.best_score())
    }
}

/// Terminates when the best score becomes feasible.
///
/// An uninitialized solution is never feasible, so a construction phase
/// under this termination still assigns every variable first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScoreFeasibleTermination;

impl BestScoreFeasibleTermination {
    pub fn new() -> Self {
        Self
    }

    fn is_feasible<Sc: Score>(best_score: Option<Sc>) -> bool {
        best_score.is_some_and(|score| score.init_score() >= 0 && score.is_feasible())
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for BestScoreFeasibleTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        Self::is_feasible(solver_scope.best_score())
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        Self::is_feasible(phase_scope.best_score())
    }

    fn solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if Self::is_feasible(solver_scope.best_score()) {
            1.0
        } else {
            0.0
        }
    }

    fn phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        if Self::is_feasible(phase_scope.best_score()) {
            1.0
        } else {
            0.0
        }
    }
}
