//! Local search phase implementation.

use std::fmt::Debug;
use std::marker::PhantomData;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_scoring::ScoreDirector;
use tracing::{debug, error, info, warn};

use crate::phase::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::Termination;

use super::decider::LocalSearchDecider;

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. The decider evaluates candidate moves, filters them through its
///    acceptor and lets its forager pick one
/// 2. The picked move is committed on the working solution
/// 3. The step score is offered to the best solution recaller
///
/// The phase ends when its termination or the solver's is met, or when a
/// step finds no doable move at all.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
/// * `Dec` - The decider type
/// * `T` - The phase termination type
pub struct LocalSearchPhase<S, D, Dec, T> {
    decider: Dec,
    termination: T,
    _phantom: PhantomData<fn() -> (S, D)>,
}

impl<S, D, Dec, T> LocalSearchPhase<S, D, Dec, T> {
    pub fn new(decider: Dec, termination: T) -> Self {
        Self {
            decider,
            termination,
            _phantom: PhantomData,
        }
    }

    pub fn decider(&self) -> &Dec {
        &self.decider
    }
}

impl<S, D, Dec: Debug, T: Debug> Debug for LocalSearchPhase<S, D, Dec, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("decider", &self.decider)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, D, Dec, T> LocalSearchPhase<S, D, Dec, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    Dec: LocalSearchDecider<S, D>,
    T: Termination<S, D>,
{
    fn run_steps(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        self.decider.phase_started(phase_scope)?;

        loop {
            if phase_scope.is_terminated(&self.termination) {
                break;
            }

            let time_gradient = phase_scope.time_gradient(&self.termination);
            let mut step_scope = StepScope::new(phase_scope).with_time_gradient(time_gradient);
            let step_index = step_scope.step_index();
            step_scope
                .phase_scope()
                .solver_scope()
                .events()
                .fire_step_started(step_index);

            self.decider.step_started(&step_scope);
            self.decider
                .decide_next_step(&mut step_scope, &self.termination)?;

            if step_scope.selected_move_count() == 0 {
                if !step_scope.phase_scope().is_terminated(&self.termination) {
                    warn!(
                        event = "no_doable_move",
                        step = step_index,
                        "No doable selected move, terminating phase early",
                    );
                }
                break;
            }

            let improved = step_scope.complete();
            self.decider.step_ended(&step_scope);

            let phase_scope = step_scope.phase_scope();
            let score = phase_scope.last_step_score();
            debug!(
                event = "step",
                step = step_index,
                score = %score,
                improved = improved,
                selected = step_scope.selected_move_count(),
                accepted = step_scope.accepted_move_count(),
            );
            phase_scope
                .solver_scope()
                .events()
                .fire_step_ended(step_index, &score);
        }
        Ok(())
    }
}

impl<S, D, Dec, T> Phase<S, D> for LocalSearchPhase<S, D, Dec, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    Dec: LocalSearchDecider<S, D>,
    T: Termination<S, D>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        let phase_index = solver_scope.next_phase_index();
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);

        info!(
            event = "phase_start",
            phase = "Local Search",
            phase_index = phase_index,
            score = %phase_scope.starting_score(),
        );
        phase_scope
            .solver_scope()
            .events()
            .fire_phase_started(phase_index, self.phase_type_name());

        let result = self.run_steps(&mut phase_scope);
        self.decider.phase_ended();

        phase_scope
            .solver_scope()
            .events()
            .fire_phase_ended(phase_index, self.phase_type_name());

        let duration = phase_scope.elapsed();
        let steps = phase_scope.step_count();
        let speed = if duration.as_secs_f64() > 0.0 {
            (steps as f64 / duration.as_secs_f64()) as u64
        } else {
            0
        };
        let best_score = phase_scope
            .best_score()
            .map(|s| format!("{s}"))
            .unwrap_or_else(|| "none".to_string());

        match &result {
            Ok(()) => info!(
                event = "phase_end",
                phase = "Local Search",
                phase_index = phase_index,
                duration_ms = duration.as_millis() as u64,
                steps = steps,
                speed = speed,
                score = best_score,
            ),
            Err(e) => error!(
                event = "phase_error",
                phase = "Local Search",
                phase_index = phase_index,
                steps = steps,
                error = %e,
            ),
        }
        result
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}
