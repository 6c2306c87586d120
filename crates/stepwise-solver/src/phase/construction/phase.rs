//! Construction heuristic phase implementation.

use std::fmt::Debug;
use std::marker::PhantomData;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_scoring::ScoreDirector;
use tracing::{debug, error, info, warn};

use crate::heuristic::r#move::Move;
use crate::phase::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::{NoTermination, Termination};

use super::{ConstructionForager, EntityPlacer};

/// Construction heuristic phase that builds an initial solution.
///
/// Each step takes the next placement of the placer, lets the forager
/// pick one of its moves and commits it. Entities without a doable move
/// are left uninitialized.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `P` - The entity placer type
/// * `Fo` - The forager type
/// * `T` - The phase termination type
pub struct ConstructionHeuristicPhase<S, M, P, Fo, T = NoTermination> {
    placer: P,
    forager: Fo,
    termination: T,
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M, P, Fo> ConstructionHeuristicPhase<S, M, P, Fo, NoTermination> {
    pub fn new(placer: P, forager: Fo) -> Self {
        Self {
            placer,
            forager,
            termination: NoTermination,
            _phantom: PhantomData,
        }
    }
}

impl<S, M, P, Fo, T> ConstructionHeuristicPhase<S, M, P, Fo, T> {
    /// Ends the phase early when `termination` is met.
    pub fn with_termination<T2>(self, termination: T2) -> ConstructionHeuristicPhase<S, M, P, Fo, T2> {
        ConstructionHeuristicPhase {
            placer: self.placer,
            forager: self.forager,
            termination,
            _phantom: PhantomData,
        }
    }
}

impl<S, M, P: Debug, Fo: Debug, T: Debug> Debug for ConstructionHeuristicPhase<S, M, P, Fo, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionHeuristicPhase")
            .field("placer", &self.placer)
            .field("forager", &self.forager)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S, M, P, Fo, T> ConstructionHeuristicPhase<S, M, P, Fo, T>
where
    S: PlanningSolution,
    M: Move<S>,
    P: EntityPlacer<S, M>,
    Fo: ConstructionForager<S, M>,
{
    fn run_steps<D>(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()>
    where
        D: ScoreDirector<S>,
        T: Termination<S, D>,
    {
        let environment_mode = phase_scope.solver_scope().environment_mode();
        let placements = self.placer.get_placements(phase_scope.score_director());

        for mut placement in placements {
            if phase_scope.is_terminated(&self.termination) {
                break;
            }

            let picked = self.forager.pick_move_index(
                &placement,
                phase_scope.score_director_mut(),
                environment_mode,
            )?;
            let Some(index) = picked else {
                warn!(
                    event = "no_doable_move",
                    entity = placement.entity_index(),
                    "No doable move for entity, leaving it uninitialized",
                );
                continue;
            };
            let mv = placement.take_move(index);

            let time_gradient = phase_scope.time_gradient(&self.termination);
            let mut step_scope = StepScope::new(phase_scope).with_time_gradient(time_gradient);
            let step_index = step_scope.step_index();
            step_scope
                .phase_scope()
                .solver_scope()
                .events()
                .fire_step_started(step_index);
            step_scope.record_selected_move();
            step_scope.record_accepted_move();

            let score_director = step_scope.score_director_mut();
            mv.do_move(score_director);
            score_director.trigger_variable_listeners();
            let score = score_director.calculate_score();
            if environment_mode.is_asserted() {
                let context = format!("construction step {} after {:?}", step_index, mv);
                score_director.assert_working_score_from_scratch(score, &context)?;
            }
            step_scope.set_step_score(score);

            let improved = step_scope.complete();
            debug!(
                event = "step",
                step = step_index,
                entity = placement.entity_index(),
                score = %score,
                improved = improved,
            );
            step_scope
                .phase_scope()
                .solver_scope()
                .events()
                .fire_step_ended(step_index, &score);
        }
        Ok(())
    }
}

impl<S, D, M, P, Fo, T> Phase<S, D> for ConstructionHeuristicPhase<S, M, P, Fo, T>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    P: EntityPlacer<S, M>,
    Fo: ConstructionForager<S, M>,
    T: Termination<S, D>,
{
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        let phase_index = solver_scope.next_phase_index();
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);

        info!(
            event = "phase_start",
            phase = "Construction Heuristic",
            phase_index = phase_index,
            score = %phase_scope.starting_score(),
        );
        phase_scope
            .solver_scope()
            .events()
            .fire_phase_started(phase_index, self.phase_type_name());

        let result = self.run_steps(&mut phase_scope);

        phase_scope
            .solver_scope()
            .events()
            .fire_phase_ended(phase_index, self.phase_type_name());

        let steps = phase_scope.step_count();
        match &result {
            Ok(()) => info!(
                event = "phase_end",
                phase = "Construction Heuristic",
                phase_index = phase_index,
                duration_ms = phase_scope.elapsed().as_millis() as u64,
                steps = steps,
                score = %phase_scope.last_step_score(),
            ),
            Err(e) => error!(
                event = "phase_error",
                phase = "Construction Heuristic",
                phase_index = phase_index,
                steps = steps,
                error = %e,
            ),
        }
        result
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}
