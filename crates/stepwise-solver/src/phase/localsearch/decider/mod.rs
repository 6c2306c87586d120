//! Deciders pick the move of each local search step.
//!
//! A decider owns the move selector, the acceptor and the forager. Per
//! step it evaluates candidate moves, lets the acceptor filter them and
//! the forager collect them, then commits the forager's pick on the
//! working solution.
//!
//! [`SingleThreadedDecider`] evaluates every move on the solver's own
//! score director. [`MultiThreadedDecider`] fans evaluation out to worker
//! threads but forages results in selection order, so both deciders take
//! the same steps for the same seed.

mod multi_threaded;

use std::fmt::Debug;
use std::marker::PhantomData;

use stepwise_config::EnvironmentMode;
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_core::StepwiseError;
use stepwise_scoring::ScoreDirector;
use tracing::debug;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::scope::{PhaseScope, StepScope};
use crate::termination::Termination;

use super::acceptor::{Acceptor, MoveCandidate, PhaseContext, StepContext, StepOutcome};
use super::forager::LocalSearchForager;

pub use multi_threaded::MultiThreadedDecider;

/// Decides the move of each local search step.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait LocalSearchDecider<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Called when the phase starts, before the first step.
    fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()>;

    /// Called when a step starts.
    fn step_started(&mut self, step_scope: &StepScope<'_, '_, S, D>);

    /// Evaluates candidate moves and commits the picked one, if any.
    ///
    /// Records the selected and accepted move counts and the step score on
    /// the step scope. Stops early when `termination` is met mid-step.
    fn decide_next_step<T: Termination<S, D> + ?Sized>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        termination: &T,
    ) -> Result<()>;

    /// Called after the step has been completed on its scope.
    fn step_ended(&mut self, step_scope: &StepScope<'_, '_, S, D>);

    /// Called when the phase ends, also after a failed step.
    fn phase_ended(&mut self);
}

/// Scores a doable move and undoes it, leaving the working solution as it was.
///
/// In asserted environment modes the score after the undo must equal
/// `before_score`; in fully asserted mode the move's score is also
/// recalculated from scratch.
pub fn evaluate_move<S, D, M>(
    score_director: &mut D,
    mv: &M,
    environment_mode: EnvironmentMode,
    before_score: S::Score,
) -> Result<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    let undo = mv.create_undo_move(score_director);
    mv.do_move(score_director);
    score_director.trigger_variable_listeners();
    let score = score_director.calculate_score();
    if environment_mode.is_fully_asserted() {
        score_director
            .assert_working_score_from_scratch(score, &format!("after evaluating {:?}", mv))?;
    }

    undo.do_move(score_director);
    score_director.trigger_variable_listeners();
    if environment_mode.is_asserted() {
        let after_undo = score_director.calculate_score();
        if after_undo != before_score {
            return Err(StepwiseError::UndoMismatch {
                move_description: format!("{:?}", mv),
                before: before_score.to_string(),
                after_undo: after_undo.to_string(),
            });
        }
    }
    Ok(score)
}

/// Draws per distinct move a never-ending selector gets to come up with a
/// doable move before the step gives up.
const NOT_DOABLE_DRAWS_PER_MOVE: usize = 10;

/// Counts consecutive moves that were not doable.
///
/// Finite selectors run dry on their own. For never-ending selectors the
/// streak is capped at [`NOT_DOABLE_DRAWS_PER_MOVE`] times the selector
/// size, after which the step stops selecting. A step that selected
/// nothing then ends the phase.
#[derive(Debug)]
pub(crate) struct NotDoableStreak {
    limit: Option<usize>,
    count: usize,
}

impl NotDoableStreak {
    pub(crate) fn new<S, D, M, MS>(move_selector: &MS, score_director: &D) -> Self
    where
        S: PlanningSolution,
        D: ScoreDirector<S>,
        M: Move<S>,
        MS: MoveSelector<S, M>,
    {
        let limit = if move_selector.is_never_ending() {
            Some(
                move_selector
                    .size(score_director)
                    .max(1)
                    .saturating_mul(NOT_DOABLE_DRAWS_PER_MOVE),
            )
        } else {
            None
        };
        Self { limit, count: 0 }
    }

    /// Records a move that is not doable. Returns true once the cap is hit.
    pub(crate) fn skip(&mut self, step_index: u64) -> bool {
        self.count += 1;
        match self.limit {
            Some(limit) if self.count >= limit => {
                debug!(
                    event = "not_doable_streak",
                    step = step_index,
                    draws = self.count,
                );
                true
            }
            _ => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }
}

/// Applies the picked move for real and returns its undo move.
///
/// In asserted environment modes the committed score must match the score
/// the move was picked with, and must survive a from-scratch recalculation.
pub(crate) fn commit_move<S, D, M>(
    step_scope: &mut StepScope<'_, '_, S, D>,
    mv: &M,
    evaluated_score: S::Score,
) -> Result<M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    let environment_mode = step_scope.phase_scope().solver_scope().environment_mode();
    let step_index = step_scope.step_index();
    let score_director = step_scope.score_director_mut();

    let undo = mv.create_undo_move(score_director);
    mv.do_move(score_director);
    score_director.trigger_variable_listeners();
    let score = score_director.calculate_score();

    if environment_mode.is_asserted() {
        let context = format!("step {} after {:?}", step_index, mv);
        if score != evaluated_score {
            return Err(StepwiseError::ScoreCorruption {
                context,
                working: evaluated_score.to_string(),
                expected: score.to_string(),
                analysis: " The move scored differently when evaluated than when committed."
                    .to_string(),
            });
        }
        score_director.assert_working_score_from_scratch(score, &context)?;
    }

    step_scope.set_step_score(score);
    step_scope.set_undo_move(undo.clone());
    Ok(undo)
}

/// Starts acceptor, forager and selector on the step.
fn start_step<S, D, M, MS, A, F>(
    step_scope: &StepScope<'_, '_, S, D>,
    move_selector: &mut MS,
    acceptor: &mut A,
    forager: &mut F,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    F: LocalSearchForager<S, M>,
{
    let phase_scope = step_scope.phase_scope();
    let last_step_score = phase_scope.last_step_score();
    let best_score = phase_scope.best_score().unwrap_or(last_step_score);
    move_selector.step_started();
    acceptor.step_started(&StepContext {
        step_index: step_scope.step_index(),
        last_step_score,
        best_score,
        time_gradient: step_scope.time_gradient(),
    });
    forager.step_started(best_score, last_step_score);
}

/// Reports the completed step to acceptor and selector.
fn end_step<S, D, M, MS, A>(
    step_scope: &StepScope<'_, '_, S, D>,
    last_step: Option<&(M, M)>,
    move_selector: &mut MS,
    acceptor: &mut A,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
{
    let phase_scope = step_scope.phase_scope();
    let step_score = phase_scope.last_step_score();
    acceptor.step_ended(&StepOutcome {
        step_index: step_scope.step_index(),
        step_score,
        best_score: phase_scope.best_score().unwrap_or(step_score),
        step_move: last_step.map(|(mv, _)| mv),
        undo_move: last_step.map(|(_, undo)| undo),
    });
    move_selector.step_ended();
}

/// Phase-local seed handed to the selector, acceptor and forager.
fn start_phase<S, D, M, MS, A, F>(
    phase_scope: &mut PhaseScope<'_, S, D>,
    move_selector: &mut MS,
    acceptor: &mut A,
    forager: &mut F,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    F: LocalSearchForager<S, M>,
{
    let seed = phase_scope.solver_scope_mut().derive_seed();
    move_selector.phase_started(seed);
    acceptor.phase_started(&PhaseContext {
        phase_index: phase_scope.phase_index(),
        starting_score: phase_scope.starting_score(),
        seed: seed.wrapping_add(1),
    });
    forager.phase_started(seed.wrapping_add(2));
}

/// Evaluates every move on the solver's own score director.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `A` - The acceptor type
/// * `F` - The forager type
pub struct SingleThreadedDecider<S, M, MS, A, F> {
    move_selector: MS,
    acceptor: A,
    forager: F,
    /// The committed move of the current step and its undo.
    last_step: Option<(M, M)>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M, MS, A, F> SingleThreadedDecider<S, M, MS, A, F> {
    pub fn new(move_selector: MS, acceptor: A, forager: F) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            last_step: None,
            _phantom: PhantomData,
        }
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    pub fn forager(&self) -> &F {
        &self.forager
    }
}

impl<S, M: Debug, MS: Debug, A: Debug, F: Debug> Debug for SingleThreadedDecider<S, M, MS, A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleThreadedDecider")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .finish()
    }
}

impl<S, D, M, MS, A, F> LocalSearchDecider<S, D> for SingleThreadedDecider<S, M, MS, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, M>,
    A: Acceptor<S, M>,
    F: LocalSearchForager<S, M>,
{
    fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        start_phase::<S, D, M, _, _, _>(
            phase_scope,
            &mut self.move_selector,
            &mut self.acceptor,
            &mut self.forager,
        );
        Ok(())
    }

    fn step_started(&mut self, step_scope: &StepScope<'_, '_, S, D>) {
        self.last_step = None;
        start_step::<S, D, M, _, _, _>(
            step_scope,
            &mut self.move_selector,
            &mut self.acceptor,
            &mut self.forager,
        );
    }

    fn decide_next_step<T: Termination<S, D> + ?Sized>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        termination: &T,
    ) -> Result<()> {
        let step_index = step_scope.step_index();
        let environment_mode = step_scope.phase_scope().solver_scope().environment_mode();
        let before_score = step_scope.phase_scope().last_step_score();

        let mut not_doable = NotDoableStreak::new::<S, D, M, _>(
            &self.move_selector,
            step_scope.score_director(),
        );
        let mut move_index = 0u64;
        for mv in self.move_selector.iter_moves(step_scope.score_director()) {
            if step_scope.phase_scope().is_terminated(termination) {
                break;
            }
            if !mv.is_doable(step_scope.score_director()) {
                if not_doable.skip(step_index) {
                    break;
                }
                continue;
            }
            not_doable.reset();
            let score = evaluate_move::<S, D, M>(
                step_scope.score_director_mut(),
                &mv,
                environment_mode,
                before_score,
            )?;
            step_scope.record_selected_move();

            let candidate = MoveCandidate {
                step_index,
                move_index,
                score,
                mv: &mv,
            };
            move_index += 1;
            if self.acceptor.is_accepted(&candidate) {
                step_scope.record_accepted_move();
                self.forager.add_move(mv, score);
                if self.forager.is_quit_early() {
                    break;
                }
            }
        }

        if let Some((mv, score)) = self.forager.pick_move() {
            let undo = commit_move(step_scope, &mv, score)?;
            self.last_step = Some((mv, undo));
        }
        Ok(())
    }

    fn step_ended(&mut self, step_scope: &StepScope<'_, '_, S, D>) {
        end_step::<S, D, M, _, _>(
            step_scope,
            self.last_step.as_ref(),
            &mut self.move_selector,
            &mut self.acceptor,
        );
    }

    fn phase_ended(&mut self) {
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
        self.forager.phase_ended();
        self.last_step = None;
    }
}
