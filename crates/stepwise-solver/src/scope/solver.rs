//! Solver-level scope.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepwise_config::EnvironmentMode;
use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::SolverEventSupport;
use crate::recaller::{BestSolution, BestSolutionRecaller};
use crate::termination::Termination;

/// Top-level scope for the entire solving process.
///
/// Owns the score director, the best solution recaller and the
/// solver-level termination. Generic over `D: ScoreDirector<S>` for zero
/// type erasure on the hot path.
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    recaller: BestSolutionRecaller<S>,
    events: Arc<SolverEventSupport<S>>,
    termination: Option<Box<dyn Termination<S, D>>>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    rng: ChaCha8Rng,
    environment_mode: EnvironmentMode,
    start_time: Option<Instant>,
    starting_score: Option<S::Score>,
    total_step_count: u64,
    last_improved_step_count: u64,
    phase_count: usize,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    pub fn new(score_director: D) -> Self {
        Self {
            score_director,
            recaller: BestSolutionRecaller::new(),
            events: Arc::new(SolverEventSupport::new()),
            termination: None,
            terminate_early_flag: None,
            rng: ChaCha8Rng::seed_from_u64(0),
            environment_mode: EnvironmentMode::default(),
            start_time: None,
            starting_score: None,
            total_step_count: 0,
            last_improved_step_count: 0,
            phase_count: 0,
        }
    }

    /// Seeds the solver random generator that phases derive their seeds from.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_events(mut self, events: Arc<SolverEventSupport<S>>) -> Self {
        self.events = events;
        self
    }

    /// Sends every new best solution over `sender`.
    pub fn with_best_solution_sender(mut self, sender: UnboundedSender<BestSolution<S>>) -> Self {
        self.recaller = self.recaller.with_sender(sender);
        self
    }

    /// Sets the termination checked by every phase in addition to its own.
    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    /// Removes the solver-level termination, handing it back to the caller.
    pub fn take_termination(&mut self) -> Option<Box<dyn Termination<S, D>>> {
        self.termination.take()
    }

    /// Starts the clock and records the starting solution as the best solution.
    ///
    /// Returns the starting score.
    pub fn start_solving(&mut self) -> S::Score {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        self.last_improved_step_count = 0;
        self.phase_count = 0;
        let score = self.score_director.calculate_score();
        self.starting_score = Some(score);
        self.recaller.solving_started(score, &self.score_director);
        self.events
            .fire_solving_started(self.score_director.working_solution());
        score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Score of the solution solving started from.
    pub fn starting_score(&self) -> Option<S::Score> {
        self.starting_score
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Returns true if the early termination flag is set or the solver
    /// termination is met.
    pub fn is_solver_terminated(&self) -> bool {
        self.is_terminate_early()
            || self
                .termination
                .as_ref()
                .is_some_and(|termination| termination.is_solver_terminated(self))
    }

    /// Fraction of the solver termination used up, in `[0, 1]`.
    pub fn solver_time_gradient(&self) -> f64 {
        self.termination
            .as_ref()
            .map_or(0.0, |termination| termination.solver_time_gradient(self))
            .clamp(0.0, 1.0)
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Total step count when the best score last improved.
    pub fn last_improved_step_count(&self) -> u64 {
        self.last_improved_step_count
    }

    /// Offers the working score to the best solution recaller.
    ///
    /// Returns true and notifies listeners when it is a new best score.
    pub fn update_best_solution(&mut self, score: S::Score) -> bool {
        let improved =
            self.recaller
                .process_working_score(score, &self.score_director, self.total_step_count);
        if improved {
            self.last_improved_step_count = self.total_step_count;
            if let Some(best) = self.recaller.best_solution() {
                self.events.fire_best_solution_changed(best, &score);
            }
        }
        improved
    }

    /// Returns the index for the next phase to start.
    pub fn next_phase_index(&mut self) -> usize {
        let index = self.phase_count;
        self.phase_count += 1;
        index
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.recaller.best_solution()
    }

    pub fn best_score(&self) -> Option<S::Score> {
        self.recaller.best_score()
    }

    pub fn score_calculation_count(&self) -> u64 {
        self.score_director.calculation_count()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Draws a seed for a phase-local random generator.
    pub fn derive_seed(&mut self) -> u64 {
        self.rng.random()
    }

    pub fn events(&self) -> &SolverEventSupport<S> {
        &self.events
    }

    /// Consumes the scope, returning the best solution and its score.
    ///
    /// Falls back to the working solution if solving never started.
    pub fn take_best_or_working_solution(mut self) -> (S, S::Score) {
        match self.recaller.take_best() {
            Some(best) => (best.solution, best.score),
            None => {
                let score = self.score_director.calculate_score();
                let mut solution = self.score_director.clone_working_solution();
                solution.set_score(Some(score));
                (solution, score)
            }
        }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for SolverScope<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("best_score", &self.recaller.best_score())
            .field("total_step_count", &self.total_step_count)
            .field("environment_mode", &self.environment_mode)
            .field("termination", &self.termination)
            .finish()
    }
}
