//! Solver implementation.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stepwise_config::{EnvironmentMode, SolverConfig};
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_core::score::ParseableScore;
use stepwise_core::StepwiseError;
use stepwise_scoring::ScoreDirector;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::builder::TerminationBuilder;
use crate::event::{
    PhaseLifecycleListener, SolverEventListener, SolverEventSupport, StepLifecycleListener,
};
use crate::phase::Phase;
use crate::recaller::BestSolution;
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Phases run one after another by the solver.
///
/// Implemented for tuples of up to eight phases, keeping every phase's
/// concrete type, and for a `Vec` of boxed phases built from configuration.
pub trait PhaseSequence<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Runs the phases in order until one fails or the solver terminates.
    fn run(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()>;

    fn phase_count(&self) -> usize;
}

macro_rules! impl_phase_sequence {
    ($count:expr; $($idx:tt: $P:ident),+) => {
        impl<S, D, $($P),+> PhaseSequence<S, D> for ($($P,)+)
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($P: Phase<S, D>,)+
        {
            fn run(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
                $(
                    if solver_scope.is_solver_terminated() {
                        return Ok(());
                    }
                    self.$idx.solve(solver_scope)?;
                )+
                Ok(())
            }

            fn phase_count(&self) -> usize {
                $count
            }
        }
    };
}

impl_phase_sequence!(1; 0: P0);
impl_phase_sequence!(2; 0: P0, 1: P1);
impl_phase_sequence!(3; 0: P0, 1: P1, 2: P2);
impl_phase_sequence!(4; 0: P0, 1: P1, 2: P2, 3: P3);
impl_phase_sequence!(5; 0: P0, 1: P1, 2: P2, 3: P3, 4: P4);
impl_phase_sequence!(6; 0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5);
impl_phase_sequence!(7; 0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6);
impl_phase_sequence!(8; 0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7);

impl<S, D> PhaseSequence<S, D> for Vec<Box<dyn Phase<S, D>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn run(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        for phase in self.iter_mut() {
            if solver_scope.is_solver_terminated() {
                break;
            }
            phase.solve(solver_scope)?;
        }
        Ok(())
    }

    fn phase_count(&self) -> usize {
        self.len()
    }
}

/// Outcome of a solving run.
#[derive(Debug)]
pub struct SolveResult<S: PlanningSolution> {
    /// The best solution found, or the working solution if none was recorded.
    pub solution: S,
    pub score: S::Score,
    /// Steps committed over all phases.
    pub step_count: u64,
    /// True if solving was stopped through [`SolverHandle::terminate_early`].
    pub terminated_early: bool,
    /// The error that ended solving after at least one step was committed.
    pub error: Option<StepwiseError>,
}

impl<S: PlanningSolution> SolveResult<S> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Thread-safe handle to stop a running solver.
#[derive(Debug, Clone)]
pub struct SolverHandle {
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl SolverHandle {
    /// Asks the solver to stop after its current move.
    ///
    /// Returns false if the solver isn't solving.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }
}

/// The main solver that optimizes planning solutions.
///
/// Runs its phases in order on one score director. The solver termination
/// is checked between phases and by every phase next to its own.
///
/// # Type Parameters
/// * `P` - The phases, a tuple or a `Vec<Box<dyn Phase>>`
/// * `S` - The planning solution type
/// * `D` - The score director type
///
/// # Example
///
/// ```
/// use stepwise_solver::heuristic::r#move::ChangeMove;
/// use stepwise_solver::phase::construction::{
///     ConstructionHeuristicPhase, FirstFitForager, QueuedEntityPlacer,
/// };
/// use stepwise_solver::solver::Solver;
/// use stepwise_test::nqueens::{
///     get_queen_row, queen_count, row_values, set_queen_row, calculate_conflicts, ConflictFn,
///     NQueensSolution,
/// };
/// use stepwise_scoring::SimpleScoreDirector;
///
/// let placer = QueuedEntityPlacer::new(
///     get_queen_row, set_queen_row, queen_count, row_values, "row", 0,
/// );
/// let construction = ConstructionHeuristicPhase::new(
///     placer,
///     FirstFitForager::<NQueensSolution, ChangeMove<NQueensSolution, i64>>::new(),
/// );
/// let mut solver = Solver::new((construction,));
///
/// let director = SimpleScoreDirector::new(
///     NQueensSolution::uninitialized(4),
///     calculate_conflicts as ConflictFn,
/// );
/// let result = solver.solve(director).unwrap();
/// assert!(result.solution.queens.iter().all(|q| q.row.is_some()));
/// ```
pub struct Solver<P, S: PlanningSolution, D: ScoreDirector<S>> {
    phases: P,
    termination: Option<Box<dyn Termination<S, D>>>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    events: Arc<SolverEventSupport<S>>,
    best_solution_sender: Option<UnboundedSender<BestSolution<S>>>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl<P: Debug, S: PlanningSolution, D: ScoreDirector<S>> Debug for Solver<P, S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .field("events", &self.events)
            .finish()
    }
}

impl<P, S, D> Solver<P, S, D>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    P: PhaseSequence<S, D>,
{
    /// Creates a solver that runs `phases` with no solver termination.
    pub fn new(phases: P) -> Self {
        Self {
            phases,
            termination: None,
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            events: Arc::new(SolverEventSupport::new()),
            best_solution_sender: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets the termination checked throughout solving.
    pub fn with_termination<T>(mut self, termination: T) -> Self
    where
        T: Termination<S, D> + 'static,
    {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Applies the environment mode, seed and termination of `config`.
    ///
    /// Phases are not built here: they need domain-specific placers and
    /// move selectors, see [`PhaseBuilder`](crate::builder::PhaseBuilder).
    pub fn with_config(mut self, config: &SolverConfig) -> Result<Self>
    where
        S::Score: ParseableScore,
        D: 'static,
    {
        config.validate()?;
        self.environment_mode = config.environment_mode;
        self.random_seed = config.random_seed;
        if let Some(termination) = &config.termination {
            self.termination = TerminationBuilder::build(termination)?;
        }
        Ok(self)
    }

    pub fn with_solver_listener(mut self, listener: Arc<dyn SolverEventListener<S>>) -> Self {
        Arc::make_mut(&mut self.events).add_solver_listener(listener);
        self
    }

    pub fn with_phase_listener(mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) -> Self {
        Arc::make_mut(&mut self.events).add_phase_listener(listener);
        self
    }

    pub fn with_step_listener(mut self, listener: Arc<dyn StepLifecycleListener<S>>) -> Self {
        Arc::make_mut(&mut self.events).add_step_listener(listener);
        self
    }

    /// Sends every new best solution over `sender`.
    pub fn with_best_solution_sender(mut self, sender: UnboundedSender<BestSolution<S>>) -> Self {
        self.best_solution_sender = Some(sender);
        self
    }

    /// Returns a handle that can stop solving from another thread.
    pub fn handle(&self) -> SolverHandle {
        SolverHandle {
            terminate_early_flag: Arc::clone(&self.terminate_early_flag),
            solving: Arc::clone(&self.solving),
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    fn seed(&self) -> u64 {
        match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => seed,
            (None, EnvironmentMode::NonReproducible) => rand::random(),
            (None, _) => 0,
        }
    }

    /// Solves the working solution of `score_director`.
    ///
    /// Returns the best solution found. An error raised after at least one
    /// step was committed is reported in [`SolveResult::error`] next to the
    /// best solution so far; an error before that is returned as `Err`.
    /// Solving that is stopped early before committing any step returns
    /// [`StepwiseError::Cancelled`].
    pub fn solve(&mut self, score_director: D) -> Result<SolveResult<S>> {
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        self.solving.store(true, Ordering::SeqCst);

        let seed = self.seed();
        let mut solver_scope = SolverScope::new(score_director)
            .with_seed(seed)
            .with_environment_mode(self.environment_mode)
            .with_events(Arc::clone(&self.events))
            .with_terminate_early_flag(Arc::clone(&self.terminate_early_flag));
        if let Some(sender) = &self.best_solution_sender {
            solver_scope = solver_scope.with_best_solution_sender(sender.clone());
        }
        if let Some(termination) = self.termination.take() {
            solver_scope = solver_scope.with_termination(termination);
        }

        let starting_score = solver_scope.start_solving();
        info!(
            event = "solve_start",
            phases = self.phases.phase_count(),
            environment_mode = ?self.environment_mode,
            seed = seed,
            score = %starting_score,
        );

        let outcome = self.phases.run(&mut solver_scope);

        self.termination = solver_scope.take_termination();
        self.solving.store(false, Ordering::SeqCst);
        let terminated_early = solver_scope.is_terminate_early();
        let step_count = solver_scope.total_step_count();
        let elapsed = solver_scope.elapsed();
        let calculation_count = solver_scope.score_calculation_count();

        if let Err(e) = &outcome {
            error!(event = "solve_error", steps = step_count, error = %e);
            self.events.fire_solving_error(e);
        }

        let (solution, score) = solver_scope.take_best_or_working_solution();
        self.events.fire_solving_ended(&solution, terminated_early);

        info!(
            event = "solve_end",
            duration_ms = elapsed.as_millis() as u64,
            steps = step_count,
            score_calculations = calculation_count,
            terminated_early = terminated_early,
            score = %score,
        );

        let error = match outcome {
            Ok(()) if terminated_early && step_count == 0 => return Err(StepwiseError::Cancelled),
            Ok(()) => None,
            Err(e) if step_count == 0 => return Err(e),
            Err(e) => Some(e),
        };
        Ok(SolveResult {
            solution,
            score,
            step_count,
            terminated_early,
            error,
        })
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
