//! Event system for solver monitoring and extensibility.
//!
//! Event listeners receive notifications about the solver lifecycle:
//!
//! - **Solver Events**: best solution changed, solving started, ended or failed
//! - **Phase Events**: phase started, phase ended
//! - **Step Events**: step started, step ended
//!
//! Listeners are called synchronously on the solving thread, in
//! registration order.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use stepwise_core::score::SimpleScore;
//! use stepwise_solver::event::{SolverEventListener, SolverEventSupport};
//! use stepwise_test::nqueens::NQueensSolution;
//!
//! #[derive(Debug)]
//! struct PrintBest;
//!
//! impl SolverEventListener<NQueensSolution> for PrintBest {
//!     fn on_best_solution_changed(&self, _solution: &NQueensSolution, score: &SimpleScore) {
//!         println!("New best: {}", score);
//!     }
//! }
//!
//! let mut support = SolverEventSupport::<NQueensSolution>::new();
//! support.add_solver_listener(Arc::new(PrintBest));
//! assert!(support.has_listeners());
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::StepwiseError;

/// Listener for solver-level events.
pub trait SolverEventListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a new best solution is found.
    ///
    /// # Arguments
    ///
    /// * `solution` - The new best solution
    /// * `score` - The score of the new best solution
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score);

    /// Called when solving starts.
    fn on_solving_started(&self, _solution: &S) {}

    /// Called when solving ends, with the best solution.
    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {}

    /// Called when a phase fails and solving stops.
    fn on_solving_error(&self, _error: &StepwiseError) {}
}

/// Listener for phase lifecycle events.
pub trait PhaseLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase_index` - The index of the phase (0-based)
    /// * `phase_type` - The type name of the phase
    fn on_phase_started(&self, phase_index: usize, phase_type: &str);

    /// Called when a phase ends.
    fn on_phase_ended(&self, phase_index: usize, phase_type: &str);
}

/// Listener for step-level events within a phase.
pub trait StepLifecycleListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a step starts, with its index within the phase.
    fn on_step_started(&self, step_index: u64);

    /// Called when a step ends, with the score after the step.
    fn on_step_ended(&self, step_index: u64, score: &S::Score);
}

/// Central event broadcaster for solver events.
///
/// Manages listener registration and event distribution.
pub struct SolverEventSupport<S: PlanningSolution> {
    solver_listeners: Vec<Arc<dyn SolverEventListener<S>>>,
    phase_listeners: Vec<Arc<dyn PhaseLifecycleListener<S>>>,
    step_listeners: Vec<Arc<dyn StepLifecycleListener<S>>>,
}

impl<S: PlanningSolution> SolverEventSupport<S> {
    pub fn new() -> Self {
        Self {
            solver_listeners: Vec::new(),
            phase_listeners: Vec::new(),
            step_listeners: Vec::new(),
        }
    }

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.solver_listeners.push(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener<S>>) {
        self.phase_listeners.push(listener);
    }

    pub fn add_step_listener(&mut self, listener: Arc<dyn StepLifecycleListener<S>>) {
        self.step_listeners.push(listener);
    }

    /// Removes all listeners.
    pub fn clear_listeners(&mut self) {
        self.solver_listeners.clear();
        self.phase_listeners.clear();
        self.step_listeners.clear();
    }

    // === Event Firing ===

    pub fn fire_best_solution_changed(&self, solution: &S, score: &S::Score) {
        for listener in &self.solver_listeners {
            listener.on_best_solution_changed(solution, score);
        }
    }

    pub fn fire_solving_started(&self, solution: &S) {
        for listener in &self.solver_listeners {
            listener.on_solving_started(solution);
        }
    }

    pub fn fire_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        for listener in &self.solver_listeners {
            listener.on_solving_ended(solution, is_terminated_early);
        }
    }

    pub fn fire_solving_error(&self, error: &StepwiseError) {
        for listener in &self.solver_listeners {
            listener.on_solving_error(error);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_started(phase_index, phase_type);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_ended(phase_index, phase_type);
        }
    }

    pub fn fire_step_started(&self, step_index: u64) {
        for listener in &self.step_listeners {
            listener.on_step_started(step_index);
        }
    }

    pub fn fire_step_ended(&self, step_index: u64, score: &S::Score) {
        for listener in &self.step_listeners {
            listener.on_step_ended(step_index, score);
        }
    }

    // === Query Methods ===

    pub fn solver_listener_count(&self) -> usize {
        self.solver_listeners.len()
    }

    pub fn phase_listener_count(&self) -> usize {
        self.phase_listeners.len()
    }

    pub fn step_listener_count(&self) -> usize {
        self.step_listeners.len()
    }

    /// Returns true if there are any listeners registered.
    pub fn has_listeners(&self) -> bool {
        !self.solver_listeners.is_empty()
            || !self.phase_listeners.is_empty()
            || !self.step_listeners.is_empty()
    }
}

impl<S: PlanningSolution> Default for SolverEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Clone for SolverEventSupport<S> {
    fn clone(&self) -> Self {
        Self {
            solver_listeners: self.solver_listeners.clone(),
            phase_listeners: self.phase_listeners.clone(),
            step_listeners: self.step_listeners.clone(),
        }
    }
}

impl<S: PlanningSolution> Debug for SolverEventSupport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("solver_listeners", &self.solver_listeners.len())
            .field("phase_listeners", &self.phase_listeners.len())
            .field("step_listeners", &self.step_listeners.len())
            .finish()
    }
}

/// A counting listener that tracks event occurrences.
///
/// Counts every event it receives.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    best_solution_count: AtomicUsize,
    solving_started_count: AtomicUsize,
    solving_ended_count: AtomicUsize,
    solving_error_count: AtomicUsize,
    phase_started_count: AtomicUsize,
    phase_ended_count: AtomicUsize,
    step_started_count: AtomicUsize,
    step_ended_count: AtomicUsize,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_solution_count(&self) -> usize {
        self.best_solution_count.load(Ordering::SeqCst)
    }

    pub fn solving_started_count(&self) -> usize {
        self.solving_started_count.load(Ordering::SeqCst)
    }

    pub fn solving_ended_count(&self) -> usize {
        self.solving_ended_count.load(Ordering::SeqCst)
    }

    pub fn solving_error_count(&self) -> usize {
        self.solving_error_count.load(Ordering::SeqCst)
    }

    pub fn phase_started_count(&self) -> usize {
        self.phase_started_count.load(Ordering::SeqCst)
    }

    pub fn phase_ended_count(&self) -> usize {
        self.phase_ended_count.load(Ordering::SeqCst)
    }

    pub fn step_started_count(&self) -> usize {
        self.step_started_count.load(Ordering::SeqCst)
    }

    pub fn step_ended_count(&self) -> usize {
        self.step_ended_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.best_solution_count,
            &self.solving_started_count,
            &self.solving_ended_count,
            &self.solving_error_count,
            &self.phase_started_count,
            &self.phase_ended_count,
            &self.step_started_count,
            &self.step_ended_count,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl<S: PlanningSolution> SolverEventListener<S> for CountingEventListener {
    fn on_best_solution_changed(&self, _solution: &S, _score: &S::Score) {
        self.best_solution_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_started(&self, _solution: &S) {
        self.solving_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {
        self.solving_ended_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_error(&self, _error: &StepwiseError) {
        self.solving_error_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> PhaseLifecycleListener<S> for CountingEventListener {
    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: PlanningSolution> StepLifecycleListener<S> for CountingEventListener {
    fn on_step_started(&self, _step_index: u64) {
        self.step_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_step_ended(&self, _step_index: u64, _score: &S::Score) {
        self.step_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
