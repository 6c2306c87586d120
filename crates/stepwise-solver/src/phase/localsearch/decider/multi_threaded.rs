//! Move evaluation on worker threads.
//!
//! ```text
//!              operations (unbounded, FIFO)
//! main ---------------------------------------> worker 0..n
//!   ^   step updates (one channel per worker)       |
//!   |                                               |
//!   +---------- evaluations (bounded) --------------+
//! ```
//!
//! Each worker owns a deep copy of the working solution behind its own
//! score director, so no solution state is shared between threads. After
//! a step commits, every worker replays the step move before evaluating
//! operations of the next step. The main thread forages evaluations in
//! move index order, which keeps acceptor and forager decisions identical
//! to the single-threaded decider.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use stepwise_config::EnvironmentMode;
use stepwise_core::domain::PlanningSolution;
use stepwise_core::error::Result;
use stepwise_core::StepwiseError;
use stepwise_scoring::ScoreDirector;
use tracing::{debug, warn};

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::scope::{PhaseScope, StepScope};
use crate::termination::Termination;

use super::super::acceptor::{Acceptor, MoveCandidate};
use super::super::forager::LocalSearchForager;
use super::{
    commit_move, end_step, evaluate_move, start_phase, start_step, LocalSearchDecider,
    NotDoableStreak,
};

/// Default number of evaluations each worker may have queued.
pub const DEFAULT_MOVE_THREAD_BUFFER_SIZE: usize = 10;

/// How long the main thread waits for an evaluation before checking
/// that the workers are still alive.
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A move to evaluate against the solution after `step_index` steps.
struct Operation<M> {
    step_index: u64,
    move_index: u64,
    mv: M,
}

/// The move a step committed, replayed by every worker.
struct StepUpdate<M> {
    step_index: u64,
    step_move: Option<M>,
}

struct Evaluation<Sc, M> {
    step_index: u64,
    move_index: u64,
    mv: M,
    score: Result<Sc>,
}

/// Worker threads and the channels connecting them.
struct WorkerPool<S: PlanningSolution, M> {
    operations: Option<Sender<Operation<M>>>,
    updates: Vec<Sender<StepUpdate<M>>>,
    evaluations: Option<Receiver<Evaluation<S::Score, M>>>,
    current_step: Arc<AtomicU64>,
    handles: Vec<JoinHandle<()>>,
}

impl<S: PlanningSolution, M: Move<S>> WorkerPool<S, M> {
    fn spawn<D>(
        score_director: &D,
        thread_count: usize,
        buffer_size: usize,
        environment_mode: EnvironmentMode,
    ) -> Result<Self>
    where
        D: ScoreDirector<S> + 'static,
    {
        let (operation_sender, operation_receiver) = channel::unbounded();
        let (evaluation_sender, evaluation_receiver) =
            channel::bounded(thread_count * buffer_size);
        let current_step = Arc::new(AtomicU64::new(0));

        let mut updates = Vec::with_capacity(thread_count);
        let mut handles = Vec::with_capacity(thread_count);
        for index in 0..thread_count {
            let (update_sender, update_receiver) = channel::unbounded();
            let worker = Worker {
                score_director: score_director.clone_for_worker(),
                environment_mode,
                operations: operation_receiver.clone(),
                updates: update_receiver,
                evaluations: evaluation_sender.clone(),
                current_step: Arc::clone(&current_step),
                _phantom: PhantomData,
            };
            let handle = thread::Builder::new()
                .name(format!("stepwise-move-thread-{}", index))
                .spawn(move || worker.run())
                .map_err(|e| StepwiseError::Internal(format!("cannot spawn move thread: {}", e)))?;
            updates.push(update_sender);
            handles.push(handle);
        }

        Ok(Self {
            operations: Some(operation_sender),
            updates,
            evaluations: Some(evaluation_receiver),
            current_step,
            handles,
        })
    }

    fn send(&self, operation: Operation<M>) -> Result<()> {
        self.operations
            .as_ref()
            .and_then(|sender| sender.send(operation).ok())
            .ok_or_else(|| StepwiseError::Internal("move threads have stopped".to_string()))
    }

    /// Waits for the next evaluation, failing if a worker has died.
    fn receive(&self) -> Result<Evaluation<S::Score, M>> {
        let evaluations = self
            .evaluations
            .as_ref()
            .ok_or_else(|| StepwiseError::Internal("move threads have stopped".to_string()))?;
        loop {
            match evaluations.recv_timeout(WORKER_POLL_INTERVAL) {
                Ok(evaluation) => return Ok(evaluation),
                Err(RecvTimeoutError::Timeout) => {
                    if self.handles.iter().any(|handle| handle.is_finished()) {
                        return Err(StepwiseError::Internal(
                            "a move thread stopped unexpectedly".to_string(),
                        ));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(StepwiseError::Internal(
                        "a move thread stopped unexpectedly".to_string(),
                    ));
                }
            }
        }
    }

    /// Marks operations of older steps stale and sends the step move to
    /// every worker.
    fn step_ended(&self, step_index: u64, step_move: Option<&M>) {
        self.current_step.store(step_index + 1, Ordering::SeqCst);
        for update in &self.updates {
            // A worker that hung up is reported by the next receive.
            let _ = update.send(StepUpdate {
                step_index,
                step_move: step_move.cloned(),
            });
        }
    }

    fn shutdown(&mut self) {
        self.operations = None;
        self.updates.clear();
        self.evaluations = None;
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!(event = "move_thread_panicked");
            }
        }
    }
}

impl<S: PlanningSolution, M> Drop for WorkerPool<S, M> {
    fn drop(&mut self) {
        self.operations = None;
        self.updates.clear();
        self.evaluations = None;
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

struct Worker<S: PlanningSolution, D, M> {
    score_director: D,
    environment_mode: EnvironmentMode,
    operations: Receiver<Operation<M>>,
    updates: Receiver<StepUpdate<M>>,
    evaluations: Sender<Evaluation<S::Score, M>>,
    current_step: Arc<AtomicU64>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, D, M> Worker<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Evaluates operations until the main thread hangs up.
    fn run(mut self) {
        let mut worker_step = 0u64;
        let mut score = self.score_director.calculate_score();
        while let Ok(operation) = self.operations.recv() {
            while worker_step < operation.step_index {
                let Ok(update) = self.updates.recv() else {
                    return;
                };
                if let Some(step_move) = update.step_move {
                    step_move.do_move(&mut self.score_director);
                    self.score_director.trigger_variable_listeners();
                }
                worker_step = update.step_index + 1;
                score = self.score_director.calculate_score();
            }
            if operation.step_index < self.current_step.load(Ordering::SeqCst) {
                continue;
            }
            let evaluated = evaluate_move::<S, D, M>(
                &mut self.score_director,
                &operation.mv,
                self.environment_mode,
                score,
            );
            let evaluation = Evaluation {
                step_index: operation.step_index,
                move_index: operation.move_index,
                mv: operation.mv,
                score: evaluated,
            };
            if self.evaluations.send(evaluation).is_err() {
                return;
            }
        }
    }
}

/// Evaluates moves on `move_thread_count` worker threads.
///
/// Workers are started when the phase starts and joined when it ends.
/// Steps are committed on the main thread, in the same order and with the
/// same picks as [`SingleThreadedDecider`](super::SingleThreadedDecider).
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `A` - The acceptor type
/// * `F` - The forager type
pub struct MultiThreadedDecider<S: PlanningSolution, M, MS, A, F> {
    move_selector: MS,
    acceptor: A,
    forager: F,
    move_thread_count: usize,
    move_thread_buffer_size: usize,
    pool: Option<WorkerPool<S, M>>,
    last_step: Option<(M, M)>,
}

impl<S: PlanningSolution, M, MS, A, F> MultiThreadedDecider<S, M, MS, A, F> {
    pub fn new(move_selector: MS, acceptor: A, forager: F, move_thread_count: usize) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            move_thread_count: move_thread_count.max(1),
            move_thread_buffer_size: DEFAULT_MOVE_THREAD_BUFFER_SIZE,
            pool: None,
            last_step: None,
        }
    }

    /// Sets how many evaluations each worker may have queued.
    pub fn with_move_thread_buffer_size(mut self, size: usize) -> Self {
        self.move_thread_buffer_size = size.max(1);
        self
    }

    pub fn move_thread_count(&self) -> usize {
        self.move_thread_count
    }

    pub fn move_thread_buffer_size(&self) -> usize {
        self.move_thread_buffer_size
    }
}

impl<S, M, MS, A, F> Debug for MultiThreadedDecider<S, M, MS, A, F>
where
    S: PlanningSolution,
    MS: Debug,
    A: Debug,
    F: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiThreadedDecider")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("move_thread_count", &self.move_thread_count)
            .field("move_thread_buffer_size", &self.move_thread_buffer_size)
            .field("running", &self.pool.is_some())
            .finish()
    }
}

impl<S, D, M, MS, A, F> LocalSearchDecider<S, D> for MultiThreadedDecider<S, M, MS, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
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
        let environment_mode = phase_scope.solver_scope().environment_mode();
        let pool = WorkerPool::spawn(
            phase_scope.score_director(),
            self.move_thread_count,
            self.move_thread_buffer_size,
            environment_mode,
        )?;
        debug!(
            event = "move_threads_started",
            move_thread_count = self.move_thread_count,
            move_thread_buffer_size = self.move_thread_buffer_size,
        );
        self.pool = Some(pool);
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
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| StepwiseError::InvalidState("move threads not started".to_string()))?;
        let step_index = step_scope.step_index();
        let capacity = (self.move_thread_count * self.move_thread_buffer_size) as u64;

        let mut sent = 0u64;
        let mut foraged = 0u64;
        let mut pending: BTreeMap<u64, (M, S::Score)> = BTreeMap::new();
        let mut quit = false;

        {
            let mut not_doable = NotDoableStreak::new::<S, D, M, _>(
                &self.move_selector,
                step_scope.score_director(),
            );
            let mut moves = self.move_selector.iter_moves(step_scope.score_director());
            let mut exhausted = false;
            while !quit && (!exhausted || foraged < sent) {
                // Keep the workers busy until the selector runs dry.
                while !exhausted && sent - foraged < capacity {
                    if step_scope.phase_scope().is_terminated(termination) {
                        exhausted = true;
                        break;
                    }
                    match moves.next() {
                        Some(mv) => {
                            if !mv.is_doable(step_scope.score_director()) {
                                if not_doable.skip(step_index) {
                                    exhausted = true;
                                    break;
                                }
                                continue;
                            }
                            not_doable.reset();
                            pool.send(Operation {
                                step_index,
                                move_index: sent,
                                mv,
                            })?;
                            sent += 1;
                        }
                        None => exhausted = true,
                    }
                }
                if foraged == sent {
                    break;
                }

                let evaluation = pool.receive()?;
                if evaluation.step_index != step_index {
                    continue;
                }
                pending.insert(evaluation.move_index, (evaluation.mv, evaluation.score?));

                // Forage in selection order.
                while let Some((mv, score)) = pending.remove(&foraged) {
                    step_scope.record_selected_move();
                    let candidate = MoveCandidate {
                        step_index,
                        move_index: foraged,
                        score,
                        mv: &mv,
                    };
                    foraged += 1;
                    if self.acceptor.is_accepted(&candidate) {
                        step_scope.record_accepted_move();
                        self.forager.add_move(mv, score);
                        if self.forager.is_quit_early() {
                            quit = true;
                            break;
                        }
                    }
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
        if let Some(pool) = &self.pool {
            pool.step_ended(
                step_scope.step_index(),
                self.last_step.as_ref().map(|(mv, _)| mv),
            );
        }
        end_step::<S, D, M, _, _>(
            step_scope,
            self.last_step.as_ref(),
            &mut self.move_selector,
            &mut self.acceptor,
        );
    }

    fn phase_ended(&mut self) {
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
            debug!(event = "move_threads_stopped");
        }
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
        self.forager.phase_ended();
        self.last_step = None;
    }
}
