//! Best solution bookkeeping.

use std::fmt::Debug;

use stepwise_core::domain::PlanningSolution;
use stepwise_scoring::ScoreDirector;
use tokio::sync::mpsc::UnboundedSender;

/// A snapshot of the best solution found so far.
#[derive(Debug, Clone)]
pub struct BestSolution<S: PlanningSolution> {
    pub solution: S,
    pub score: S::Score,
    /// Number of steps taken by the solver when this solution was found.
    pub step_count: u64,
}

/// Remembers the best solution of a solving run.
///
/// After every committed step the new score is offered to the recaller.
/// When it beats the best score, the working solution is cloned and, if a
/// channel is attached, sent to whoever is listening.
pub struct BestSolutionRecaller<S: PlanningSolution> {
    best: Option<BestSolution<S>>,
    sender: Option<UnboundedSender<BestSolution<S>>>,
}

impl<S: PlanningSolution> BestSolutionRecaller<S> {
    pub fn new() -> Self {
        Self {
            best: None,
            sender: None,
        }
    }

    /// Sends every new best solution over `sender`.
    pub fn with_sender(mut self, sender: UnboundedSender<BestSolution<S>>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Records the starting solution as the first best solution.
    pub fn solving_started<D: ScoreDirector<S>>(&mut self, score: S::Score, score_director: &D) {
        self.best = None;
        self.record(score, score_director, 0);
    }

    /// Offers the working score after a step.
    ///
    /// Returns true if it is a new best score.
    pub fn process_working_score<D: ScoreDirector<S>>(
        &mut self,
        score: S::Score,
        score_director: &D,
        step_count: u64,
    ) -> bool {
        if self.best.as_ref().is_some_and(|best| score <= best.score) {
            return false;
        }
        self.record(score, score_director, step_count);
        true
    }

    fn record<D: ScoreDirector<S>>(&mut self, score: S::Score, score_director: &D, step_count: u64) {
        let mut solution = score_director.clone_working_solution();
        solution.set_score(Some(score));
        let best = BestSolution {
            solution,
            score,
            step_count,
        };
        if let Some(sender) = &self.sender {
            // A dropped receiver just stops listening.
            if sender.send(best.clone()).is_err() {
                self.sender = None;
            }
        }
        self.best = Some(best);
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best.as_ref().map(|best| &best.solution)
    }

    pub fn best_score(&self) -> Option<S::Score> {
        self.best.as_ref().map(|best| best.score)
    }

    pub fn take_best(&mut self) -> Option<BestSolution<S>> {
        self.best.take()
    }
}

impl<S: PlanningSolution> Default for BestSolutionRecaller<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Debug for BestSolutionRecaller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestSolutionRecaller")
            .field("best_score", &self.best_score())
            .field("has_sender", &self.sender.is_some())
            .finish()
    }
}
