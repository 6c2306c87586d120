//! Error types for Stepwise

use thiserror::Error;

/// Main error type for Stepwise operations
#[derive(Debug, Error)]
pub enum StepwiseError {
    /// Error in solver configuration, detected before any step executes
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error in domain model definition
    #[error("Domain model error: {0}")]
    DomainModel(String),

    /// The incrementally maintained score drifted from a from-scratch calculation
    #[error(
        "Score corruption ({context}): the working score ({working}) is not the expected score ({expected}).{analysis}"
    )]
    ScoreCorruption {
        context: String,
        working: String,
        expected: String,
        analysis: String,
    },

    /// Undoing a move did not restore the score from before the move
    #[error(
        "Undo move corruption: the score before the move ({before}) differs from the score after its undo ({after_undo}) for move {move_description}"
    )]
    UndoMismatch {
        move_description: String,
        before: String,
        after_undo: String,
    },

    /// Error during score calculation
    #[error("Score calculation error: {0}")]
    ScoreCalculation(String),

    /// Solver was cancelled before completion
    #[error("Solver was cancelled")]
    Cancelled,

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StepwiseError {
    /// Returns true for errors that indicate a bug in a move or score calculator.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StepwiseError::ScoreCorruption { .. } | StepwiseError::UndoMismatch { .. }
        )
    }
}

/// Result type alias for Stepwise operations
pub type Result<T> = std::result::Result<T, StepwiseError>;
