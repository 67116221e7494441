use crate::models::Phase;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Please go back and select a PDF file.")]
    NoFileSelected,

    /// Network failure, server error or an unusable quiz. The message is shown
    /// to the user as-is.
    #[error("{0}")]
    Generation(String),

    #[error("A quiz is already being generated")]
    GenerationInFlight,

    #[error("Not available during {actual} (needs {expected})")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Question {number} is not the current question")]
    NotCurrentQuestion { number: usize },

    #[error("Question {number} has already been answered")]
    AlreadyAnswered { number: usize },

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
