use crate::ai::SuggestError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LessonError {
    #[error("Lesson not found: {0}")]
    NotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("A suggestion request is already in progress")]
    GenerationPending,

    #[error("Failed to generate lesson plan: {0}")]
    Suggestion(#[from] SuggestError),

    #[error("Could not decode stored lesson '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LessonError>;
