use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotekitError {
    #[error("This item cannot be pinned: {0}")]
    InvalidPinType(String),

    #[error("Topic {0} cannot be pinned without its notebook id")]
    MissingNotebookId(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Storage(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NotekitError>;
