use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Cannot reach {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Server returned {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Expected JSON but got '{content_type}': {snippet}")]
    NotJson { content_type: String, snippet: String },

    #[error("Unexpected response envelope: expected {expected}")]
    Envelope { expected: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChurnError {
    /// True when the backend could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

pub type ChurnResult<T> = Result<T, ChurnError>;
