use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PapersError {
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key/value substrate rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot text is not a well-formed papers database.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, PapersError>;
