use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A returned match is missing a metadata field the domain schema
    /// requires. Indicates the index was populated with an incompatible
    /// schema; never masked.
    #[error("Missing metadata field: {0}")]
    MissingField(String),

    #[error("Metadata field {field} has wrong type: expected {expected}")]
    FieldType { field: String, expected: &'static str },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Reasoning error: {0}")]
    Reasoning(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
