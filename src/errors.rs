use thiserror::Error;

/// Error type that captures category-tree and persistence failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid code `{0}`")]
    InvalidCode(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("unknown parent `{0}`")]
    UnknownParent(String),
    #[error("category `{name}` already exists under `{parent}`")]
    DuplicateName { name: String, parent: String },
    #[error("code `{0}` is already taken")]
    ExistingCode(String),
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("category `{0}` is inactive")]
    Inactive(String),
    #[error("`{0}` is not a list")]
    NotAList(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
