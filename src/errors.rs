use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the domain, service, and storage layers.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("No book loaded")]
    BookNotLoaded,
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Person not found: {0}")]
    PersonNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Subcategory not found: {0}")]
    SubCategoryNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Invalid statement day: {0}")]
    InvalidStatementDay(u32),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Import error: {0}")]
    Import(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;

impl From<csv::Error> for FlowError {
    fn from(err: csv::Error) -> Self {
        FlowError::Import(err.to_string())
    }
}
