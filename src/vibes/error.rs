use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum VibesError {
    /// User input failed a precondition. Recovered by re-prompting.
    #[error("{0}")]
    Validation(String),

    #[error("Vibe not found with ID: {0}")]
    NotFound(Uuid),

    #[error("Vibe with ID {0} already exists")]
    AlreadyExists(Uuid),

    /// The backend could not be reached, or refused us for transport/auth reasons.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Cosmos DB error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl VibesError {
    /// True for failures the user can fix by getting the backend running again.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, VibesError::StoreUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, VibesError>;
