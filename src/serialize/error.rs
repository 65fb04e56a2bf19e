use crate::catalog::CatalogError;
use thiserror::Error;

/// Failure of a catalog export
#[derive(Debug, Error)]
pub enum SerializationError {
    /// No destination was supplied; nothing was written
    #[error("no output destination provided")]
    MissingDestination,

    /// The catalog graph has unresolved references; nothing was written
    #[error("catalog is not well formed: {0}")]
    InvalidCatalog(#[from] CatalogError),

    /// Encoding or writing failed part way; the destination may hold partial output
    #[error("could not serialize catalog")]
    Serialize(#[source] serde_json::Error),
}

impl SerializationError {
    /// Whether the export was rejected before anything was written
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            SerializationError::MissingDestination | SerializationError::InvalidCatalog(_)
        )
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::Serialize(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::Serialize(serde_json::Error::io(err))
    }
}
