//! Database-specific error types and conversions.

use alumnet_core::error::AlumnetError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored row that does not map back onto the domain model.
    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for AlumnetError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AlumnetError::NotFound { entity, id },
            DbError::Crypto(msg) => AlumnetError::Crypto(msg),
            other => AlumnetError::Database(other.to_string()),
        }
    }
}
