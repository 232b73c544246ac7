//! Error types for the content BFF

/// Result type alias for BFF operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the BFF to its resolvers and handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from the pagination engine.
   #[error(transparent)]
   Pagination(#[from] cursor_pagination::Error),

   /// Error from the SQLite query source.
   #[error(transparent)]
   Database(#[from] sqlx_sqlite_source::Error),

   /// I/O error when reading configuration.
   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   /// JSON (de)serialization error, for configuration files and row mapping.
   #[error("json error: {0}")]
   Json(#[from] serde_json::Error),

   /// Timestamp could not be formatted for storage.
   #[error("timestamp error: {0}")]
   Timestamp(#[from] time::error::Format),

   /// Configuration values are out of range.
   #[error("invalid configuration: {0}")]
   InvalidConfig(String),

   /// Connection arguments supplied by the client are invalid.
   #[error("invalid arguments: {0}")]
   InvalidArguments(String),
}

impl Error {
   /// Whether the error should be reported to the client as a bad request.
   pub fn is_client_error(&self) -> bool {
      match self {
         Error::Pagination(e) => e.is_client_error(),
         Error::InvalidArguments(_) => true,
         _ => false,
      }
   }

   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Pagination(e) => e.error_code(),
         Error::Database(e) => e.error_code(),
         Error::Io(_) => "IO_ERROR".to_string(),
         Error::Json(_) => "JSON_ERROR".to_string(),
         Error::Timestamp(_) => "TIMESTAMP_ERROR".to_string(),
         Error::InvalidConfig(_) => "INVALID_CONFIG".to_string(),
         Error::InvalidArguments(_) => "INVALID_ARGUMENTS".to_string(),
      }
   }
}
