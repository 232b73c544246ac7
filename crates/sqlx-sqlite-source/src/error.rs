//! Error types for sqlx-sqlite-source

/// Result type alias for SQLite source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that may occur when querying SQLite.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// I/O error when accessing database files.
   #[error("io error: {0}")]
   Io(#[from] std::io::Error),

   /// Database has been closed and cannot be used.
   #[error("database has been closed")]
   DatabaseClosed,

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::Io(_) => "IO_ERROR".to_string(),
         Error::DatabaseClosed => "DATABASE_CLOSED".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
      }
   }
}
