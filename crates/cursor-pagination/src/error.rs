/// Result type alias for pagination operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a [`QuerySource`](crate::QuerySource) when a query fails.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for cursor pagination.
///
/// Variants fall into three groups: contract violations by the calling code
/// (sort key and request shape), client input errors (undecodable cursors),
/// and failures of the underlying query source, which are passed through
/// unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// A sort key needs at least one field.
   #[error("sort key requires at least one field")]
   EmptySortKey,

   /// Sort field name contains invalid characters.
   ///
   /// Field names must match `[a-zA-Z_][a-zA-Z0-9_.]*` (letters, digits,
   /// underscores, and dots for qualified names like `table.column`).
   #[error("invalid sort field name '{name}': must match [a-zA-Z_][a-zA-Z0-9_.]*")]
   InvalidColumnName { name: String },

   /// The same field appears twice in a sort key.
   #[error("sort field '{field}' appears more than once in the sort key")]
   DuplicateSortField { field: String },

   /// A sort key field was declared nullable.
   #[error("sort field '{field}' is nullable; sort key fields must be NOT NULL")]
   NullableSortField { field: String },

   /// Only `>` and `<` can seek past a cursor.
   #[error("'{0}' is not a valid cursor comparator, expected '>' or '<'")]
   InvalidComparator(&'static str),

   /// Page size must be greater than zero.
   #[error("page size must be greater than zero")]
   InvalidPageSize,

   /// Both `first` and `last` were provided.
   #[error("cannot provide both 'first' and 'last'")]
   ConflictingPageSizes,

   /// Neither `first` nor `last` was provided.
   #[error("one of 'first' or 'last' is required")]
   MissingPageSize,

   /// A cursor was paired with the wrong direction (`after` with `last`, or
   /// `before` with `first`).
   #[error("'{cursor}' can only be combined with '{expected}'")]
   MisplacedCursor {
      cursor: &'static str,
      expected: &'static str,
   },

   /// Cursor string could not be decoded.
   #[error("invalid cursor: {0}")]
   InvalidCursor(String),

   /// Decoded cursor length does not match the sort key.
   #[error("cursor has {cursor_len} values but sort key has {keyset_len} fields")]
   CursorLengthMismatch {
      cursor_len: usize,
      keyset_len: usize,
   },

   /// A returned row lacks one of the sort key fields.
   #[error("sort field '{field}' not found in query results")]
   CursorFieldMissing { field: String },

   /// A codec could not turn sort key values into a cursor.
   #[error("failed to encode cursor: {0}")]
   CursorEncoding(String),

   /// A returned row holds NULL in one of the sort key fields.
   #[error("sort field '{field}' is NULL in query results")]
   NullSortValue { field: String },

   /// The query source failed while executing a query.
   #[error("query execution failed: {0}")]
   Query(#[source] BoxError),
}

impl Error {
   /// Wrap a query source failure.
   pub fn query(err: impl std::error::Error + Send + Sync + 'static) -> Self {
      Error::Query(Box::new(err))
   }

   /// Whether the error was caused by client input rather than by the
   /// calling code or the database.
   ///
   /// Boundary layers use this to choose between 4xx and 5xx style responses.
   pub fn is_client_error(&self) -> bool {
      matches!(
         self,
         Error::InvalidCursor(_) | Error::CursorLengthMismatch { .. }
      )
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::EmptySortKey => "EMPTY_SORT_KEY".to_string(),
         Error::InvalidColumnName { .. } => "INVALID_COLUMN_NAME".to_string(),
         Error::DuplicateSortField { .. } => "DUPLICATE_SORT_FIELD".to_string(),
         Error::NullableSortField { .. } => "NULLABLE_SORT_FIELD".to_string(),
         Error::InvalidComparator(_) => "INVALID_COMPARATOR".to_string(),
         Error::InvalidPageSize => "INVALID_PAGE_SIZE".to_string(),
         Error::ConflictingPageSizes => "CONFLICTING_PAGE_SIZES".to_string(),
         Error::MissingPageSize => "MISSING_PAGE_SIZE".to_string(),
         Error::MisplacedCursor { .. } => "MISPLACED_CURSOR".to_string(),
         Error::InvalidCursor(_) => "INVALID_CURSOR".to_string(),
         Error::CursorLengthMismatch { .. } => "CURSOR_LENGTH_MISMATCH".to_string(),
         Error::CursorFieldMissing { .. } => "CURSOR_FIELD_MISSING".to_string(),
         Error::CursorEncoding(_) => "CURSOR_ENCODING".to_string(),
         Error::NullSortValue { .. } => "NULL_SORT_VALUE".to_string(),
         Error::Query(_) => "QUERY_ERROR".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_empty_sort_key() {
      let err = Error::EmptySortKey;
      assert_eq!(err.error_code(), "EMPTY_SORT_KEY");
      assert!(err.to_string().contains("at least one field"));
   }

   #[test]
   fn test_error_code_invalid_column_name() {
      let err = Error::InvalidColumnName {
         name: "bad;name".into(),
      };
      assert_eq!(err.error_code(), "INVALID_COLUMN_NAME");
      assert!(err.to_string().contains("bad;name"));
   }

   #[test]
   fn test_error_code_nullable_sort_field() {
      let err = Error::NullableSortField {
         field: "archived_at".into(),
      };
      assert_eq!(err.error_code(), "NULLABLE_SORT_FIELD");
      assert!(err.to_string().contains("archived_at"));
   }

   #[test]
   fn test_error_code_cursor_encoding() {
      let err = Error::CursorEncoding("not an integer".into());
      assert_eq!(err.error_code(), "CURSOR_ENCODING");
      assert!(!err.is_client_error());
   }

   #[test]
   fn test_error_code_null_sort_value() {
      let err = Error::NullSortValue {
         field: "rank".into(),
      };
      assert_eq!(err.error_code(), "NULL_SORT_VALUE");
      assert!(!err.is_client_error());
   }

   #[test]
   fn test_error_code_misplaced_cursor() {
      let err = Error::MisplacedCursor {
         cursor: "after",
         expected: "first",
      };
      assert_eq!(err.error_code(), "MISPLACED_CURSOR");
      assert_eq!(err.to_string(), "'after' can only be combined with 'first'");
   }

   #[test]
   fn test_error_code_cursor_length_mismatch() {
      let err = Error::CursorLengthMismatch {
         cursor_len: 2,
         keyset_len: 3,
      };
      assert_eq!(err.error_code(), "CURSOR_LENGTH_MISMATCH");
      assert!(err.to_string().contains("2"));
      assert!(err.to_string().contains("3"));
   }

   #[test]
   fn test_error_code_query() {
      let err = Error::query(std::io::Error::new(
         std::io::ErrorKind::ConnectionReset,
         "reset",
      ));
      assert_eq!(err.error_code(), "QUERY_ERROR");
      assert!(err.to_string().contains("reset"));
   }

   #[test]
   fn test_client_errors_are_cursor_errors_only() {
      assert!(Error::InvalidCursor("bad".into()).is_client_error());
      assert!(
         Error::CursorLengthMismatch {
            cursor_len: 1,
            keyset_len: 2,
         }
         .is_client_error()
      );
      assert!(!Error::ConflictingPageSizes.is_client_error());
      assert!(!Error::EmptySortKey.is_client_error());
      assert!(!Error::query(std::fmt::Error).is_client_error());
   }
}
