//! Connection arguments as received from clients

use cursor_pagination::PaginationRequest;
use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::{Error, Result};

/// The `first`/`after`/`last`/`before` arguments of a connection field.
///
/// Sizes are GraphQL `Int`s, so they arrive signed and unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionArgs {
   pub first: Option<i32>,
   pub after: Option<String>,
   pub last: Option<i32>,
   pub before: Option<String>,
}

impl ConnectionArgs {
   pub fn first(first: i32) -> Self {
      Self {
         first: Some(first),
         ..Self::default()
      }
   }

   pub fn first_after(first: i32, after: impl Into<String>) -> Self {
      Self {
         first: Some(first),
         after: Some(after.into()),
         ..Self::default()
      }
   }

   pub fn last(last: i32) -> Self {
      Self {
         last: Some(last),
         ..Self::default()
      }
   }

   pub fn last_before(last: i32, before: impl Into<String>) -> Self {
      Self {
         last: Some(last),
         before: Some(before.into()),
         ..Self::default()
      }
   }

   /// Validate against the configured limits and build an engine request.
   pub fn to_request(&self, config: &PaginationConfig) -> Result<PaginationRequest> {
      let first = page_size("first", self.first, config.max_page_size)?;
      let last = page_size("last", self.last, config.max_page_size)?;

      PaginationRequest::from_args(first, self.after.clone(), last, self.before.clone())
         .map_err(|e| Error::InvalidArguments(e.to_string()))
   }
}

fn page_size(name: &str, value: Option<i32>, max: usize) -> Result<Option<usize>> {
   let Some(value) = value else {
      return Ok(None);
   };

   let size = usize::try_from(value)
      .map_err(|_| Error::InvalidArguments(format!("'{name}' must not be negative")))?;

   if size > max {
      return Err(Error::InvalidArguments(format!(
         "'{name}' must not exceed {max}"
      )));
   }

   Ok(Some(size))
}

#[cfg(test)]
mod tests {
   use super::*;

   fn config() -> PaginationConfig {
      PaginationConfig {
         max_page_size: 50,
         count_limit: 5000,
      }
   }

   #[test]
   fn test_valid_shapes() {
      assert_eq!(
         ConnectionArgs::first(10).to_request(&config()).unwrap(),
         PaginationRequest::first(10)
      );
      assert_eq!(
         ConnectionArgs::first_after(10, "c").to_request(&config()).unwrap(),
         PaginationRequest::first_after(10, "c")
      );
      assert_eq!(
         ConnectionArgs::last(5).to_request(&config()).unwrap(),
         PaginationRequest::last(5)
      );
      assert_eq!(
         ConnectionArgs::last_before(5, "c").to_request(&config()).unwrap(),
         PaginationRequest::last_before(5, "c")
      );
   }

   #[test]
   fn test_negative_size() {
      let err = ConnectionArgs::first(-1).to_request(&config()).unwrap_err();
      assert!(matches!(err, Error::InvalidArguments(_)));
      assert!(err.to_string().contains("'first' must not be negative"));
   }

   #[test]
   fn test_size_above_max() {
      let err = ConnectionArgs::last(51).to_request(&config()).unwrap_err();
      assert!(err.to_string().contains("'last' must not exceed 50"));

      assert!(ConnectionArgs::last(50).to_request(&config()).is_ok());
   }

   #[test]
   fn test_shape_errors_are_client_errors() {
      let both = ConnectionArgs {
         first: Some(1),
         last: Some(1),
         ..ConnectionArgs::default()
      };
      let misplaced = ConnectionArgs {
         first: Some(1),
         before: Some("c".into()),
         ..ConnectionArgs::default()
      };

      for args in [both, misplaced, ConnectionArgs::default(), ConnectionArgs::first(0)] {
         let err = args.to_request(&config()).unwrap_err();
         assert!(err.is_client_error(), "{args:?}");
         assert_eq!(err.error_code(), "INVALID_ARGUMENTS");
      }
   }

   #[test]
   fn test_deserialize_camel_case() {
      let args: ConnectionArgs =
         serde_json::from_str(r#"{ "first": 3, "after": "abc" }"#).unwrap();
      assert_eq!(args, ConnectionArgs::first_after(3, "abc"));
   }
}
