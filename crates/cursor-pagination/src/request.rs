//! Pagination request shapes.

use serde::Serialize;

use crate::{Error, Result};

/// What the client asked for: a page size and an optional cursor, in one of
/// two directions.
///
/// `after` only exists alongside `first` and `before` only alongside `last`,
/// so the four valid shapes are the only representable ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginationRequest {
   /// `{first, after?}`: rows following the cursor (or from the start).
   Forward { first: usize, after: Option<String> },
   /// `{last, before?}`: rows preceding the cursor (or from the end).
   Backward { last: usize, before: Option<String> },
}

impl PaginationRequest {
   pub fn first(first: usize) -> Self {
      PaginationRequest::Forward { first, after: None }
   }

   pub fn first_after(first: usize, after: impl Into<String>) -> Self {
      PaginationRequest::Forward {
         first,
         after: Some(after.into()),
      }
   }

   pub fn last(last: usize) -> Self {
      PaginationRequest::Backward { last, before: None }
   }

   pub fn last_before(last: usize, before: impl Into<String>) -> Self {
      PaginationRequest::Backward {
         last,
         before: Some(before.into()),
      }
   }

   /// Build a request from loose connection arguments, rejecting every
   /// combination other than the four valid shapes.
   pub fn from_args(
      first: Option<usize>,
      after: Option<String>,
      last: Option<usize>,
      before: Option<String>,
   ) -> Result<Self> {
      let request = match (first, last) {
         (Some(_), Some(_)) => return Err(Error::ConflictingPageSizes),
         (None, None) => return Err(Error::MissingPageSize),
         (Some(first), None) => {
            if before.is_some() {
               return Err(Error::MisplacedCursor {
                  cursor: "before",
                  expected: "last",
               });
            }
            PaginationRequest::Forward { first, after }
         }
         (None, Some(last)) => {
            if after.is_some() {
               return Err(Error::MisplacedCursor {
                  cursor: "after",
                  expected: "first",
               });
            }
            PaginationRequest::Backward { last, before }
         }
      };

      request.validate()?;
      Ok(request)
   }

   /// Check the page size is usable.
   pub fn validate(&self) -> Result<()> {
      if self.page_size() == 0 {
         return Err(Error::InvalidPageSize);
      }
      Ok(())
   }

   /// `first` or `last`, whichever is set.
   pub fn page_size(&self) -> usize {
      match self {
         PaginationRequest::Forward { first, .. } => *first,
         PaginationRequest::Backward { last, .. } => *last,
      }
   }

   /// `after` or `before`, whichever is set.
   pub fn cursor(&self) -> Option<&str> {
      match self {
         PaginationRequest::Forward { after, .. } => after.as_deref(),
         PaginationRequest::Backward { before, .. } => before.as_deref(),
      }
   }

   pub fn is_backward(&self) -> bool {
      matches!(self, PaginationRequest::Backward { .. })
   }
}
