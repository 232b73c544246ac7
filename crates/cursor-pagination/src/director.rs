//! Page planning and execution.
//!
//! # How It Works
//!
//! Rows are never skipped with OFFSET. The query is ordered by every field
//! of the sort key and, when a cursor is given, filtered to the rows strictly
//! beyond it with the lexicographic predicate. One row more than the page
//! size is requested; if it comes back, another page exists in the requested
//! direction.
//!
//! For `last`/`before` the physical order is the reverse of the logical
//! order so the database returns the rows nearest the cursor first. The rows
//! are reversed back before they are returned.
//!
//! | logical | request | comparator | physical order |
//! |---------|---------|------------|----------------|
//! | asc     | first   | `>`        | asc            |
//! | asc     | last    | `<`        | desc           |
//! | desc    | first   | `<`        | desc           |
//! | desc    | last    | `>`        | asc            |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::CursorCodec;
use crate::page::{DeferredCount, Edge, Page, PageInfo};
use crate::predicate::{ComparisonOp, build_lexicographic_predicate};
use crate::request::PaginationRequest;
use crate::sort_key::{SortDirection, SortKeySpec};
use crate::source::QuerySource;
use crate::{Error, Result};

/// Default cap on the deferred total count.
pub const DEFAULT_COUNT_LIMIT: usize = 5000;

/// Per-call pagination settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
   /// Order the edges are returned in
   pub logical_order: SortDirection,
   /// The total count stops at this many rows
   pub count_limit: usize,
}

impl Default for PaginationOptions {
   fn default() -> Self {
      Self {
         logical_order: SortDirection::Asc,
         count_limit: DEFAULT_COUNT_LIMIT,
      }
   }
}

impl PaginationOptions {
   pub fn ordered(logical_order: SortDirection) -> Self {
      Self {
         logical_order,
         ..Default::default()
      }
   }
}

/// How a request maps onto the database query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
   /// Operator used against the cursor values
   pub comparator: ComparisonOp,
   /// Order rows are fetched in
   pub physical_order: SortDirection,
   /// Whether fetched rows must be reversed into logical order
   pub reversed: bool,
}

impl PagePlan {
   pub fn resolve(logical_order: SortDirection, request: &PaginationRequest) -> Self {
      let reversed = request.is_backward();
      let physical_order = if reversed {
         logical_order.reversed()
      } else {
         logical_order
      };
      let comparator = match physical_order {
         SortDirection::Asc => ComparisonOp::Gt,
         SortDirection::Desc => ComparisonOp::Lt,
      };

      Self {
         comparator,
         physical_order,
         reversed,
      }
   }
}

/// Fetch one page of `source`.
///
/// `source` should already carry the caller's own filters (owner, type, …).
/// The returned page holds a [`DeferredCount`] for the total number of rows
/// matching those filters, ignoring the cursor, which is only run if the
/// caller asks for it.
pub async fn paginate<S, C>(
   source: S,
   request: &PaginationRequest,
   spec: &SortKeySpec,
   options: PaginationOptions,
   codec: &C,
) -> Result<Page<S::Row>>
where
   S: QuerySource,
   C: CursorCodec + ?Sized,
{
   request.validate()?;

   let plan = PagePlan::resolve(options.logical_order, request);
   let page_size = request.page_size();

   debug!(
      page_size,
      reversed = plan.reversed,
      comparator = plan.comparator.as_sql(),
      has_cursor = request.cursor().is_some(),
      "Planning page"
   );

   let mut query = source;
   for name in spec.names() {
      query = query.order_by(name, plan.physical_order);
   }

   // Counted before the cursor predicate, so the total is the same on
   // every page of the collection
   let count_query = query
      .clone()
      .clear_order_by()
      .clear_select()
      .select_count()
      .limit(options.count_limit);
   let deferred_count = DeferredCount::from_source(count_query);

   if let Some(cursor) = request.cursor() {
      let values = codec.decode(cursor, spec)?;
      let predicate = build_lexicographic_predicate(spec, &values, plan.comparator)?;
      query = query.filter(predicate);
   }

   let fetch_limit = page_size.checked_add(1).ok_or(Error::InvalidPageSize)?;
   let mut rows = query
      .limit(fetch_limit)
      .execute()
      .await
      .map_err(Error::query)?;

   debug!(rows = rows.len(), "Fetched page rows");

   if rows.is_empty() {
      return Ok(Page::empty());
   }

   let has_more = rows.len() > page_size;
   rows.truncate(page_size);

   let mut edges = Vec::with_capacity(rows.len());
   for row in rows {
      let values = spec.project(&row)?;
      edges.push(Edge {
         cursor: codec.encode(&values, spec)?,
         node: row,
      });
   }

   if plan.reversed {
      edges.reverse();
   }

   let page_info = PageInfo {
      has_next_page: !plan.reversed && has_more,
      has_previous_page: plan.reversed && has_more,
      start_cursor: edges.first().map(|e| e.cursor.clone()),
      end_cursor: edges.last().map(|e| e.cursor.clone()),
   };

   Ok(Page {
      page_info,
      edges,
      total_count: None,
      deferred_count: Some(deferred_count),
   })
}
