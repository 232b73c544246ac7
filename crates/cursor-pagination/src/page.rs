//! Page result types.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use tracing::debug;

use crate::source::QuerySource;
use crate::sql::CompiledQuery;
use crate::{Error, Result};

/// One item of a page together with its cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
   pub cursor: String,
   pub node: T,
}

/// Navigation state of a page.
///
/// Only the flag for the requested direction is computed: `has_next_page`
/// for `first`, `has_previous_page` for `last`. The other one is always
/// `false`; clients that switch direction track it from earlier pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
   pub has_next_page: bool,
   pub has_previous_page: bool,
   /// Cursor of the first edge, `None` when the page is empty
   pub start_cursor: Option<String>,
   /// Cursor of the last edge, `None` when the page is empty
   pub end_cursor: Option<String>,
}

/// A count query that has been built but not run.
///
/// The caller decides whether the count is worth a second round trip.
pub struct DeferredCount {
   compiled: CompiledQuery,
   run: Box<dyn FnOnce() -> BoxFuture<'static, Result<u64>> + Send>,
}

impl DeferredCount {
   pub fn new<F, Fut>(compiled: CompiledQuery, run: F) -> Self
   where
      F: FnOnce() -> Fut + Send + 'static,
      Fut: Future<Output = Result<u64>> + Send + 'static,
   {
      Self {
         compiled,
         run: Box::new(move || run().boxed()),
      }
   }

   /// Defer `execute_count` on a source already shaped as a count query.
   pub fn from_source<S: QuerySource>(source: S) -> Self {
      let compiled = source.compile();
      Self::new(compiled, move || async move {
         source.execute_count().await.map_err(Error::query)
      })
   }

   /// The SQL text and bind values of the count query.
   pub fn compiled(&self) -> &CompiledQuery {
      &self.compiled
   }

   /// Run the count query.
   pub async fn execute(self) -> Result<u64> {
      (self.run)().await
   }
}

impl fmt::Debug for DeferredCount {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("DeferredCount")
         .field("compiled", &self.compiled)
         .finish_non_exhaustive()
   }
}

/// A window of a collection in the requested logical order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
   pub page_info: PageInfo,
   pub edges: Vec<Edge<T>>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub total_count: Option<u64>,
   #[serde(skip)]
   pub deferred_count: Option<DeferredCount>,
}

impl<T> Page<T> {
   /// The page returned when no rows matched.
   pub fn empty() -> Self {
      Self {
         page_info: PageInfo::default(),
         edges: Vec::new(),
         total_count: Some(0),
         deferred_count: None,
      }
   }

   pub fn len(&self) -> usize {
      self.edges.len()
   }

   pub fn is_empty(&self) -> bool {
      self.edges.is_empty()
   }

   pub fn nodes(&self) -> impl Iterator<Item = &T> {
      self.edges.iter().map(|e| &e.node)
   }

   pub fn cursors(&self) -> impl Iterator<Item = &str> {
      self.edges.iter().map(|e| e.cursor.as_str())
   }

   /// Run the deferred count query, if there is one, and store the result
   /// in `total_count`.
   pub async fn resolve_total_count(mut self) -> Result<Self> {
      if let Some(deferred) = self.deferred_count.take() {
         let count = deferred.execute().await?;
         debug!(count, "Resolved deferred total count");
         self.total_count = Some(count);
      }
      Ok(self)
   }

   /// Convert every node, keeping cursors and page info.
   pub fn map_nodes<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
      Page {
         page_info: self.page_info,
         edges: self
            .edges
            .into_iter()
            .map(|e| Edge {
               cursor: e.cursor,
               node: f(e.node),
            })
            .collect(),
         total_count: self.total_count,
         deferred_count: self.deferred_count,
      }
   }

   /// Fallible version of [`map_nodes`](Self::map_nodes).
   pub fn try_map_nodes<U, E>(
      self,
      mut f: impl FnMut(T) -> std::result::Result<U, E>,
   ) -> std::result::Result<Page<U>, E> {
      let mut edges = Vec::with_capacity(self.edges.len());
      for edge in self.edges {
         edges.push(Edge {
            cursor: edge.cursor,
            node: f(edge.node)?,
         });
      }

      Ok(Page {
         page_info: self.page_info,
         edges,
         total_count: self.total_count,
         deferred_count: self.deferred_count,
      })
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   fn sample_page() -> Page<i64> {
      Page {
         page_info: PageInfo {
            has_next_page: true,
            has_previous_page: false,
            start_cursor: Some("a".into()),
            end_cursor: Some("b".into()),
         },
         edges: vec![
            Edge {
               cursor: "a".into(),
               node: 1,
            },
            Edge {
               cursor: "b".into(),
               node: 2,
            },
         ],
         total_count: None,
         deferred_count: None,
      }
   }

   #[test]
   fn empty_page_shape() {
      let page: Page<()> = Page::empty();
      assert!(page.is_empty());
      assert_eq!(page.total_count, Some(0));
      assert_eq!(page.page_info, PageInfo::default());
      assert!(page.deferred_count.is_none());
   }

   #[test]
   fn serializes_camel_case() {
      let value = serde_json::to_value(sample_page()).unwrap();

      assert_eq!(
         value,
         json!({
            "pageInfo": {
               "hasNextPage": true,
               "hasPreviousPage": false,
               "startCursor": "a",
               "endCursor": "b",
            },
            "edges": [
               { "cursor": "a", "node": 1 },
               { "cursor": "b", "node": 2 },
            ],
         })
      );
   }

   #[test]
   fn map_nodes_keeps_cursors() {
      let page = sample_page().map_nodes(|n| n * 10);
      assert_eq!(page.nodes().copied().collect::<Vec<_>>(), vec![10, 20]);
      assert_eq!(page.cursors().collect::<Vec<_>>(), vec!["a", "b"]);
      assert!(page.page_info.has_next_page);
   }

   #[test]
   fn try_map_nodes_stops_on_error() {
      let result = sample_page().try_map_nodes(|n| if n == 2 { Err("two") } else { Ok(n) });
      assert_eq!(result.unwrap_err(), "two");
   }

   #[tokio::test]
   async fn resolve_total_count_runs_deferred_query_once() {
      let compiled = CompiledQuery {
         sql: "select count(*)".into(),
         parameters: vec![],
      };
      let mut page = sample_page();
      page.deferred_count = Some(DeferredCount::new(compiled, || async { Ok(42) }));

      assert_eq!(
         page.deferred_count.as_ref().unwrap().compiled().sql,
         "select count(*)"
      );

      let page = page.resolve_total_count().await.unwrap();
      assert_eq!(page.total_count, Some(42));
      assert!(page.deferred_count.is_none());
   }

   #[tokio::test]
   async fn resolve_total_count_without_handle_is_noop() {
      let page: Page<()> = Page::empty().resolve_total_count().await.unwrap();
      assert_eq!(page.total_count, Some(0));
   }
}
