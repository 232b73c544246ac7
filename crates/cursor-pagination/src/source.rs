//! The capability set the engine needs from a storage backend.

use std::future::Future;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::predicate::Predicate;
use crate::sort_key::SortDirection;
use crate::sql::CompiledQuery;

/// A row whose sort key fields can be read by name.
pub trait KeysetRow {
   fn field(&self, name: &str) -> Option<&JsonValue>;
}

impl KeysetRow for IndexMap<String, JsonValue> {
   fn field(&self, name: &str) -> Option<&JsonValue> {
      self.get(name)
   }
}

impl KeysetRow for serde_json::Map<String, JsonValue> {
   fn field(&self, name: &str) -> Option<&JsonValue> {
      self.get(name)
   }
}

/// An immutable, filterable and orderable query.
///
/// Every builder method consumes the query and returns a new one, so a
/// source can be cloned at any step (the count query is derived this way)
/// without the branches affecting each other. Field names are passed through
/// as given; validating them is the caller's job.
pub trait QuerySource: Clone + Send + Sized + 'static {
   type Row: KeysetRow + Send;
   type Error: std::error::Error + Send + Sync + 'static;

   /// Append an ordering term.
   fn order_by(self, field: &str, direction: SortDirection) -> Self;

   /// Add a predicate, AND-ed with any predicates already present.
   fn filter(self, predicate: Predicate) -> Self;

   fn limit(self, limit: usize) -> Self;

   fn clear_order_by(self) -> Self;

   /// Drop any column selection.
   fn clear_select(self) -> Self;

   /// Select the number of matching rows instead of the rows themselves.
   fn select_count(self) -> Self;

   fn compile(&self) -> CompiledQuery;

   fn execute(self) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;

   /// Execute a query built with [`select_count`](Self::select_count).
   fn execute_count(self) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
