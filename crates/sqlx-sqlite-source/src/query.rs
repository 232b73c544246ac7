//! Immutable SELECT builder implementing [`QuerySource`].

use std::sync::Arc;

use cursor_pagination::sql::{quote_identifier, write_conjunction};
use cursor_pagination::{CompiledQuery, Predicate, QuerySource, SortDirection};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::Row;
use tracing::debug;

use crate::database::SqliteDatabase;
use crate::decode::{bind_value, decode_rows};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
   All,
   Columns(Vec<String>),
   Count,
}

/// A SELECT against one table, built up by value.
///
/// Every method consumes the builder and returns a new one; clones are
/// independent, so a base query can be shared between a page query and its
/// count query.
///
/// Compiles to lowercase SQL with `$n` placeholders:
///
/// ```text
/// select "id", "title" from "notes" where "owner_id" = $1 order by "created_at" asc limit 11
/// select count(*) as "count" from (select 1 from "notes" where "owner_id" = $1 limit 5000)
/// ```
#[derive(Debug, Clone)]
pub struct SqliteQuery {
   db: Arc<SqliteDatabase>,
   table: String,
   selection: Selection,
   filters: Vec<Predicate>,
   order_by: Vec<(String, SortDirection)>,
   limit: Option<usize>,
}

impl SqliteQuery {
   pub(crate) fn new(db: Arc<SqliteDatabase>, table: &str) -> Self {
      Self {
         db,
         table: table.to_string(),
         selection: Selection::All,
         filters: Vec::new(),
         order_by: Vec::new(),
         limit: None,
      }
   }

   /// Select only the given columns.
   pub fn select(mut self, columns: &[&str]) -> Self {
      self.selection = Selection::Columns(columns.iter().map(|c| c.to_string()).collect());
      self
   }

   fn bind_all(
      compiled: &CompiledQuery,
   ) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
      let mut q = sqlx::query(&compiled.sql);
      for value in &compiled.parameters {
         q = bind_value(q, value.clone());
      }
      q
   }
}

impl QuerySource for SqliteQuery {
   type Row = IndexMap<String, JsonValue>;
   type Error = Error;

   fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
      self.order_by.push((field.to_string(), direction));
      self
   }

   fn filter(mut self, predicate: Predicate) -> Self {
      self.filters.push(predicate);
      self
   }

   fn limit(mut self, limit: usize) -> Self {
      self.limit = Some(limit);
      self
   }

   fn clear_order_by(mut self) -> Self {
      self.order_by.clear();
      self
   }

   fn clear_select(mut self) -> Self {
      self.selection = Selection::All;
      self
   }

   fn select_count(mut self) -> Self {
      self.selection = Selection::Count;
      self
   }

   fn compile(&self) -> CompiledQuery {
      let mut parameters = Vec::new();

      let projection = match &self.selection {
         Selection::All => "*".to_string(),
         Selection::Columns(columns) => columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", "),
         // Counted from a subquery so the limit bounds the scan
         Selection::Count => "1".to_string(),
      };

      let mut sql = format!(
         "select {} from {}",
         projection,
         quote_identifier(&self.table)
      );

      if !self.filters.is_empty() {
         sql.push_str(" where ");
         sql.push_str(&write_conjunction(&self.filters, &mut parameters));
      }

      if !self.order_by.is_empty() {
         let terms: Vec<String> = self
            .order_by
            .iter()
            .map(|(field, direction)| format!("{} {}", quote_identifier(field), direction.as_sql()))
            .collect();
         sql.push_str(" order by ");
         sql.push_str(&terms.join(", "));
      }

      if let Some(limit) = self.limit {
         sql.push_str(&format!(" limit {}", limit));
      }

      if self.selection == Selection::Count {
         sql = format!("select count(*) as \"count\" from ({})", sql);
      }

      CompiledQuery { sql, parameters }
   }

   async fn execute(self) -> Result<Vec<Self::Row>> {
      let compiled = self.compile();
      debug!(sql = %compiled.sql, params = compiled.parameters.len(), "Executing query");

      let pool = self.db.read_pool()?;
      let rows = Self::bind_all(&compiled).fetch_all(pool).await?;
      decode_rows(rows)
   }

   async fn execute_count(self) -> Result<u64> {
      let compiled = self.compile();
      debug!(sql = %compiled.sql, "Executing count query");

      let pool = self.db.read_pool()?;
      let row = Self::bind_all(&compiled).fetch_one(pool).await?;
      let count: i64 = row.try_get("count")?;
      Ok(u64::try_from(count).unwrap_or_default())
   }
}
