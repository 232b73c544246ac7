//! In-memory `QuerySource` used by the integration tests.
//!
//! Evaluates predicates with SQL semantics (any comparison involving NULL is
//! false) and compiles to the same SQL shape as the SQLite source, so tests
//! can assert both on the rows returned and on the generated text.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use cursor_pagination::sql::{quote_identifier, write_conjunction};
use cursor_pagination::{CompiledQuery, ComparisonOp, Predicate, QuerySource, SortDirection};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

pub type Row = IndexMap<String, JsonValue>;

#[derive(Debug, thiserror::Error)]
#[error("memory source unavailable")]
pub struct Unavailable;

#[derive(Clone)]
pub struct MemorySource {
   table: String,
   rows: Arc<Vec<Row>>,
   filters: Vec<Predicate>,
   order: Vec<(String, SortDirection)>,
   limit: Option<usize>,
   count: bool,
   round_trips: Arc<AtomicUsize>,
   failing: bool,
}

impl MemorySource {
   pub fn new(table: &str, rows: Vec<Row>) -> Self {
      Self {
         table: table.to_string(),
         rows: Arc::new(rows),
         filters: Vec::new(),
         order: Vec::new(),
         limit: None,
         count: false,
         round_trips: Arc::new(AtomicUsize::new(0)),
         failing: false,
      }
   }

   /// Make every execution fail.
   pub fn failing(mut self) -> Self {
      self.failing = true;
      self
   }

   /// Number of executed queries across every clone of this source.
   pub fn round_trips(&self) -> usize {
      self.round_trips.load(AtomicOrdering::SeqCst)
   }

   fn matching_rows(&self) -> Result<Vec<Row>, Unavailable> {
      self.round_trips.fetch_add(1, AtomicOrdering::SeqCst);
      if self.failing {
         return Err(Unavailable);
      }

      let mut rows: Vec<Row> = self
         .rows
         .iter()
         .filter(|row| self.filters.iter().all(|p| evaluate(p, row)))
         .cloned()
         .collect();

      rows.sort_by(|a, b| {
         for (field, direction) in &self.order {
            let ord = compare_json(&a[field.as_str()], &b[field.as_str()]).unwrap_or(Ordering::Equal);
            let ord = match direction {
               SortDirection::Asc => ord,
               SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
               return ord;
            }
         }
         Ordering::Equal
      });

      if let Some(limit) = self.limit {
         rows.truncate(limit);
      }
      Ok(rows)
   }
}

impl QuerySource for MemorySource {
   type Row = Row;
   type Error = Unavailable;

   fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
      self.order.push((field.to_string(), direction));
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
      self.order.clear();
      self
   }

   fn clear_select(self) -> Self {
      self
   }

   fn select_count(mut self) -> Self {
      self.count = true;
      self
   }

   fn compile(&self) -> CompiledQuery {
      let mut parameters = Vec::new();
      let projection = if self.count { "1" } else { "*" };
      let mut sql = format!(
         "select {} from {}",
         projection,
         quote_identifier(&self.table)
      );

      if !self.filters.is_empty() {
         sql.push_str(" where ");
         sql.push_str(&write_conjunction(&self.filters, &mut parameters));
      }
      if !self.order.is_empty() {
         let terms: Vec<String> = self
            .order
            .iter()
            .map(|(f, d)| format!("{} {}", quote_identifier(f), d.as_sql()))
            .collect();
         sql.push_str(" order by ");
         sql.push_str(&terms.join(", "));
      }
      if let Some(limit) = self.limit {
         sql.push_str(&format!(" limit {limit}"));
      }
      if self.count {
         sql = format!("select count(*) as \"count\" from ({sql})");
      }

      CompiledQuery { sql, parameters }
   }

   async fn execute(self) -> Result<Vec<Row>, Unavailable> {
      self.matching_rows()
   }

   async fn execute_count(self) -> Result<u64, Unavailable> {
      Ok(self.matching_rows()?.len() as u64)
   }
}

fn compare_json(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
   match (a, b) {
      (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
         (Some(x), Some(y)) => Some(x.cmp(&y)),
         _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
      },
      (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
      (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
      _ => None,
   }
}

fn evaluate(predicate: &Predicate, row: &Row) -> bool {
   match predicate {
      Predicate::Compare { field, op, value } => {
         let Some(actual) = row.get(field) else {
            return false;
         };
         match (compare_json(actual, value), op) {
            (Some(Ordering::Greater), ComparisonOp::Gt) => true,
            (Some(Ordering::Less), ComparisonOp::Lt) => true,
            (Some(Ordering::Equal), ComparisonOp::Eq) => true,
            _ => false,
         }
      }
      Predicate::And(parts) => parts.iter().all(|p| evaluate(p, row)),
      Predicate::Or(parts) => parts.iter().any(|p| evaluate(p, row)),
   }
}

/// Build a row from `(column, value)` pairs.
pub fn row(pairs: &[(&str, JsonValue)]) -> Row {
   pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.clone()))
      .collect()
}
