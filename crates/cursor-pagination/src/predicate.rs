//! Predicate algebra and the lexicographic cursor predicate.
//!
//! A single `WHERE col > v` cannot seek past a position in a multi-column
//! ordering, and row-value comparison (`(a, b) > (?, ?)`) is not portable.
//! The tuple comparison `(c1, ..., cn) CMP (v1, ..., vn)` is therefore
//! expanded into an OR of increasingly specific AND clauses:
//!
//! ```text
//! c1 CMP v1
//! OR (c2 CMP v2 AND c1 = v1)
//! OR (c3 CMP v3 AND c1 = v1 AND c2 = v2)
//! ...
//! ```

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::sort_key::SortKeySpec;
use crate::{Error, Result};

/// Comparison operator used in a [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOp {
   Gt,
   Lt,
   Eq,
}

impl ComparisonOp {
   pub fn as_sql(self) -> &'static str {
      match self {
         ComparisonOp::Gt => ">",
         ComparisonOp::Lt => "<",
         ComparisonOp::Eq => "=",
      }
   }
}

/// Boolean expression over named fields, composable by any query source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
   Compare {
      field: String,
      op: ComparisonOp,
      value: JsonValue,
   },
   And(Vec<Predicate>),
   Or(Vec<Predicate>),
}

impl Predicate {
   pub fn compare(field: impl Into<String>, op: ComparisonOp, value: impl Into<JsonValue>) -> Self {
      Predicate::Compare {
         field: field.into(),
         op,
         value: value.into(),
      }
   }

   pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      Self::compare(field, ComparisonOp::Eq, value)
   }

   pub fn and(predicates: Vec<Predicate>) -> Self {
      Predicate::And(predicates)
   }

   pub fn or(predicates: Vec<Predicate>) -> Self {
      Predicate::Or(predicates)
   }
}

/// Build the predicate selecting every row strictly beyond `cursor_values`
/// in the direction of `comparator`.
///
/// For index `i`, the clause is `field_i CMP value_i` AND-ed with equality on
/// every field before `i`; the result is the OR of all clauses. A one-field
/// key degenerates to a bare comparison.
pub fn build_lexicographic_predicate(
   spec: &SortKeySpec,
   cursor_values: &[JsonValue],
   comparator: ComparisonOp,
) -> Result<Predicate> {
   if comparator == ComparisonOp::Eq {
      return Err(Error::InvalidComparator(comparator.as_sql()));
   }
   if cursor_values.len() != spec.len() {
      return Err(Error::CursorLengthMismatch {
         cursor_len: cursor_values.len(),
         keyset_len: spec.len(),
      });
   }

   let fields = spec.fields();
   let mut clauses = Vec::with_capacity(fields.len());

   for (level, field) in fields.iter().enumerate() {
      let seek = Predicate::compare(&field.name, comparator, cursor_values[level].clone());

      if level == 0 {
         clauses.push(seek);
         continue;
      }

      let mut parts = Vec::with_capacity(level + 1);
      parts.push(seek);
      for (prior, value) in fields[..level].iter().zip(cursor_values) {
         parts.push(Predicate::eq(&prior.name, value.clone()));
      }
      clauses.push(Predicate::and(parts));
   }

   if clauses.len() == 1 {
      return Ok(clauses.remove(0));
   }

   Ok(Predicate::or(clauses))
}
