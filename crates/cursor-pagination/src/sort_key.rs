//! Sort key definitions.
//!
//! A [`SortKeySpec`] is the ordered list of fields that together give every
//! row a unique position. The last field should be a unique column (usually
//! the primary key) so that rows sharing the leading values still have a
//! total order and cursors stay stable.
//!
//! # Example
//!
//! ```
//! use cursor_pagination::{SortField, SortKeySpec};
//!
//! let spec = SortKeySpec::new(vec![
//!    SortField::timestamp("created_at"),
//!    SortField::uuid("id"),
//! ])
//! .unwrap();
//!
//! assert_eq!(spec.len(), 2);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::source::KeysetRow;
use crate::{Error, Result};

/// Sort direction for a paginated collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   #[default]
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// Return the opposite sort direction.
   pub fn reversed(self) -> Self {
      match self {
         SortDirection::Asc => SortDirection::Desc,
         SortDirection::Desc => SortDirection::Asc,
      }
   }

   /// SQL keyword for this direction.
   pub fn as_sql(self) -> &'static str {
      match self {
         SortDirection::Asc => "asc",
         SortDirection::Desc => "desc",
      }
   }
}

/// Value type of a sort field, used to validate decoded cursor values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
   Integer,
   Float,
   Text,
   /// Stored as `0`/`1` by some databases, so both forms are accepted.
   Boolean,
   /// RFC 3339 timestamp string.
   Timestamp,
   /// Hyphenated UUID string.
   Uuid,
}

impl FieldType {
   /// Check whether a JSON value has the shape this type expects.
   pub fn accepts(self, value: &JsonValue) -> bool {
      match self {
         FieldType::Integer => value.is_i64() || value.is_u64(),
         FieldType::Float => value.is_number(),
         FieldType::Text => value.is_string(),
         FieldType::Boolean => {
            value.is_boolean() || matches!(value.as_i64(), Some(0) | Some(1))
         }
         FieldType::Timestamp => value
            .as_str()
            .is_some_and(|s| OffsetDateTime::parse(s, &Rfc3339).is_ok()),
         FieldType::Uuid => value
            .as_str()
            .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok()),
      }
   }
}

/// A single field of a sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
   /// Column name as it appears in the query result set
   pub name: String,
   pub field_type: FieldType,
   /// Whether the column may hold NULL
   #[serde(default)]
   pub nullable: bool,
}

impl SortField {
   pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
      Self {
         name: name.into(),
         field_type,
         nullable: false,
      }
   }

   pub fn integer(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Integer)
   }

   pub fn float(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Float)
   }

   pub fn text(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Text)
   }

   pub fn boolean(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Boolean)
   }

   pub fn timestamp(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Timestamp)
   }

   pub fn uuid(name: impl Into<String>) -> Self {
      Self::new(name, FieldType::Uuid)
   }

   /// Mark the field as nullable.
   ///
   /// [`SortKeySpec::new`] rejects nullable fields in every position: `>`,
   /// `<` and `=` against NULL are never true in SQL, so a NULL sort value
   /// would make the cursor predicate skip rows.
   pub fn nullable(mut self) -> Self {
      self.nullable = true;
      self
   }

   /// Check whether a decoded cursor value is valid for this field.
   pub fn accepts(&self, value: &JsonValue) -> bool {
      self.field_type.accepts(value)
   }
}

/// Validate that a field name is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_.]*`, which covers plain column
/// names, qualified names (e.g., `table.column`), and underscored identifiers.
pub fn validate_column_name(name: &str) -> Result<()> {
   let invalid = || Error::InvalidColumnName {
      name: name.to_string(),
   };

   let mut chars = name.chars();
   let first = chars.next().ok_or_else(invalid)?;
   if !first.is_ascii_alphabetic() && first != '_' {
      return Err(invalid());
   }

   for ch in chars {
      if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '.' {
         return Err(invalid());
      }
   }

   Ok(())
}

/// An ordered, non-empty list of fields forming a unique composite ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKeySpec {
   fields: Vec<SortField>,
}

impl SortKeySpec {
   /// Build a sort key, validating every field.
   pub fn new(fields: Vec<SortField>) -> Result<Self> {
      if fields.is_empty() {
         return Err(Error::EmptySortKey);
      }

      let mut seen = HashSet::with_capacity(fields.len());

      for field in &fields {
         validate_column_name(&field.name)?;

         if !seen.insert(field.name.as_str()) {
            return Err(Error::DuplicateSortField {
               field: field.name.clone(),
            });
         }
         if field.nullable {
            return Err(Error::NullableSortField {
               field: field.name.clone(),
            });
         }
      }

      Ok(Self { fields })
   }

   pub fn fields(&self) -> &[SortField] {
      &self.fields
   }

   pub fn len(&self) -> usize {
      self.fields.len()
   }

   /// Always false; kept for API symmetry with `len`.
   pub fn is_empty(&self) -> bool {
      self.fields.is_empty()
   }

   pub fn names(&self) -> impl Iterator<Item = &str> {
      self.fields.iter().map(|f| f.name.as_str())
   }

   /// Project a row onto this sort key, in field order.
   ///
   /// A NULL value is an error rather than a cursor: no cursor predicate
   /// could seek past it.
   pub fn project<R: KeysetRow + ?Sized>(&self, row: &R) -> Result<Vec<JsonValue>> {
      self
         .fields
         .iter()
         .map(|field| match row.field(&field.name) {
            None => Err(Error::CursorFieldMissing {
               field: field.name.clone(),
            }),
            Some(JsonValue::Null) => Err(Error::NullSortValue {
               field: field.name.clone(),
            }),
            Some(value) => Ok(value.clone()),
         })
         .collect()
   }
}

impl<'de> Deserialize<'de> for SortKeySpec {
   fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
   where
      D: serde::Deserializer<'de>,
   {
      let fields = Vec::<SortField>::deserialize(deserializer)?;
      SortKeySpec::new(fields).map_err(serde::de::Error::custom)
   }
}
