//! Binding JSON parameters and decoding SQLite values to JSON.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, Sqlite, TypeInfo, Value, ValueRef};

use crate::{Error, Result};

/// Bind a JSON value to a SQLx query.
pub(crate) fn bind_value<'a>(
   query: Query<'a, Sqlite, SqliteArguments<'a>>,
   value: JsonValue,
) -> Query<'a, Sqlite, SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<String>),
      JsonValue::String(s) => query.bind(s),
      JsonValue::Bool(b) => query.bind(b),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64().filter(|v| *v <= i64::MAX as u64) {
            query.bind(uint_val as i64)
         } else {
            // Not an integer (or too large for SQLite's INTEGER), bind as f64
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}

/// Decode a single SQLite value to JSON.
///
/// BLOBs become standard base64 strings.
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let owned = ValueRef::to_owned(&value);
   let type_name = owned.type_info().name().to_ascii_uppercase();

   let json = match type_name.as_str() {
      "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => {
         let v: i64 = owned.try_decode_unchecked()?;
         JsonValue::from(v)
      }
      "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
         let v: f64 = owned.try_decode_unchecked()?;
         serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
      }
      "TEXT" | "DATETIME" | "DATE" | "TIME" => {
         let v: String = owned.try_decode_unchecked()?;
         JsonValue::String(v)
      }
      "BLOB" => {
         let v: Vec<u8> = owned.try_decode_unchecked()?;
         JsonValue::String(STANDARD.encode(v))
      }
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };

   Ok(json)
}

/// Decode SQLite rows to JSON objects, preserving column order.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<IndexMap<String, JsonValue>>> {
   let mut values = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::default();
      for (i, column) in row.columns().iter().enumerate() {
         let v = row.try_get_raw(i)?;
         value.insert(column.name().to_string(), to_json(v)?);
      }
      values.push(value);
   }
   Ok(values)
}
