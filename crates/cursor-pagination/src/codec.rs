//! Cursor encoding.
//!
//! A cursor is an opaque string standing for a row's position in a sort
//! order. The engine never looks inside it; it only asks a [`CursorCodec`] to
//! turn a row's sort key values into a string and back. Codecs are passed per
//! call, so different collections can use different formats.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;

use crate::sort_key::SortKeySpec;
use crate::{Error, Result};

/// Reversible mapping between sort key values and opaque cursor strings.
///
/// Implementations must satisfy `decode(encode(values, spec), spec) == values`
/// for every projection of a row onto `spec`.
pub trait CursorCodec: Send + Sync {
   /// Encode the projection of a row onto `spec`.
   ///
   /// Values the codec cannot represent are an [`Error::CursorEncoding`].
   fn encode(&self, values: &[JsonValue], spec: &SortKeySpec) -> Result<String>;

   /// Decode a cursor back into one value per field of `spec`.
   ///
   /// Malformed input must produce a client error
   /// ([`Error::InvalidCursor`] or [`Error::CursorLengthMismatch`]).
   fn decode(&self, cursor: &str, spec: &SortKeySpec) -> Result<Vec<JsonValue>>;
}

/// URL-safe base64 of a JSON array holding the sort key values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBase64Codec;

impl CursorCodec for JsonBase64Codec {
   fn encode(&self, values: &[JsonValue], _spec: &SortKeySpec) -> Result<String> {
      let json = serde_json::to_vec(values).map_err(|e| Error::CursorEncoding(e.to_string()))?;
      Ok(URL_SAFE_NO_PAD.encode(json))
   }

   fn decode(&self, cursor: &str, spec: &SortKeySpec) -> Result<Vec<JsonValue>> {
      let bytes = URL_SAFE_NO_PAD
         .decode(cursor.trim())
         .map_err(|e| Error::InvalidCursor(format!("not base64: {e}")))?;

      let values: Vec<JsonValue> = serde_json::from_slice(&bytes)
         .map_err(|e| Error::InvalidCursor(format!("not a JSON array: {e}")))?;

      check_values(&values, spec)?;
      Ok(values)
   }
}

/// Validate decoded values against the sort key: one value per field, each
/// of the field's declared type.
pub fn check_values(values: &[JsonValue], spec: &SortKeySpec) -> Result<()> {
   if values.len() != spec.len() {
      return Err(Error::CursorLengthMismatch {
         cursor_len: values.len(),
         keyset_len: spec.len(),
      });
   }

   for (field, value) in spec.fields().iter().zip(values) {
      if !field.accepts(value) {
         return Err(Error::InvalidCursor(format!(
            "value {value} is not a valid {:?} for '{}'",
            field.field_type, field.name
         )));
      }
   }

   Ok(())
}
