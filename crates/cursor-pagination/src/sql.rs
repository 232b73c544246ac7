//! Dialect-neutral SQL rendering of predicates.
//!
//! Query sources backed by SQL databases share this rendering so that the
//! same [`Predicate`] compiles to the same text everywhere. Placeholders are
//! numbered `$1`, `$2`, … continuing from the parameters already bound, so a
//! predicate can be appended after any number of earlier bind values.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::predicate::Predicate;

/// A compiled, not-yet-executed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
   pub sql: String,
   pub parameters: Vec<JsonValue>,
}

/// Quote an identifier with double quotes.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
pub fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render `predicate`, pushing its bind values onto `parameters`.
pub fn write_predicate(predicate: &Predicate, parameters: &mut Vec<JsonValue>) -> String {
   match predicate {
      Predicate::Compare { field, op, value } => {
         parameters.push(value.clone());
         format!(
            "{} {} ${}",
            quote_identifier(field),
            op.as_sql(),
            parameters.len()
         )
      }
      Predicate::And(parts) => write_group(parts, " and ", parameters),
      Predicate::Or(parts) => write_group(parts, " or ", parameters),
   }
}

/// Render a list of predicates joined by `and`, as used for a `where` clause
/// holding several independent filters.
pub fn write_conjunction(predicates: &[Predicate], parameters: &mut Vec<JsonValue>) -> String {
   predicates
      .iter()
      .map(|p| write_predicate(p, parameters))
      .collect::<Vec<_>>()
      .join(" and ")
}

fn write_group(parts: &[Predicate], separator: &str, parameters: &mut Vec<JsonValue>) -> String {
   match parts {
      // Empty AND is true, empty OR is false
      [] if separator == " and " => "1 = 1".to_string(),
      [] => "1 = 0".to_string(),
      [single] => write_predicate(single, parameters),
      _ => {
         let rendered: Vec<String> = parts
            .iter()
            .map(|p| write_predicate(p, parameters))
            .collect();
         format!("({})", rendered.join(separator))
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::predicate::{ComparisonOp, build_lexicographic_predicate};
   use crate::sort_key::{SortField, SortKeySpec};
   use serde_json::json;

   #[test]
   fn quote_identifier_simple() {
      assert_eq!(quote_identifier("id"), r#""id""#);
      assert_eq!(quote_identifier("t.id"), r#""t.id""#);
      assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
   }

   #[test]
   fn one_field_compiles_to_plain_comparison() {
      let spec = SortKeySpec::new(vec![SortField::integer("id")]).unwrap();
      let predicate = build_lexicographic_predicate(&spec, &[json!(1)], ComparisonOp::Gt).unwrap();

      let mut params = Vec::new();
      let sql = write_predicate(&predicate, &mut params);

      assert_eq!(sql, r#""id" > $1"#);
      assert_eq!(params, vec![json!(1)]);
   }

   #[test]
   fn two_fields_compile_to_expanded_form() {
      let spec =
         SortKeySpec::new(vec![SortField::integer("id"), SortField::timestamp("createdAt")])
            .unwrap();
      let d = json!("2024-05-01T12:00:00Z");
      let predicate =
         build_lexicographic_predicate(&spec, &[json!(1), d.clone()], ComparisonOp::Gt).unwrap();

      let mut params = Vec::new();
      let sql = write_predicate(&predicate, &mut params);

      assert_eq!(sql, r#"("id" > $1 or ("createdAt" > $2 and "id" = $3))"#);
      assert_eq!(params, vec![json!(1), d, json!(1)]);
   }

   #[test]
   fn three_fields_compile_to_expanded_form() {
      let spec = SortKeySpec::new(vec![
         SortField::text("a"),
         SortField::integer("b"),
         SortField::integer("c"),
      ])
      .unwrap();
      let predicate = build_lexicographic_predicate(
         &spec,
         &[json!("x"), json!(2), json!(3)],
         ComparisonOp::Lt,
      )
      .unwrap();

      let mut params = Vec::new();
      let sql = write_predicate(&predicate, &mut params);

      assert_eq!(
         sql,
         r#"("a" < $1 or ("b" < $2 and "a" = $3) or ("c" < $4 and "a" = $5 and "b" = $6))"#
      );
      assert_eq!(
         params,
         vec![json!("x"), json!(2), json!("x"), json!(3), json!("x"), json!(2)]
      );
   }

   #[test]
   fn placeholders_continue_after_existing_parameters() {
      let mut params = vec![json!("owner-1")];
      let sql = write_conjunction(
         &[Predicate::compare("id", ComparisonOp::Gt, 10)],
         &mut params,
      );

      assert_eq!(sql, r#""id" > $2"#);
      assert_eq!(params, vec![json!("owner-1"), json!(10)]);
   }

   #[test]
   fn conjunction_joins_filters() {
      let mut params = Vec::new();
      let sql = write_conjunction(
         &[
            Predicate::eq("owner_id", "u1"),
            Predicate::or(vec![
               Predicate::compare("id", ComparisonOp::Gt, 1),
               Predicate::compare("id", ComparisonOp::Lt, 0),
            ]),
         ],
         &mut params,
      );

      assert_eq!(sql, r#""owner_id" = $1 and ("id" > $2 or "id" < $3)"#);
      assert_eq!(params.len(), 3);
   }
}
