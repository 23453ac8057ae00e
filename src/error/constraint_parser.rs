use regex::Regex;
use std::sync::OnceLock;

/// Structured view of a PostgreSQL constraint violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub table: Option<String>,
    pub column: Option<String>,
    pub value: Option<String>,
}

/// Extracts table, column and offending value from PostgreSQL constraint messages.
///
/// The server reports the offending key in the DETAIL line
/// (`Key (email)=(a@x.com) already exists.`); older drivers fold it into the
/// primary message, so both are searched.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column: Regex,
    relation: Regex,
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

const CONSTRAINT_SUFFIXES: [&str; 5] = ["_pkey", "_fkey", "_key", "_check", "_not_null"];

impl ConstraintParser {
    fn patterns() -> Option<&'static Patterns> {
        PATTERNS
            .get_or_init(|| {
                Some(Patterns {
                    key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                    column: Regex::new(r#"column "([^"]+)""#).ok()?,
                    relation: Regex::new(r#"(?:relation|table) "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// Parses the pieces the driver exposes for one database error.
    ///
    /// Explicit `table`/`column` fields from the server win over anything
    /// recovered from text.
    pub fn parse(
        message: &str,
        details: Option<&str>,
        constraint: Option<&str>,
        table: Option<&str>,
        column: Option<&str>,
    ) -> ConstraintViolation {
        let text = match details {
            Some(details) => format!("{}\n{}", message, details),
            None => message.to_string(),
        };

        let (key_column, value) = match Self::key_value(&text) {
            Some((column, value)) => (Some(column), Some(value)),
            None => (None, None),
        };

        let table = table
            .map(str::to_string)
            .or_else(|| Self::relation(&text));

        let column = column
            .map(str::to_string)
            .or(key_column)
            .or_else(|| Self::column(&text))
            .or_else(|| {
                constraint.and_then(|name| Self::column_from_constraint(name, table.as_deref()))
            });

        ConstraintViolation {
            table,
            column,
            value,
        }
    }

    /// Recovers the column from a conventionally named constraint
    /// (`users_email_key`, `user_film_film_id_fkey`).
    pub fn column_from_constraint(constraint: &str, table: Option<&str>) -> Option<String> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let column = match table {
            Some(table) => stem.strip_prefix(table)?.strip_prefix('_')?,
            None => stem.split_once('_')?.1,
        };
        (!column.is_empty()).then(|| column.to_string())
    }

    pub fn key_value(text: &str) -> Option<(String, String)> {
        let caps = Self::patterns()?.key_value.captures(text)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    fn column(text: &str) -> Option<String> {
        let caps = Self::patterns()?.column.captures(text)?;
        Some(caps.get(1)?.as_str().to_string())
    }

    fn relation(text: &str) -> Option<String> {
        let caps = Self::patterns()?.relation.captures(text)?;
        Some(caps.get(1)?.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_from_details() {
        let parsed = ConstraintParser::parse(
            "duplicate key value violates unique constraint \"users_email_key\"",
            Some("Key (email)=(a@x.com) already exists."),
            Some("users_email_key"),
            Some("users"),
            None,
        );
        assert_eq!(parsed.table.as_deref(), Some("users"));
        assert_eq!(parsed.column.as_deref(), Some("email"));
        assert_eq!(parsed.value.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_foreign_key_violation_in_message_only() {
        let parsed = ConstraintParser::parse(
            "insert or update on table \"user_film\" violates foreign key constraint \"user_film_film_id_fkey\"\nDETAIL: Key (film_id)=(f-9) is not present in table \"films\".",
            None,
            Some("user_film_film_id_fkey"),
            None,
            None,
        );
        assert_eq!(parsed.table.as_deref(), Some("user_film"));
        assert_eq!(parsed.column.as_deref(), Some("film_id"));
        assert_eq!(parsed.value.as_deref(), Some("f-9"));
    }

    #[test]
    fn test_not_null_violation_uses_column_pattern() {
        let parsed = ConstraintParser::parse(
            "null value in column \"title\" of relation \"films\" violates not-null constraint",
            None,
            None,
            None,
            None,
        );
        assert_eq!(parsed.table.as_deref(), Some("films"));
        assert_eq!(parsed.column.as_deref(), Some("title"));
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn test_column_from_constraint_with_known_table() {
        assert_eq!(
            ConstraintParser::column_from_constraint("user_film_film_id_fkey", Some("user_film")),
            Some("film_id".to_string())
        );
        assert_eq!(
            ConstraintParser::column_from_constraint("films_rating_check", Some("films")),
            Some("rating".to_string())
        );
        assert_eq!(
            ConstraintParser::column_from_constraint("films_rating_check", Some("users")),
            None
        );
    }

    #[test]
    fn test_column_from_constraint_without_table() {
        assert_eq!(
            ConstraintParser::column_from_constraint("users_email_key", None),
            Some("email".to_string())
        );
        assert_eq!(ConstraintParser::column_from_constraint("users_idx", None), None);
        assert_eq!(ConstraintParser::column_from_constraint("users_key", None), None);
    }

    #[test]
    fn test_unrelated_message_yields_empty_violation() {
        let parsed = ConstraintParser::parse("connection reset by peer", None, None, None, None);
        assert_eq!(parsed, ConstraintViolation::default());
    }
}
