//! Identifier quoting and literal escaping.
//!
//! The quoting contract here is the legacy one, preserved for
//! compatibility: every word-character run is wrapped in backticks, runs
//! of backticks collapse so pre-quoted segments are not double-wrapped,
//! the keyword `AS` is restored unquoted, and a backtick adjacent to a
//! single-quote delimiter collapses to the quote so raw string literals
//! survive inside field/table strings. It is a pattern rewrite, not a
//! parser; it cannot tell function names from columns.

use std::sync::LazyLock;

use regex::Regex;

use crate::codec::Codec;
use crate::conn::Connection;
use crate::value::Value;

static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static regex"));
static BACKTICK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`+").expect("static regex"));
static QUOTED_AS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)`AS`").expect("static regex"));
static LITERAL_EDGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'`|`'").expect("static regex"));

/// Driver-supplied string escaping, the one piece of the escaper that
/// is dialect-specific.
pub trait DriverEscape {
    /// Escape a raw string for use inside a single-quoted literal.
    fn escape_str(&self, raw: &str) -> String;
}

impl<C: Connection> DriverEscape for C {
    fn escape_str(&self, raw: &str) -> String {
        self.escape(raw)
    }
}

/// Turns raw values into SQL-safe literals and identifiers.
///
/// Borrows the collaborator's escape routine and the configured codec;
/// constructed per call by the executor.
pub struct Escaper<'a> {
    driver: &'a dyn DriverEscape,
    codec: &'a dyn Codec,
    strip_enabled: bool,
}

impl<'a> Escaper<'a> {
    pub fn new(driver: &'a dyn DriverEscape, codec: &'a dyn Codec, strip_enabled: bool) -> Self {
        Self {
            driver,
            codec,
            strip_enabled,
        }
    }

    /// Quote every identifier-like token in a field/table expression.
    ///
    /// Idempotent on its own output for word-run inputs: re-quoting a
    /// quoted statement collapses the doubled backticks away.
    pub fn quote_fields(&self, stmt: &str) -> String {
        let wrapped = WORD_RUN.replace_all(stmt, "`$0`");
        let collapsed = BACKTICK_RUN.replace_all(&wrapped, "`");
        let with_as = QUOTED_AS.replace_all(&collapsed, "AS");
        LITERAL_EDGE.replace_all(&with_as, "'").into_owned()
    }

    /// Render a scalar as a SQL literal.
    ///
    /// `Null` and the legacy `'NULL'` text marker render as unquoted
    /// `NULL`; every other scalar is codec-prepped, driver-escaped
    /// (unless stripping is disabled), and single-quoted. Lists and
    /// maps render as comma-joined literals of their values, which
    /// makes a list bound to a placeholder usable inside `IN (?)`.
    pub fn escape_literal(&self, value: &Value) -> String {
        match value {
            Value::List(items) => items
                .iter()
                .map(|v| self.escape_literal(v))
                .collect::<Vec<_>>()
                .join(", "),
            Value::Map(entries) => entries
                .iter()
                .map(|(_, v)| self.escape_literal(v))
                .collect::<Vec<_>>()
                .join(", "),
            v if v.is_null() => "NULL".to_string(),
            v => {
                let prepped = self.codec.encode(&v.text_form());
                let escaped = if self.strip_enabled {
                    self.driver.escape_str(&prepped)
                } else {
                    prepped
                };
                format!("'{escaped}'")
            }
        }
    }

    /// Apply the literal transform to a value, preserving its shape.
    ///
    /// Scalars become their rendered literal text; list and map values
    /// are penetrated recursively to arbitrary depth. Map keys are not
    /// escaped, only codec-prepped.
    pub fn escape_value(&self, value: &Value) -> Value {
        match value {
            Value::List(items) => {
                Value::List(items.iter().map(|v| self.escape_value(v)).collect())
            }
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (self.codec.encode(k), self.escape_value(v)))
                    .collect(),
            ),
            scalar => Value::Text(self.escape_literal(scalar)),
        }
    }
}
