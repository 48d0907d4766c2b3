//! Statement assembly for SELECT clauses and joins.
//!
//! Field and table specifications come in as a [`Spec`] (one expression
//! or a list), get identifier-quoted through the [`Escaper`], and are
//! joined with `", "`. Join clauses render one per line with the local
//! and foreign columns quoted and the comparison operator passed
//! through verbatim.

use crate::escape::Escaper;

/// A field or table specification: a single expression or a list.
///
/// Each element may itself be a compound expression (`name AS n`,
/// `t1.id`); quoting happens per word run inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    One(String),
    Many(Vec<String>),
}

impl Spec {
    /// Borrow the elements as a slice-like iterator.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: Vec<&str> = match self {
            Spec::One(s) => vec![s.as_str()],
            Spec::Many(items) => items.iter().map(String::as_str).collect(),
        };
        items.into_iter()
    }
}

impl From<&str> for Spec {
    fn from(s: &str) -> Self {
        Spec::One(s.to_string())
    }
}

impl From<String> for Spec {
    fn from(s: String) -> Self {
        Spec::One(s)
    }
}

impl From<Vec<String>> for Spec {
    fn from(items: Vec<String>) -> Self {
        Spec::Many(items)
    }
}

impl From<Vec<&str>> for Spec {
    fn from(items: Vec<&str>) -> Self {
        Spec::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Spec {
    fn from(items: &[&str]) -> Self {
        Spec::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Spec {
    fn from(items: [&str; N]) -> Self {
        Spec::Many(items.into_iter().map(str::to_string).collect())
    }
}

/// Join flavour, rendered as the SQL keyword before `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
    Cross,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Outer => "OUTER",
            JoinKind::Cross => "CROSS",
        }
    }
}

/// One join clause: kind, joined table, and the ON comparison.
///
/// The operator defaults to `=` and is emitted verbatim, so expressions
/// like `>=` or `<=>` work; the two column sides are identifier-quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub local: String,
    pub foreign: String,
    pub op: Option<String>,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        table: impl Into<String>,
        local: impl Into<String>,
        foreign: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            local: local.into(),
            foreign: foreign.into(),
            op: None,
        }
    }

    /// Override the ON comparison operator (default `=`).
    pub fn op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }
}

/// Render a field specification as a quoted SELECT list.
pub fn build_select(escaper: &Escaper<'_>, fields: &Spec) -> String {
    join_quoted(escaper, fields)
}

/// Render a table specification as a quoted FROM list.
pub fn build_from(escaper: &Escaper<'_>, tables: &Spec) -> String {
    join_quoted(escaper, tables)
}

fn join_quoted(escaper: &Escaper<'_>, spec: &Spec) -> String {
    match spec {
        Spec::One(s) => escaper.quote_fields(s),
        Spec::Many(items) => items
            .iter()
            .map(|s| escaper.quote_fields(s))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Render join clauses, one per line, each starting on a new line.
///
/// Empty input renders as the empty string so the caller can append
/// unconditionally.
pub fn build_join(escaper: &Escaper<'_>, joins: &[Join]) -> String {
    let mut out = String::new();
    for join in joins {
        out.push('\n');
        out.push_str(join.kind.as_str());
        out.push_str(" JOIN ");
        out.push_str(&escaper.quote_fields(&join.table));
        out.push_str(" ON ");
        out.push_str(&escaper.quote_fields(&join.local));
        out.push(' ');
        out.push_str(join.op.as_deref().unwrap_or("="));
        out.push(' ');
        out.push_str(&escaper.quote_fields(&join.foreign));
    }
    out
}
