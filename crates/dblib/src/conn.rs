//! The collaborator connection seam.
//!
//! The engine never speaks a wire protocol itself; it hands finished SQL
//! text to a [`Connection`] implementation supplied by the host (a
//! driver binding, a test double, a proxy). One synchronous handle per
//! executor instance; the collaborator owns timeouts and transport
//! concerns.

use crate::error::DbResult;
use crate::value::Row;

/// Parameters for establishing a connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectParams {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectParams {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}

/// Result of executing one SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// A result set, in driver order.
    Rows(Vec<Row>),
    /// Number of rows affected by a mutation.
    Affected(u64),
}

impl ExecResult {
    /// Number of rows in the result set, 0 for mutations.
    pub fn row_count(&self) -> usize {
        match self {
            ExecResult::Rows(rows) => rows.len(),
            ExecResult::Affected(_) => 0,
        }
    }
}

/// A synchronous database connection supplied by the host.
///
/// `execute` blocks until the server answers; no retry or timeout logic
/// lives at this layer. Driver rejections surface as
/// [`DbError::Query`](crate::DbError::Query) (context filled in by the
/// executor), connect failures as
/// [`DbError::Connection`](crate::DbError::Connection).
pub trait Connection {
    /// Establish the connection. Idempotence is the caller's concern.
    fn connect(&mut self, params: &ConnectParams) -> DbResult<()>;

    /// Whether the handle is currently usable.
    fn is_connected(&self) -> bool;

    /// Close the connection if open.
    fn close(&mut self);

    /// Run one SQL statement and return its result.
    fn execute(&mut self, sql: &str) -> DbResult<ExecResult>;

    /// Driver-specific escaping of a raw string for use inside a
    /// single-quoted literal.
    fn escape(&self, raw: &str) -> String;

    /// Auto-increment id of the last inserted row.
    fn last_insert_id(&self) -> u64;
}
