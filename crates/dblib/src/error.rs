//! Error types for dblib

use thiserror::Error;

/// Result type alias for dblib operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection or select-database failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// An operation was attempted without an established connection
    #[error("Not connected to the database")]
    NotConnected,

    /// The driver rejected a query
    #[error("Query error in context \"{context}\": {message}")]
    Query { context: String, message: String },

    /// An option fragment contained more unescaped `?` placeholders
    /// than supplied values
    #[error("Placeholder count mismatch: fragment has {expected} placeholders, {supplied} values supplied")]
    PlaceholderCount { expected: usize, supplied: usize },

    /// Malformed field, table, or join specification
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DbError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a query error for a specific operation context
    pub fn query(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a placeholder count error
    pub fn is_placeholder_count(&self) -> bool {
        matches!(self, Self::PlaceholderCount { .. })
    }

    /// Check if this is a connection-level error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::NotConnected)
    }
}
