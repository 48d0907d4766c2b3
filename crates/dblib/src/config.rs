//! Executor configuration.

use serde::Deserialize;

/// Behaviour toggles for [`Db`](crate::Db).
///
/// The defaults match the safe legacy configuration: driver escaping
/// on, verbose error detail off, connection left open on drop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Run driver escaping over literals. Turning this off is only
    /// sane when the host guarantees pre-escaped input.
    pub strip_enabled: bool,
    /// Include SQL text and driver detail in reported errors.
    pub debug: bool,
    /// Close the connection when the executor is dropped.
    pub auto_close: bool,
    /// Capture built SQL instead of executing it (dry-run).
    pub capture_queries: bool,
    /// Reserved result-cache toggle; not consulted by the engine.
    pub caching: bool,
    /// Address surfaced in operator-facing error reports.
    pub admin_email: Option<String>,
    /// Separator used when flattening joined rows to prefixed columns.
    pub table_separator: char,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            strip_enabled: true,
            debug: false,
            auto_close: false,
            capture_queries: false,
            caching: true,
            admin_email: None,
            table_separator: '|',
        }
    }
}

impl DbConfig {
    pub fn strip_enabled(mut self, on: bool) -> Self {
        self.strip_enabled = on;
        self
    }

    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    pub fn auto_close(mut self, on: bool) -> Self {
        self.auto_close = on;
        self
    }

    pub fn capture_queries(mut self, on: bool) -> Self {
        self.capture_queries = on;
        self
    }

    pub fn caching(mut self, on: bool) -> Self {
        self.caching = on;
        self
    }

    pub fn admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self
    }

    pub fn table_separator(mut self, sep: char) -> Self {
        self.table_separator = sep;
        self
    }
}
