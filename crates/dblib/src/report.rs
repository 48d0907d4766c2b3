//! Error reporting hooks.
//!
//! When a query fails, the executor reports the failure through a
//! [`Reporter`] before returning the error. The default reporter logs
//! via `tracing`; in debug mode the report carries the SQL text and
//! driver message, otherwise only the operation context. Hosts can
//! plug in their own reporter (paging, mail, metrics) or stack several
//! with [`CompositeReporter`].

use std::sync::Arc;

/// Receives one report per failed query.
pub trait Reporter: Send + Sync {
    /// `context` names the operation (`"fetch_rows"`, `"insert_row"`),
    /// `detail` is the driver or builder message, `sql` the statement
    /// text (empty when the failure happened before a statement was
    /// built).
    fn report(&self, context: &str, detail: &str, sql: &str);
}

/// Logs failures through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    /// Include SQL text and driver detail in the log record.
    pub verbose: bool,
}

impl TracingReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for TracingReporter {
    fn report(&self, context: &str, detail: &str, sql: &str) {
        if self.verbose {
            tracing::error!(target: "dblib", context, detail, sql, "query failed");
        } else {
            tracing::error!(target: "dblib", context, "query failed");
        }
    }
}

/// Discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _context: &str, _detail: &str, _sql: &str) {}
}

/// Fans a report out to several reporters in order.
#[derive(Clone, Default)]
pub struct CompositeReporter {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl CompositeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }
}

impl Reporter for CompositeReporter {
    fn report(&self, context: &str, detail: &str, sql: &str) {
        for reporter in &self.reporters {
            reporter.report(context, detail, sql);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Capture(Mutex<Vec<(String, String, String)>>);

    impl Reporter for Capture {
        fn report(&self, context: &str, detail: &str, sql: &str) {
            self.0
                .lock()
                .unwrap()
                .push((context.into(), detail.into(), sql.into()));
        }
    }

    #[test]
    fn composite_fans_out_in_order() {
        let first = Arc::new(Capture(Mutex::new(Vec::new())));
        let second = Arc::new(Capture(Mutex::new(Vec::new())));
        let composite = CompositeReporter::new()
            .with(first.clone() as Arc<dyn Reporter>)
            .with(second.clone() as Arc<dyn Reporter>);

        composite.report("fetch_rows", "boom", "SELECT 1");

        for capture in [&first, &second] {
            let got = capture.0.lock().unwrap();
            assert_eq!(
                got.as_slice(),
                &[("fetch_rows".into(), "boom".into(), "SELECT 1".into())]
            );
        }
    }
}
