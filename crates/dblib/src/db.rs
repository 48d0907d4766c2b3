//! The query executor.
//!
//! [`Db`] owns a [`Connection`], builds complete SQL text through the
//! escaper and statement builder, and runs it. Every operation follows
//! the same shape: build the statement (reporting and returning any
//! builder error), then either capture it (dry-run) or execute it,
//! counting the attempt and decoding fetched rows through the codec.

use std::sync::Arc;

use crate::codec::{Codec, SlashCodec};
use crate::config::DbConfig;
use crate::conn::{ConnectParams, Connection, ExecResult};
use crate::error::{DbError, DbResult};
use crate::escape::Escaper;
use crate::report::{Reporter, TracingReporter};
use crate::stmt::{self, Join, Spec};
use crate::subst;
use crate::value::{Row, Value, Values};

/// Query executor over a host-supplied connection.
///
/// ```no_run
/// # use dblib::{ConnectParams, Db, Connection, DbResult};
/// # fn demo<C: Connection>(conn: C) -> DbResult<()> {
/// let mut db = Db::new(conn);
/// db.connect(&ConnectParams::new("localhost", "app", "secret", "appdb"))?;
/// let _row = db.fetch_row("news", "WHERE id = ?", 3i64)?;
/// # Ok(()) }
/// ```
pub struct Db<C: Connection> {
    conn: C,
    config: DbConfig,
    codec: Arc<dyn Codec>,
    reporter: Arc<dyn Reporter>,
    query_count: u64,
    captured: Vec<String>,
}

impl<C: Connection> Db<C> {
    /// Wrap a connection with the default configuration.
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, DbConfig::default())
    }

    /// Wrap a connection with an explicit configuration.
    pub fn with_config(conn: C, config: DbConfig) -> Self {
        let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter::new(config.debug));
        Self {
            conn,
            config,
            codec: Arc::new(SlashCodec),
            reporter,
            query_count: 0,
            captured: Vec::new(),
        }
    }

    /// Replace the row codec (default [`SlashCodec`]).
    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the failure reporter (default [`TracingReporter`]).
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DbConfig {
        &mut self.config
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Establish the connection. A no-op when already connected.
    pub fn connect(&mut self, params: &ConnectParams) -> DbResult<()> {
        if self.conn.is_connected() {
            return Ok(());
        }
        self.conn.connect(params).map_err(|err| {
            self.reporter.report("connect", &err.to_string(), "");
            err
        })
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// Close the connection if open.
    pub fn close(&mut self) {
        self.conn.close();
    }

    /// Auto-increment id of the last inserted row.
    pub fn insert_id(&self) -> u64 {
        self.conn.last_insert_id()
    }

    /// Number of execution attempts made so far, successful or not.
    /// Captured (dry-run) statements are not counted.
    pub fn query_count(&self) -> u64 {
        self.query_count
    }

    /// Statements captured while `capture_queries` was on, oldest first.
    pub fn captured_queries(&self) -> &[String] {
        &self.captured
    }

    /// The most recently captured statement.
    pub fn last_captured(&self) -> Option<&str> {
        self.captured.last().map(String::as_str)
    }

    /// Drop all captured statements.
    pub fn clear_captured(&mut self) {
        self.captured.clear();
    }

    // Fetch operations.

    /// Fetch a single field value from the first matching row.
    ///
    /// Returns [`Value::Null`] when no row matches.
    pub fn fetch_field(
        &mut self,
        field: &str,
        tables: impl Into<Spec>,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Value> {
        let row = self.select_one(
            "fetch_field",
            Spec::One(field.to_string()),
            tables.into(),
            &[],
            opt,
            values.into(),
        )?;
        Ok(row.first().cloned().unwrap_or(Value::Null))
    }

    /// Fetch the named fields of the first matching row.
    pub fn fetch_fields(
        &mut self,
        fields: impl Into<Spec>,
        tables: impl Into<Spec>,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Row> {
        self.select_one("fetch_fields", fields.into(), tables.into(), &[], opt, values.into())
    }

    /// Fetch the named fields of the first matching row of a join.
    pub fn fetch_joined_fields(
        &mut self,
        fields: impl Into<Spec>,
        tables: impl Into<Spec>,
        joins: &[Join],
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Row> {
        self.select_one(
            "fetch_joined_fields",
            fields.into(),
            tables.into(),
            joins,
            opt,
            values.into(),
        )
    }

    /// Fetch all columns of the first matching row.
    pub fn fetch_row(
        &mut self,
        tables: impl Into<Spec>,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Row> {
        self.select_one("fetch_row", Spec::from("*"), tables.into(), &[], opt, values.into())
    }

    /// Fetch all columns of the first matching row of a join.
    pub fn fetch_joined_row(
        &mut self,
        tables: impl Into<Spec>,
        joins: &[Join],
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Row> {
        self.select_one("fetch_joined_row", Spec::from("*"), tables.into(), joins, opt, values.into())
    }

    /// Fetch all matching rows.
    pub fn fetch_rows(
        &mut self,
        tables: impl Into<Spec>,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Vec<Row>> {
        self.select_all("fetch_rows", Spec::from("*"), tables.into(), &[], opt, values.into())
    }

    /// Fetch all matching rows of a join.
    pub fn fetch_joined_rows(
        &mut self,
        tables: impl Into<Spec>,
        joins: &[Join],
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<Vec<Row>> {
        self.select_all("fetch_joined_rows", Spec::from("*"), tables.into(), joins, opt, values.into())
    }

    /// Count the rows a `SELECT *` with this option fragment would
    /// return. Counted driver-side from the result set size.
    pub fn count_rows(
        &mut self,
        tables: impl Into<Spec>,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<u64> {
        let context = "count_rows";
        let values = values.into();
        let sql = self
            .select_sql(&Spec::from("*"), &tables.into(), &[], opt, &values, false)
            .map_err(|err| self.build_err(context, err))?;
        match self.run(context, sql)? {
            None => Ok(0),
            Some(res) => Ok(res.row_count() as u64),
        }
    }

    // Mutation operations.

    /// Insert one row. Returns the number of affected rows.
    pub fn insert_row(&mut self, table: &str, data: &Row) -> DbResult<u64> {
        self.write_row("insert_row", "INSERT", table, data)
    }

    /// Insert one row, replacing any row sharing its unique key.
    pub fn replace_row(&mut self, table: &str, data: &Row) -> DbResult<u64> {
        self.write_row("replace_row", "REPLACE", table, data)
    }

    /// Update matching rows with the given column assignments.
    pub fn update_rows(
        &mut self,
        table: &str,
        data: &Row,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<u64> {
        let context = "update_rows";
        let values = values.into();
        if data.is_empty() {
            return Err(self.build_err(context, DbError::invalid_input("update data has no columns")));
        }
        let sql = self
            .update_sql(table, data, opt, &values)
            .map_err(|err| self.build_err(context, err))?;
        match self.run(context, sql)? {
            None => Ok(0),
            Some(res) => Ok(affected(res)),
        }
    }

    /// Delete matching rows. Returns the number of affected rows.
    pub fn delete_rows(
        &mut self,
        table: &str,
        opt: &str,
        values: impl Into<Values>,
    ) -> DbResult<u64> {
        let context = "delete_rows";
        let values = values.into();
        let sql = {
            let result = {
                let escaper = self.escaper();
                subst::substitute(opt, &values, &escaper).map(|opt| {
                    let mut sql = format!("DELETE FROM {}", escaper.quote_fields(table));
                    if !opt.is_empty() {
                        sql.push(' ');
                        sql.push_str(&opt);
                    }
                    sql
                })
            };
            result.map_err(|err| self.build_err(context, err))?
        };
        match self.run(context, sql)? {
            None => Ok(0),
            Some(res) => Ok(affected(res)),
        }
    }

    /// Run a caller-written statement, with placeholder substitution.
    ///
    /// Fetched rows are codec-decoded like every other fetch.
    pub fn raw_query(&mut self, sql: &str, values: impl Into<Values>) -> DbResult<ExecResult> {
        let context = "raw_query";
        let values = values.into();
        let sql = {
            let result = {
                let escaper = self.escaper();
                subst::substitute(sql, &values, &escaper)
            };
            result.map_err(|err| self.build_err(context, err))?
        };
        match self.run(context, sql)? {
            None => Ok(ExecResult::Affected(0)),
            Some(ExecResult::Rows(rows)) => Ok(ExecResult::Rows(
                rows.into_iter().map(|r| self.decode_row(r)).collect(),
            )),
            Some(other) => Ok(other),
        }
    }

    /// Column names of a table, in definition order.
    pub fn table_columns(&mut self, table: &str) -> DbResult<Vec<String>> {
        let context = "table_columns";
        let sql = {
            let escaper = self.escaper();
            format!("SHOW COLUMNS FROM {}", escaper.quote_fields(table))
        };
        match self.run(context, sql)? {
            None => Ok(Vec::new()),
            Some(ExecResult::Rows(rows)) => Ok(rows
                .iter()
                .filter_map(|row| row.get("Field").or_else(|| row.first()))
                .filter_map(|v| v.as_text().map(str::to_string))
                .collect()),
            Some(ExecResult::Affected(_)) => Ok(Vec::new()),
        }
    }

    // Internals.

    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(&self.conn, self.codec.as_ref(), self.config.strip_enabled)
    }

    fn decode_row(&self, row: Row) -> Row {
        row.map_values(&|v| self.codec.decode_value(v))
    }

    fn build_err(&self, context: &str, err: DbError) -> DbError {
        self.reporter.report(context, &err.to_string(), "");
        err
    }

    fn select_sql(
        &self,
        fields: &Spec,
        tables: &Spec,
        joins: &[Join],
        opt: &str,
        values: &Values,
        limit_one: bool,
    ) -> DbResult<String> {
        let escaper = self.escaper();
        let mut sql = format!(
            "SELECT {} FROM {}",
            stmt::build_select(&escaper, fields),
            stmt::build_from(&escaper, tables),
        );
        sql.push_str(&stmt::build_join(&escaper, joins));
        let opt = subst::substitute(opt, values, &escaper)?;
        if !opt.is_empty() {
            sql.push(' ');
            sql.push_str(&opt);
        }
        if limit_one {
            sql.push_str(" LIMIT 1");
        }
        Ok(sql)
    }

    fn select_one(
        &mut self,
        context: &str,
        fields: Spec,
        tables: Spec,
        joins: &[Join],
        opt: &str,
        values: Values,
    ) -> DbResult<Row> {
        let sql = self
            .select_sql(&fields, &tables, joins, opt, &values, true)
            .map_err(|err| self.build_err(context, err))?;
        match self.run(context, sql)? {
            None => Ok(Row::new()),
            Some(ExecResult::Rows(rows)) => Ok(rows
                .into_iter()
                .next()
                .map(|r| self.decode_row(r))
                .unwrap_or_default()),
            Some(ExecResult::Affected(_)) => Ok(Row::new()),
        }
    }

    fn select_all(
        &mut self,
        context: &str,
        fields: Spec,
        tables: Spec,
        joins: &[Join],
        opt: &str,
        values: Values,
    ) -> DbResult<Vec<Row>> {
        let sql = self
            .select_sql(&fields, &tables, joins, opt, &values, false)
            .map_err(|err| self.build_err(context, err))?;
        match self.run(context, sql)? {
            None => Ok(Vec::new()),
            Some(ExecResult::Rows(rows)) => {
                Ok(rows.into_iter().map(|r| self.decode_row(r)).collect())
            }
            Some(ExecResult::Affected(_)) => Ok(Vec::new()),
        }
    }

    fn update_sql(&self, table: &str, data: &Row, opt: &str, values: &Values) -> DbResult<String> {
        let escaper = self.escaper();
        let sets = data
            .iter()
            .map(|(col, val)| {
                format!("{} = {}", escaper.quote_fields(col), escaper.escape_literal(val))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {}", escaper.quote_fields(table), sets);
        let opt = subst::substitute(opt, values, &escaper)?;
        if !opt.is_empty() {
            sql.push(' ');
            sql.push_str(&opt);
        }
        Ok(sql)
    }

    fn write_row(&mut self, context: &str, verb: &str, table: &str, data: &Row) -> DbResult<u64> {
        if data.is_empty() {
            return Err(self.build_err(context, DbError::invalid_input("row has no columns")));
        }
        let sql = {
            let escaper = self.escaper();
            let cols = data
                .columns()
                .map(|c| escaper.quote_fields(c))
                .collect::<Vec<_>>()
                .join(", ");
            let vals = data
                .iter()
                .map(|(_, v)| escaper.escape_literal(v))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{verb} INTO {} ({cols}) VALUES ({vals})",
                escaper.quote_fields(table)
            )
        };
        match self.run(context, sql)? {
            None => Ok(0),
            Some(res) => Ok(affected(res)),
        }
    }

    /// Capture or execute one built statement.
    ///
    /// `Ok(None)` means the statement was captured instead of executed.
    fn run(&mut self, context: &str, sql: String) -> DbResult<Option<ExecResult>> {
        if self.config.capture_queries {
            self.captured.push(sql);
            return Ok(None);
        }
        tracing::debug!(target: "dblib.sql", context, sql = %sql, "executing");
        self.query_count += 1;
        match self.conn.execute(&sql) {
            Ok(res) => Ok(Some(res)),
            Err(err) => {
                let detail = match &err {
                    DbError::Query { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                self.reporter.report(context, &detail, &sql);
                Err(DbError::query(context, detail))
            }
        }
    }
}

fn affected(res: ExecResult) -> u64 {
    match res {
        ExecResult::Affected(n) => n,
        ExecResult::Rows(rows) => rows.len() as u64,
    }
}

impl<C: Connection> Drop for Db<C> {
    fn drop(&mut self) {
        if self.config.auto_close {
            self.conn.close();
        }
    }
}
