//! Builds statements in dry-run mode and prints the captured SQL.
//!
//! Run with `cargo run --example dry_run`.

use dblib::{
    ConnectParams, Connection, Db, DbConfig, DbResult, ExecResult, Join, JoinKind, Row, Value,
    Values,
};

/// A stand-in driver: never talks to a server, escapes MySQL-style.
struct OfflineDriver;

impl Connection for OfflineDriver {
    fn connect(&mut self, _params: &ConnectParams) -> DbResult<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn close(&mut self) {}

    fn execute(&mut self, _sql: &str) -> DbResult<ExecResult> {
        Ok(ExecResult::Affected(0))
    }

    fn escape(&self, raw: &str) -> String {
        raw.replace('\\', r"\\").replace('\'', r"\'")
    }

    fn last_insert_id(&self) -> u64 {
        0
    }
}

fn main() -> DbResult<()> {
    let config = DbConfig::default().capture_queries(true);
    let mut db = Db::with_config(OfflineDriver, config);

    db.insert_row(
        "news",
        &Row::new()
            .with("subject", "It's alive")
            .with("content", "First post")
            .with("published_at", Value::Null),
    )?;

    db.fetch_fields(
        vec!["id", "subject AS title"],
        "news",
        "WHERE subject = ?",
        "It's alive",
    )?;

    let joins = [Join::new(
        JoinKind::Left,
        "users",
        "news.author_id",
        "users.id",
    )];
    db.fetch_joined_rows("news", &joins, "ORDER BY news.id DESC", Values::None)?;

    db.update_rows(
        "news",
        &Row::new().with("subject", "Renamed"),
        "WHERE id = ?",
        1i64,
    )?;

    db.delete_rows("news", "WHERE id = ?", 1i64)?;

    for sql in db.captured_queries() {
        println!("{sql}\n");
    }
    Ok(())
}
