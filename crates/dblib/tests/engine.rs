//! End-to-end tests over a scripted mock connection.
//!
//! The mock records every executed statement and answers from a queue,
//! so each test asserts both the exact SQL text the engine built and
//! the decoded result it returned.

use std::collections::VecDeque;

use pretty_assertions::assert_eq;

use dblib::{
    ConnectParams, Connection, Db, DbConfig, DbError, DbResult, ExecResult, Join, JoinKind, Row,
    Value, Values,
};

#[derive(Default)]
struct MockConnection {
    connected: bool,
    connect_calls: usize,
    responses: VecDeque<DbResult<ExecResult>>,
    log: Vec<String>,
    insert_id: u64,
}

impl MockConnection {
    fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    fn respond(mut self, response: DbResult<ExecResult>) -> Self {
        self.responses.push_back(response);
        self
    }
}

impl Connection for MockConnection {
    fn connect(&mut self, _params: &ConnectParams) -> DbResult<()> {
        self.connect_calls += 1;
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) {
        self.connected = false;
    }

    fn execute(&mut self, sql: &str) -> DbResult<ExecResult> {
        self.log.push(sql.to_string());
        self.responses
            .pop_front()
            .unwrap_or(Ok(ExecResult::Affected(0)))
    }

    fn escape(&self, raw: &str) -> String {
        raw.replace('\\', r"\\").replace('\'', r"\'")
    }

    fn last_insert_id(&self) -> u64 {
        self.insert_id
    }
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().map(|(c, v)| (*c, *v)).collect()
}

#[test]
fn insert_then_fetch_field_round_trip() {
    let conn = MockConnection::connected()
        .respond(Ok(ExecResult::Affected(1)))
        .respond(Ok(ExecResult::Rows(vec![row(&[("content", "Test Two")])])));
    let mut db = Db::new(conn);

    let data = Row::new()
        .with("subject", "Test One")
        .with("content", "Test Two");
    assert_eq!(db.insert_row("news", &data).unwrap(), 1);

    let value = db
        .fetch_field("content", "news", "WHERE subject = ?", "Test One")
        .unwrap();
    assert_eq!(value, Value::Text("Test Two".into()));

    assert_eq!(
        db.connection().log,
        vec![
            "INSERT INTO `news` (`subject`, `content`) VALUES ('Test One', 'Test Two')",
            "SELECT `content` FROM `news` WHERE subject = 'Test One' LIMIT 1",
        ]
    );
    assert_eq!(db.query_count(), 2);
}

#[test]
fn joined_fetch_builds_join_clause() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Rows(vec![row(&[
        ("subject", "Test One"),
        ("author", "alice"),
    ])])));
    let mut db = Db::new(conn);

    let joins = [Join::new(
        JoinKind::Left,
        "users",
        "news.author_id",
        "users.id",
    )];
    let rows = db
        .fetch_joined_rows("news", &joins, "ORDER BY news.id", Values::None)
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("author"), Some(&Value::Text("alice".into())));
    assert_eq!(
        db.connection().log,
        vec![
            "SELECT * FROM `news`\nLEFT JOIN `users` ON `news`.`author_id` = `users`.`id` ORDER BY news.id",
        ]
    );
}

#[test]
fn joined_field_fetch_pulls_columns_from_both_tables() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Rows(vec![row(&[
        ("content2", "from t2"),
        ("content", "from t1"),
    ])])));
    let mut db = Db::new(conn);

    let joins = [Join::new(
        JoinKind::Left,
        "testing2",
        "testing.subject",
        "testing2.subject2",
    )];
    let fetched = db
        .fetch_joined_fields(
            vec!["testing2.content2", "testing.content"],
            "testing",
            &joins,
            "WHERE testing.subject = ?",
            "TEST2",
        )
        .unwrap();

    assert_eq!(fetched.get("content2"), Some(&Value::Text("from t2".into())));
    assert_eq!(fetched.get("content"), Some(&Value::Text("from t1".into())));
    assert_eq!(
        db.connection().log,
        vec![
            "SELECT `testing2`.`content2`, `testing`.`content` FROM `testing`\n\
             LEFT JOIN `testing2` ON `testing`.`subject` = `testing2`.`subject2` \
             WHERE testing.subject = 'TEST2' LIMIT 1",
        ]
    );
}

#[test]
fn placeholder_values_are_escaped() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Rows(Vec::new())));
    let mut db = Db::new(conn);

    db.fetch_rows("news", "WHERE subject = ?", ["it's"]).unwrap();

    assert_eq!(
        db.connection().log,
        vec![r"SELECT * FROM `news` WHERE subject = 'it\'s'"]
    );
}

#[test]
fn fetched_text_is_codec_decoded() {
    let conn = MockConnection::connected()
        .respond(Ok(ExecResult::Rows(vec![row(&[("subject", r"it\'s")])])));
    let mut db = Db::new(conn);

    let fetched = db.fetch_row("news", "WHERE id = ?", 1i64).unwrap();
    assert_eq!(fetched.get("subject"), Some(&Value::Text("it's".into())));
}

#[test]
fn too_few_values_fails_before_execution() {
    let mut db = Db::new(MockConnection::connected());

    let err = db
        .fetch_rows("news", "WHERE a = ? AND b = ?", "only")
        .unwrap_err();
    assert!(err.is_placeholder_count());
    assert_eq!(db.query_count(), 0);
    assert!(db.connection().log.is_empty());
}

#[test]
fn driver_failure_still_counts_the_attempt() {
    let conn =
        MockConnection::connected().respond(Err(DbError::query("", "table news does not exist")));
    let mut db = Db::new(conn);

    let err = db.fetch_rows("news", "", Values::None).unwrap_err();
    match err {
        DbError::Query { context, message } => {
            assert_eq!(context, "fetch_rows");
            assert_eq!(message, "table news does not exist");
        }
        other => panic!("expected query error, got {other}"),
    }
    assert_eq!(db.query_count(), 1);
}

#[test]
fn dry_run_captures_instead_of_executing() {
    let config = DbConfig::default().capture_queries(true);
    let mut db = Db::with_config(MockConnection::connected(), config);

    let data = Row::new().with("subject", "New");
    let affected = db.update_rows("news", &data, "WHERE id = ?", 3i64).unwrap();

    assert_eq!(affected, 0);
    assert_eq!(
        db.last_captured(),
        Some("UPDATE `news` SET `subject` = 'New' WHERE id = '3'")
    );
    assert_eq!(db.query_count(), 0);
    assert!(db.connection().log.is_empty());
}

#[test]
fn replace_and_delete_statement_shapes() {
    let conn = MockConnection::connected()
        .respond(Ok(ExecResult::Affected(2)))
        .respond(Ok(ExecResult::Affected(1)));
    let mut db = Db::new(conn);

    let data = Row::new().with("id", 4i64).with("subject", "Again");
    assert_eq!(db.replace_row("news", &data).unwrap(), 2);
    assert_eq!(db.delete_rows("news", "WHERE id = ?", 4i64).unwrap(), 1);

    assert_eq!(
        db.connection().log,
        vec![
            "REPLACE INTO `news` (`id`, `subject`) VALUES ('4', 'Again')",
            "DELETE FROM `news` WHERE id = '4'",
        ]
    );
}

#[test]
fn null_value_renders_as_unquoted_null() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Affected(1)));
    let mut db = Db::new(conn);

    let data = Row::new().with("subject", "kept").with("deleted_at", Value::Null);
    db.insert_row("news", &data).unwrap();

    assert_eq!(
        db.connection().log,
        vec!["INSERT INTO `news` (`subject`, `deleted_at`) VALUES ('kept', NULL)"]
    );
}

#[test]
fn empty_write_payload_is_rejected() {
    let mut db = Db::new(MockConnection::connected());

    let err = db.insert_row("news", &Row::new()).unwrap_err();
    assert!(matches!(err, DbError::InvalidInput(_)));
    assert!(db.connection().log.is_empty());
}

#[test]
fn count_rows_uses_result_set_size() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Rows(vec![
        row(&[("id", "1")]),
        row(&[("id", "2")]),
        row(&[("id", "3")]),
    ])));
    let mut db = Db::new(conn);

    assert_eq!(db.count_rows("news", "WHERE active = ?", 1i64).unwrap(), 3);
    assert_eq!(
        db.connection().log,
        vec!["SELECT * FROM `news` WHERE active = '1'"]
    );
}

#[test]
fn raw_query_substitutes_and_decodes() {
    let conn = MockConnection::connected()
        .respond(Ok(ExecResult::Rows(vec![row(&[("subject", r"a\'b")])])));
    let mut db = Db::new(conn);

    let result = db
        .raw_query("SELECT subject FROM news WHERE id = ?", 9i64)
        .unwrap();
    assert_eq!(
        result,
        ExecResult::Rows(vec![row(&[("subject", "a'b")])])
    );
    assert_eq!(
        db.connection().log,
        vec!["SELECT subject FROM news WHERE id = '9'"]
    );
}

#[test]
fn table_columns_reads_field_column() {
    let conn = MockConnection::connected().respond(Ok(ExecResult::Rows(vec![
        row(&[("Field", "id"), ("Type", "int")]),
        row(&[("Field", "subject"), ("Type", "text")]),
    ])));
    let mut db = Db::new(conn);

    assert_eq!(db.table_columns("news").unwrap(), vec!["id", "subject"]);
    assert_eq!(db.connection().log, vec!["SHOW COLUMNS FROM `news`"]);
}

#[test]
fn connect_is_idempotent() {
    let mut db = Db::new(MockConnection::default());
    let params = ConnectParams::new("localhost", "app", "secret", "appdb");

    db.connect(&params).unwrap();
    db.connect(&params).unwrap();

    assert!(db.is_connected());
    assert_eq!(db.connection().connect_calls, 1);
}

#[test]
fn insert_id_comes_from_the_connection() {
    let conn = MockConnection {
        connected: true,
        insert_id: 41,
        ..MockConnection::default()
    };
    let db = Db::new(conn);
    assert_eq!(db.insert_id(), 41);
}
