//! A safe SQL construction and execution layer over a host-supplied
//! connection.
//!
//! The engine never concatenates caller values into SQL directly.
//! Identifier-like tokens are backtick-quoted, literals pass through a
//! pluggable [`Codec`] and the driver's escape routine, and `?`
//! placeholders in option fragments are substituted positionally with
//! escaped literals. Finished statements go to a [`Connection`]
//! implementation supplied by the host; the crate speaks no wire
//! protocol of its own.
//!
//! # Layers
//!
//! - [`escape`]: identifier quoting and literal escaping
//! - [`subst`]: `?` placeholder substitution in option fragments
//! - [`stmt`]: SELECT list, FROM list, and join clause assembly
//! - [`codec`]: the encode/decode pair applied at the storage boundary
//! - [`db`]: the executor tying the layers to a [`Connection`]
//!
//! # Dry runs
//!
//! With [`DbConfig::capture_queries`] set, every operation builds its
//! statement, records it, and returns a neutral value without touching
//! the connection. [`Db::captured_queries`] exposes the recorded SQL,
//! which is how the integration tests in this repository assert on
//! statement text.

pub mod codec;
pub mod config;
pub mod conn;
pub mod db;
pub mod error;
pub mod escape;
pub mod report;
pub mod stmt;
pub mod subst;
pub mod value;

pub use codec::{Codec, EntityCodec, NoopCodec, SlashCodec};
pub use config::DbConfig;
pub use conn::{ConnectParams, Connection, ExecResult};
pub use db::Db;
pub use error::{DbError, DbResult};
pub use escape::{DriverEscape, Escaper};
pub use report::{CompositeReporter, NoopReporter, Reporter, TracingReporter};
pub use stmt::{Join, JoinKind, Spec};
pub use subst::{count_placeholders, substitute};
pub use value::{Row, Value, Values};
