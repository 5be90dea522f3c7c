//! Default `SQLite` implementation of [`Connection`].
//!
//! A single `rusqlite` connection guarded by a mutex: statements run strictly
//! one after another in call order.

#![allow(clippy::significant_drop_tightening)]

use std::sync::Arc;

use anyhow::{Context, Result};
use fromenv::FromEnv;
use rusqlite::types::ValueRef;
use rusqlite::{Connection as SqliteConnection, params_from_iter};
use tracing::instrument;

use crate::{Connection, Executed, Record, Value};

/// Options used to open the SQLite database.
///
/// Loaded from environment variables by [`SqliteDb::connect`].
#[derive(Debug, Clone, FromEnv)]
pub struct ConnectOptions {
    /// Database file path, or `:memory:` for a private in-memory database.
    #[env(from = "SQL_DATABASE", default = ":memory:")]
    pub database: String,
}

impl ConnectOptions {
    /// Load options from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::from_env().finalize().context("issue loading connection options")
    }
}

/// SQLite-backed [`Connection`].
///
/// Cloning is cheap and every clone shares the same underlying connection.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    // Mutex is necessary since rusqlite::Connection isn't `Sync`
    conn: Arc<parking_lot::Mutex<SqliteConnection>>,
}

impl SqliteDb {
    /// Open the database named by the environment (see [`ConnectOptions`]).
    ///
    /// # Errors
    ///
    /// Returns an error if options cannot be loaded or the database cannot be
    /// opened.
    pub fn connect() -> Result<Self> {
        Self::connect_with(ConnectOptions::load()?)
    }

    /// Open the database with explicit options.
    ///
    /// Foreign-key enforcement is switched on so `ON UPDATE` / `ON DELETE`
    /// cascades apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    #[instrument]
    pub fn connect_with(options: ConnectOptions) -> Result<Self> {
        tracing::debug!("initializing SQLite connection to: {}", options.database);

        let conn =
            SqliteConnection::open(&options.database).context("failed to open SQLite database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON").context("failed to enable foreign keys")?;

        Ok(Self {
            conn: Arc::new(parking_lot::Mutex::new(conn)),
        })
    }

    /// Private in-memory database, mostly useful in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self> {
        Self::connect_with(ConnectOptions {
            database: ":memory:".to_string(),
        })
    }

    fn batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("executing batch: {sql}");
        self.conn.lock().execute_batch(sql).with_context(|| format!("failed to execute `{sql}`"))
    }
}

impl Connection for SqliteDb {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Record>> {
        tracing::debug!(sql, param_count = params.len(), "executing query");

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;
        let column_count = stmt.column_count();

        let sqlite_params: Vec<_> = params.iter().map(value_to_sqlite).collect();
        let mut rows =
            stmt.query(params_from_iter(sqlite_params.iter())).context("failed to execute query")?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().context("failed to fetch row")? {
            let mut record = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row.get_ref(i).context("failed to get column value")?;
                record.push(sqlite_to_value(value)?);
            }
            records.push(record);
        }

        tracing::debug!(rows = records.len(), "query complete");
        Ok(records)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<Executed> {
        tracing::debug!(sql, param_count = params.len(), "executing statement");

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).context("failed to prepare statement")?;

        let sqlite_params: Vec<_> = params.iter().map(value_to_sqlite).collect();
        let rows_affected = stmt
            .execute(params_from_iter(sqlite_params.iter()))
            .context("failed to execute statement")?;

        Ok(Executed {
            rows_affected: rows_affected as u64,
            last_insert_id: conn.last_insert_rowid(),
        })
    }

    fn last_insert_id(&self) -> i64 {
        self.conn.lock().last_insert_rowid()
    }

    fn begin(&self) -> Result<()> {
        self.batch("BEGIN")
    }

    fn commit(&self) -> Result<()> {
        self.batch("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.batch("ROLLBACK")
    }
}

fn value_to_sqlite(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

fn sqlite_to_value(value: ValueRef) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(t) => {
            let s = std::str::from_utf8(t).context("invalid UTF-8 in text value")?;
            Ok(Value::Text(s.to_string()))
        }
        ValueRef::Blob(b) => Ok(Value::Blob(b.to_vec())),
    }
}
