use std::fmt::Debug;

use anyhow::Result;

use crate::Value;

/// One returned tuple, values in projection order.
pub type Record = Vec<Value>;

/// Summary of a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    /// Number of rows inserted, updated or deleted.
    pub rows_affected: u64,

    /// Row id assigned by the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// SQL providers implement the [`Connection`] trait so the ORM can execute
/// statements without knowing the engine behind them.
///
/// Errors are returned unclassified; the ORM inspects their message text to
/// map them onto its own error kinds.
pub trait Connection: Debug + Send + Sync + 'static {
    /// Execute a query and return the resulting tuples.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the statement cannot be prepared or run.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Record>>;

    /// Execute a statement that does not return rows (e.g. `INSERT`, `UPDATE`,
    /// `DELETE` or DDL).
    ///
    /// # Errors
    ///
    /// Returns the engine error if the statement cannot be prepared or run.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<Executed>;

    /// Row id of the most recent successful insert.
    fn last_insert_id(&self) -> i64;

    /// Open an explicit transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error, e.g. when a transaction is already open.
    fn begin(&self) -> Result<()>;

    /// Commit the open transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error, e.g. when no transaction is open.
    fn commit(&self) -> Result<()>;

    /// Roll back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns the engine error, e.g. when no transaction is open.
    fn rollback(&self) -> Result<()>;
}
