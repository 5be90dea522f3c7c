//! Plain-text DDL for SQLite.
//!
//! Identifiers are emitted as declared, unquoted. Column clauses follow
//! declaration order and foreign-key clauses come last.

use quarry_sql::Value;

use crate::column::{Column, ForeignKey};
use crate::model::Model;

/// `CREATE TABLE IF NOT EXISTS <table> (<columns>, <foreign keys>)`
#[must_use]
pub fn create_table(model: &Model) -> String {
    let mut clauses: Vec<String> = model.columns().iter().map(describe_column).collect();
    clauses.extend(model.foreign_keys().map(|(column, fk)| describe_foreign_key(column, fk)));

    format!("CREATE TABLE IF NOT EXISTS {} ({})", model.table(), clauses.join(", "))
}

/// `DROP TABLE <table>`
#[must_use]
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE {table}")
}

/// `<name> <type> [DEFAULT <literal>] [NOT NULL] [PRIMARY KEY] [AUTOINCREMENT]`
#[must_use]
pub fn describe_column(column: &Column) -> String {
    let mut sql = format!("{} {}", column.name(), column.sql_type());
    if let Some(value) = column.default_value() {
        sql.push_str(" DEFAULT ");
        sql.push_str(&render_literal(value));
    }
    if column.is_not_null() {
        sql.push_str(" NOT NULL");
    }
    if column.is_primary_key() {
        sql.push_str(" PRIMARY KEY");
    }
    if column.is_autoincrement() {
        sql.push_str(" AUTOINCREMENT");
    }
    sql
}

/// `FOREIGN KEY (<name>) REFERENCES <table>(<column>) ON UPDATE CASCADE ON DELETE CASCADE`
#[must_use]
pub fn describe_foreign_key(column: &Column, fk: &ForeignKey) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {}({}) ON UPDATE CASCADE ON DELETE CASCADE",
        column.name(),
        fk.target_model().table(),
        fk.target_column().name()
    )
}

/// SQL literal for a `DEFAULT` clause.
///
/// DDL cannot take bound parameters, so this is the one place values are
/// written into SQL text.
#[must_use]
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(v) => v.to_string(),
        // `Debug` keeps the decimal point on whole numbers (`2.0`)
        Value::Real(v) => format!("{v:?}"),
        Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
        Value::Blob(bytes) => {
            let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
            format!("X'{hex}'")
        }
    }
}
