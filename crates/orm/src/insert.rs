use std::sync::Arc;

use quarry_sql::{Connection, Value};
use sea_query::{Alias, SimpleExpr};

use crate::column::Column;
use crate::error::{Error, Result, translate};
use crate::model::Model;
use crate::query::{Query, QueryBuilder, from_sea_values, to_sea_value};

/// Outcome of an executed INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Rows written by the statement.
    pub rows_affected: u64,

    /// Row id of the inserted row, i.e. the primary key of an autoincrement table.
    pub last_insert_id: i64,
}

/// Builder for constructing INSERT queries.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    conn: Arc<dyn Connection>,
    model: Arc<Model>,
    values: Vec<(Column, Value)>,
}

impl InsertBuilder {
    /// Pairs are checked against the model by [`crate::Table::insert`].
    pub(crate) const fn new(
        conn: Arc<dyn Connection>, model: Arc<Model>, values: Vec<(Column, Value)>,
    ) -> Self {
        Self { conn, model, values }
    }

    /// Build the INSERT query.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be represented as a scalar.
    pub fn build(&self) -> Result<Query> {
        let mut statement = sea_query::Query::insert();
        statement.into_table(Alias::new(self.model.table()));

        let columns: Vec<_> = self.values.iter().map(|(column, _)| Alias::new(column.name())).collect();
        let row: Vec<SimpleExpr> = self
            .values
            .iter()
            .map(|(_, value)| SimpleExpr::Value(to_sea_value(value.clone())))
            .collect();

        statement.columns(columns);
        // one value per column, checked when the builder was created
        statement.values_panic(row);

        let (sql, values) = statement.build(QueryBuilder::default());
        let params = from_sea_values(values).map_err(|e| Error::IncorrectArguments(e.to_string()))?;

        tracing::debug!(
            table = self.model.table(),
            sql = %sql,
            param_count = params.len(),
            "InsertBuilder generated SQL"
        );

        Ok(Query { sql, params })
    }

    /// Run the statement.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error if execution fails.
    pub fn execute(&self) -> Result<Inserted> {
        let query = self.build()?;
        let executed = self.conn.exec(&query.sql, &query.params).map_err(translate)?;
        Ok(Inserted {
            rows_affected: executed.rows_affected,
            last_insert_id: executed.last_insert_id,
        })
    }
}
