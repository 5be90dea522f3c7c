use std::sync::Arc;

use quarry_sql::Connection;
use sea_query::Alias;

use crate::clause::WhereClause;
use crate::condition::Condition;
use crate::error::{Error, Result, translate};
use crate::model::Model;
use crate::query::{Query, QueryBuilder, from_sea_values};

/// Builder for constructing DELETE queries.
///
/// Like [`crate::UpdateBuilder`], an unfiltered delete removes every row.
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    conn: Arc<dyn Connection>,
    model: Arc<Model>,
    filter: WhereClause,
}

impl DeleteBuilder {
    pub(crate) fn new(conn: Arc<dyn Connection>, model: Arc<Model>) -> Self {
        Self {
            conn,
            model,
            filter: WhereClause::default(),
        }
    }

    /// Starts the WHERE clause. Calling it again conjoins the new condition.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter.filter(condition);
        self
    }

    /// Appends `AND condition` to the WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectWhereOrder`] if [`Self::filter`] was not called
    /// first.
    pub fn and(mut self, condition: Condition) -> Result<Self> {
        self.filter.and(condition)?;
        Ok(self)
    }

    /// Appends `OR condition` to the WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectWhereOrder`] if [`Self::filter`] was not called
    /// first.
    pub fn or(mut self, condition: Condition) -> Result<Self> {
        self.filter.or(condition)?;
        Ok(self)
    }

    /// Build the DELETE query.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be represented as a scalar.
    pub fn build(&self) -> Result<Query> {
        let mut statement = sea_query::Query::delete();
        statement.from_table(Alias::new(self.model.table()));

        if let Some(expr) = self.filter.clone().into_expr() {
            statement.and_where(expr);
        }

        let (sql, values) = statement.build(QueryBuilder::default());
        let params = from_sea_values(values).map_err(|e| Error::IncorrectArguments(e.to_string()))?;

        tracing::debug!(
            table = self.model.table(),
            sql = %sql,
            param_count = params.len(),
            "DeleteBuilder generated SQL"
        );

        Ok(Query { sql, params })
    }

    /// Run the statement and return the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error if execution fails.
    pub fn execute(&self) -> Result<u64> {
        let query = self.build()?;
        let executed = self.conn.exec(&query.sql, &query.params).map_err(translate)?;
        Ok(executed.rows_affected)
    }
}
