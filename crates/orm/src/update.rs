use std::sync::Arc;

use quarry_sql::{Connection, Value};
use sea_query::Alias;

use crate::clause::WhereClause;
use crate::column::Column;
use crate::condition::Condition;
use crate::error::{Error, Result, translate};
use crate::model::Model;
use crate::query::{Query, QueryBuilder, from_sea_values, to_sea_value};

/// Builder for constructing UPDATE queries.
///
/// There is no implicit WHERE clause: without [`Self::filter`] every row of
/// the table is updated.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    conn: Arc<dyn Connection>,
    model: Arc<Model>,
    set_clauses: Vec<(Column, Value)>,
    filter: WhereClause,
}

impl UpdateBuilder {
    pub(crate) fn new(
        conn: Arc<dyn Connection>, model: Arc<Model>, set_clauses: Vec<(Column, Value)>,
    ) -> Self {
        Self {
            conn,
            model,
            set_clauses,
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

    /// Build the UPDATE query.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be represented as a scalar.
    pub fn build(&self) -> Result<Query> {
        let mut statement = sea_query::Query::update();
        statement.table(Alias::new(self.model.table()));

        for (column, value) in &self.set_clauses {
            statement.value(Alias::new(column.name()), to_sea_value(value.clone()));
        }

        if let Some(expr) = self.filter.clone().into_expr() {
            statement.and_where(expr);
        }

        let (sql, values) = statement.build(QueryBuilder::default());
        let params = from_sea_values(values).map_err(|e| Error::IncorrectArguments(e.to_string()))?;

        tracing::debug!(
            table = self.model.table(),
            sql = %sql,
            param_count = params.len(),
            "UpdateBuilder generated SQL"
        );

        Ok(Query { sql, params })
    }

    /// Run the statement and return the number of rows changed.
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
