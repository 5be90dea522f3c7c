use std::sync::Arc;

use quarry_sql::{Connection, Record};
use sea_query::{Alias, ColumnRef, Order, SimpleExpr};

use crate::clause::WhereClause;
use crate::column::Column;
use crate::condition::Condition;
use crate::error::{Error, Result, translate};
use crate::join::Join;
use crate::model::Model;
use crate::query::{Query, QueryBuilder, from_sea_values, table_column};
use crate::row::ResultRow;

/// Builder for constructing SELECT queries.
///
/// Every foreign key on the selected model adds a `LEFT JOIN` on the
/// referenced table, one level deep. Foreign keys back into the same table
/// are not joined. Each projected column is aliased
/// `table_column`, which is also the key it has in the returned
/// [`ResultRow`]s.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    conn: Arc<dyn Connection>,
    model: Arc<Model>,
    projection: Vec<Column>,
    joins: Vec<Join>,
    filter: WhereClause,
    order: Vec<(ColumnRef, Order)>,
    limit: Option<u64>,
}

impl SelectBuilder {
    pub(crate) fn new(conn: Arc<dyn Connection>, model: Arc<Model>, fields: &[&Column]) -> Self {
        let mut projection: Vec<Column> = if fields.is_empty() {
            model.columns().to_vec()
        } else {
            fields.iter().filter(|c| model.contains(c)).map(|&c| c.clone()).collect()
        };

        let mut joins = Vec::new();
        for (column, fk) in model.foreign_keys() {
            let target = fk.target_model();
            // a self-reference would join the table to itself under the same
            // name; its columns are already projected from the own side
            if target.table() == model.table() {
                continue;
            }
            let requested: Vec<Column> =
                fields.iter().filter(|c| target.contains(c)).map(|&c| c.clone()).collect();

            if requested.is_empty() {
                projection.extend(target.columns().iter().cloned());
            } else {
                projection.extend(requested);
            }
            joins.push(Join::foreign_key(column, fk));
        }

        // nothing requested belonged here and there is no join to fall back on
        if projection.is_empty() {
            projection = model.columns().to_vec();
        }

        Self {
            conn,
            model,
            projection,
            joins,
            filter: WhereClause::default(),
            order: Vec::new(),
            limit: None,
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

    /// Adds ascending ORDER BY clause.
    #[must_use]
    pub fn order_by(mut self, column: &Column) -> Self {
        self.order.push((table_column(column.table(), column.name()), Order::Asc));
        self
    }

    /// Adds descending ORDER BY clause.
    #[must_use]
    pub fn order_by_desc(mut self, column: &Column) -> Self {
        self.order.push((table_column(column.table(), column.name()), Order::Desc));
        self
    }

    /// Sets the maximum number of rows to return.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keys of the returned rows, in projection order.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.projection.iter().map(Column::alias).collect()
    }

    /// Tables joined in through foreign keys.
    #[must_use]
    pub fn joined_tables(&self) -> Vec<&str> {
        self.joins.iter().map(Join::table).collect()
    }

    /// Build the SELECT query.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound value cannot be represented as a scalar.
    pub fn build(&self) -> Result<Query> {
        let mut statement = sea_query::Query::select();

        for column in &self.projection {
            statement.expr_as(
                SimpleExpr::Column(table_column(column.table(), column.name())),
                Alias::new(column.alias()),
            );
        }

        statement.from(Alias::new(self.model.table()));

        for join in &self.joins {
            join.apply(&mut statement);
        }

        if let Some(expr) = self.filter.clone().into_expr() {
            statement.and_where(expr);
        }

        for (column, order) in &self.order {
            statement.order_by(column.clone(), order.clone());
        }

        if let Some(limit) = self.limit {
            statement.limit(limit);
        }

        let (sql, values) = statement.build(QueryBuilder::default());
        let params = from_sea_values(values).map_err(|e| Error::IncorrectArguments(e.to_string()))?;

        tracing::debug!(
            table = self.model.table(),
            sql = %sql,
            param_count = params.len(),
            "SelectBuilder generated SQL"
        );

        Ok(Query { sql, params })
    }

    /// Run the query and return the raw tuples.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error if execution fails.
    pub fn execute(&self) -> Result<Vec<Record>> {
        let query = self.build()?;
        self.conn.query(&query.sql, &query.params).map_err(translate)
    }

    /// Run the query and map every tuple to a [`ResultRow`].
    ///
    /// # Errors
    ///
    /// Returns the translated engine error if execution fails, or
    /// [`Error::IncorrectArguments`] if the connection returns tuples of the
    /// wrong width.
    pub fn all(self) -> Result<Vec<ResultRow>> {
        let aliases = self.aliases();
        let records = self.execute()?;
        records.into_iter().map(|record| ResultRow::from_record(&aliases, record)).collect()
    }

    /// Run the query and return the first row, or `None` when nothing matched.
    ///
    /// Applies `LIMIT 1` unless a limit was set explicitly.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error if execution fails.
    pub fn first(mut self) -> Result<Option<ResultRow>> {
        if self.limit.is_none() {
            self.limit = Some(1);
        }
        Ok(self.all()?.into_iter().next())
    }
}
