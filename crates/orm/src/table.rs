use std::sync::Arc;

use quarry_sql::{Connection, Value};

use crate::column::Column;
use crate::delete::DeleteBuilder;
use crate::error::{Error, Result};
use crate::insert::InsertBuilder;
use crate::model::Model;
use crate::select::SelectBuilder;
use crate::update::UpdateBuilder;

/// Entry point for statements against one registered model.
///
/// Obtained from [`crate::Registry::table`]. Every method hands out a fresh
/// builder, so statement chains never share state.
#[derive(Debug, Clone)]
pub struct Table {
    conn: Arc<dyn Connection>,
    model: Arc<Model>,
}

impl Table {
    pub(crate) const fn new(conn: Arc<dyn Connection>, model: Arc<Model>) -> Self {
        Self { conn, model }
    }

    /// The bound model.
    #[must_use]
    pub const fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Selects `fields`, joining every foreign-key target one level deep.
    ///
    /// Fields that belong neither to this model nor to a joined model are
    /// ignored. An empty slice selects everything.
    #[must_use]
    pub fn select(&self, fields: &[&Column]) -> SelectBuilder {
        SelectBuilder::new(Arc::clone(&self.conn), Arc::clone(&self.model), fields)
    }

    /// Selects every column of this model and of its joined models.
    #[must_use]
    pub fn select_all(&self) -> SelectBuilder {
        self.select(&[])
    }

    /// Inserts one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if `pairs` is empty or names a
    /// column of another model.
    pub fn insert<'c, I, V>(&self, pairs: I) -> Result<InsertBuilder>
    where
        I: IntoIterator<Item = (&'c Column, V)>,
        V: Into<Value>,
    {
        let values = self.own_pairs(pairs, "insert")?;
        Ok(InsertBuilder::new(Arc::clone(&self.conn), Arc::clone(&self.model), values))
    }

    /// Updates rows. Add a filter, or every row is changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if `pairs` is empty or names a
    /// column of another model.
    pub fn update<'c, I, V>(&self, pairs: I) -> Result<UpdateBuilder>
    where
        I: IntoIterator<Item = (&'c Column, V)>,
        V: Into<Value>,
    {
        let set_clauses = self.own_pairs(pairs, "update")?;
        Ok(UpdateBuilder::new(Arc::clone(&self.conn), Arc::clone(&self.model), set_clauses))
    }

    /// Deletes rows. Add a filter, or every row is removed.
    #[must_use]
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(Arc::clone(&self.conn), Arc::clone(&self.model))
    }

    fn own_pairs<'c, I, V>(&self, pairs: I, statement: &str) -> Result<Vec<(Column, Value)>>
    where
        I: IntoIterator<Item = (&'c Column, V)>,
        V: Into<Value>,
    {
        let mut values: Vec<(Column, Value)> = Vec::new();
        for (column, value) in pairs {
            if !self.model.contains(column) {
                return Err(Error::IncorrectArguments(format!(
                    "cannot {statement} `{}` through `{}`",
                    column.alias(),
                    self.model.table()
                )));
            }
            if values.iter().any(|(seen, _)| seen.name() == column.name()) {
                return Err(Error::IncorrectArguments(format!(
                    "{statement} sets `{}` more than once",
                    column.alias()
                )));
            }
            values.push((column.clone(), value.into()));
        }

        if values.is_empty() {
            return Err(Error::IncorrectArguments(format!(
                "{statement} on `{}` needs at least one column",
                self.model.table()
            )));
        }
        Ok(values)
    }
}
