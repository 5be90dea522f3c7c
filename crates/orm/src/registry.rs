use std::sync::Arc;

use quarry_sql::Connection;

use crate::ddl;
use crate::error::{Error, Result, translate};
use crate::model::Model;
use crate::table::Table;

#[derive(Debug)]
struct Entry {
    model: Arc<Model>,
    created: bool,
}

/// Process-lifetime set of models bound to one connection.
///
/// Models must be registered in dependency order: a model may only reference
/// tables that are already registered (or itself).
#[derive(Debug)]
pub struct Registry {
    conn: Arc<dyn Connection>,
    entries: Vec<Entry>,
}

impl Registry {
    /// Creates an empty registry over `conn`.
    pub fn new(conn: impl Connection) -> Self {
        Self::with_shared(Arc::new(conn))
    }

    /// Creates an empty registry over an already shared connection.
    #[must_use]
    pub fn with_shared(conn: Arc<dyn Connection>) -> Self {
        Self {
            conn,
            entries: Vec::new(),
        }
    }

    /// The connection every builder of this registry executes on.
    #[must_use]
    pub const fn connection(&self) -> &Arc<dyn Connection> {
        &self.conn
    }

    /// Registers `model`, creating its table when `create_if_missing` is set.
    ///
    /// A model with the same table name replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredDependency`] if a foreign key targets a
    /// table that is not registered, [`Error::IncorrectArguments`] if two
    /// columns a select on `model` would project share a `table_column`
    /// alias, or the translated engine error if table creation fails. The
    /// model is not stored in any of these cases.
    pub fn register(&mut self, model: &Arc<Model>, create_if_missing: bool) -> Result<()> {
        for (_, fk) in model.foreign_keys() {
            let target = fk.target_model().table();
            if target != model.table() && self.find(target).is_none() {
                return Err(Error::UnregisteredDependency {
                    table: model.table().to_string(),
                    target: target.to_string(),
                });
            }
        }

        check_aliases(model)?;

        if create_if_missing {
            self.create_table(model)?;
        }

        tracing::debug!(table = model.table(), created = create_if_missing, "registered model");

        let entry = Entry {
            model: Arc::clone(model),
            created: create_if_missing,
        };
        match self.entries.iter_mut().find(|e| e.model.table() == model.table()) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// DDL for `model`.
    #[must_use]
    pub fn create_table_sql(&self, model: &Model) -> String {
        ddl::create_table(model)
    }

    /// Executes `CREATE TABLE IF NOT EXISTS` for `model`.
    ///
    /// Dependencies are not checked here; a missing referenced table is left
    /// for the engine to report.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error.
    pub fn create_table(&mut self, model: &Model) -> Result<()> {
        let sql = ddl::create_table(model);
        tracing::debug!(table = model.table(), sql = %sql, "creating table");
        self.conn.exec(&sql, &[]).map_err(translate)?;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.model.table() == model.table()) {
            entry.created = true;
        }
        Ok(())
    }

    /// Executes `DROP TABLE <table>`.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error, e.g. [`Error::TableNotExists`].
    pub fn drop_table(&mut self, table: &str) -> Result<()> {
        let sql = ddl::drop_table(table);
        tracing::debug!(table, sql = %sql, "dropping table");
        self.conn.exec(&sql, &[]).map_err(translate)?;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.model.table() == table) {
            entry.created = false;
        }
        Ok(())
    }

    /// Statement entry point for a registered model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotRegistered`] if no model with this table name
    /// was registered.
    pub fn table(&self, model: &Model) -> Result<Table> {
        let entry =
            self.find(model.table()).ok_or_else(|| Error::ModelNotRegistered(model.table().to_string()))?;
        Ok(Table::new(Arc::clone(&self.conn), Arc::clone(&entry.model)))
    }

    /// Registered models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &Arc<Model>> {
        self.entries.iter().map(|e| &e.model)
    }

    /// Whether this registry created (and has not dropped) the table.
    #[must_use]
    pub fn is_created(&self, table: &str) -> bool {
        self.find(table).is_some_and(|e| e.created)
    }

    /// Row id of the most recent successful insert on the connection.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_id()
    }

    /// Opens an explicit transaction.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error.
    pub fn begin(&self) -> Result<()> {
        self.conn.begin().map_err(translate)
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error.
    pub fn commit(&self) -> Result<()> {
        self.conn.commit().map_err(translate)
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns the translated engine error.
    pub fn rollback(&self) -> Result<()> {
        self.conn.rollback().map_err(translate)
    }

    fn find(&self, table: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.model.table() == table)
    }
}

/// Rejects models whose select projection would contain the same alias twice,
/// e.g. `a_b.c` next to a joined `a.b_c`.
fn check_aliases(model: &Model) -> Result<()> {
    let mut tables = vec![model];
    for (_, fk) in model.foreign_keys() {
        let target = fk.target_model().as_ref();
        if tables.iter().all(|t| t.table() != target.table()) {
            tables.push(target);
        }
    }

    let mut seen: Vec<(String, &str)> = Vec::new();
    for table in tables {
        for column in table.columns() {
            let alias = column.alias();
            if let Some((_, owner)) = seen.iter().find(|(a, _)| *a == alias) {
                return Err(Error::IncorrectArguments(format!(
                    "`{}.{}` and a column of `{owner}` both select as `{alias}`",
                    table.table(),
                    column.name()
                )));
            }
            seen.push((alias, table.table()));
        }
    }
    Ok(())
}

