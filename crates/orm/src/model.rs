use std::collections::HashSet;
use std::sync::Arc;

use crate::column::{Column, ColumnDef, ForeignKey};
use crate::error::{Error, Result};

/// A table definition: name plus columns in declaration order.
///
/// Declaration order drives DDL column order and the default projection.
#[derive(Debug)]
pub struct Model {
    table: String,
    columns: Vec<Column>,
}

impl Model {
    /// Starts a model for an explicit table name.
    #[must_use]
    pub fn builder(table: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Starts a model whose table name is derived from `T`: the last path
    /// segment of the type name, lower-cased (`shop::Category` → `category`).
    #[must_use]
    pub fn builder_for<T: ?Sized>() -> ModelBuilder {
        Self::builder(derive_table_name(std::any::type_name::<T>()))
    }

    /// Table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if the model has no such column.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.iter().find(|c| c.name() == name).ok_or_else(|| {
            Error::IncorrectArguments(format!("`{}` has no column `{name}`", self.table))
        })
    }

    /// Whether `column` is one of this model's columns.
    #[must_use]
    pub fn contains(&self, column: &Column) -> bool {
        column.table() == self.table && self.columns.iter().any(|c| c == column)
    }

    /// Columns carrying a foreign key, in declaration order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> {
        self.columns.iter().filter_map(|c| c.foreign_key().map(|fk| (c, fk)))
    }
}

/// Builder for [`Model`].
#[derive(Debug)]
pub struct ModelBuilder {
    table: String,
    columns: Vec<(String, ColumnDef)>,
}

impl ModelBuilder {
    /// Adds a named column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, def: ColumnDef) -> Self {
        self.columns.push((name.into(), def));
        self
    }

    /// Freezes the model. Column names are assigned here and never change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectArguments`] if the table name is empty, the
    /// model has no columns, or a column name is empty or repeated.
    pub fn build(self) -> Result<Arc<Model>> {
        if self.table.is_empty() {
            return Err(Error::IncorrectArguments("table name is empty".to_string()));
        }
        if self.columns.is_empty() {
            return Err(Error::IncorrectArguments(format!("`{}` has no columns", self.table)));
        }

        let mut seen = HashSet::new();
        for (name, _) in &self.columns {
            if name.is_empty() {
                return Err(Error::IncorrectArguments(format!(
                    "`{}` has a column with an empty name",
                    self.table
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::IncorrectArguments(format!(
                    "`{}` declares column `{name}` twice",
                    self.table
                )));
            }
        }

        let columns = self
            .columns
            .into_iter()
            .map(|(name, def)| Column::new(self.table.clone(), name, def))
            .collect();

        Ok(Arc::new(Model {
            table: self.table,
            columns,
        }))
    }
}

fn derive_table_name(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Category;

    fn categories() -> Arc<Model> {
        Model::builder("categories")
            .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
            .column("name", ColumnDef::new("varchar(100)").not_null())
            .build()
            .unwrap()
    }

    #[test]
    fn columns_keep_declaration_order() {
        let model = categories();
        let names: Vec<_> = model.columns().iter().map(Column::name).collect();
        assert_eq!(names, ["id", "name"]);
        assert!(model.columns().iter().all(|c| c.table() == "categories"));
        assert_eq!(model.column("name").unwrap().alias(), "categories_name");
    }

    #[test]
    fn unknown_column_lookup() {
        let err = categories().column("nope").unwrap_err();
        assert!(matches!(err, Error::IncorrectArguments(_)));
    }

    #[test]
    fn rejects_duplicate_and_empty() {
        let err = Model::builder("t")
            .column("a", ColumnDef::new("INTEGER"))
            .column("a", ColumnDef::new("TEXT"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::IncorrectArguments(msg) if msg.contains("twice")));

        let err = Model::builder("t").build().unwrap_err();
        assert!(matches!(err, Error::IncorrectArguments(_)));
    }

    #[test]
    fn foreign_key_must_name_existing_column() {
        let parent = categories();

        let fk = ColumnDef::new("INTEGER").references(&parent, "id").unwrap();
        let child = Model::builder("products").column("category", fk).build().unwrap();
        let (column, fk) = child.foreign_keys().next().unwrap();
        assert_eq!(column.name(), "category");
        assert_eq!(fk.target_model().table(), "categories");
        assert_eq!(fk.target_column().name(), "id");

        let err = ColumnDef::new("INTEGER").references(&parent, "uuid").unwrap_err();
        assert!(matches!(err, Error::IncorrectForeignKey(_)));
    }

    #[test]
    fn contains_checks_table_and_name() {
        let model = categories();
        let other = Model::builder("tags").column("id", ColumnDef::new("INTEGER")).build().unwrap();

        assert!(model.contains(model.column("id").unwrap()));
        assert!(!model.contains(other.column("id").unwrap()));
    }

    #[test]
    fn table_name_from_type() {
        let model = Model::builder_for::<Category>()
            .column("id", ColumnDef::new("INTEGER"))
            .build()
            .unwrap();
        assert_eq!(model.table(), "category");
        assert_eq!(derive_table_name("shop::Wrapper<shop::Item>"), "wrapper");
    }
}
