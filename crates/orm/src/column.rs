use std::fmt;
use std::sync::Arc;

use quarry_sql::Value;

use crate::error::{Error, Result};
use crate::model::Model;

/// Declarative description of a column before it is attached to a model.
///
/// The column's name is given when it is added to a [`Model`] through
/// [`crate::ModelBuilder::column`], never here.
///
/// ```ignore
/// let id = ColumnDef::new("INTEGER").primary_key().autoincrement();
/// let category = ColumnDef::new("INTEGER").not_null().references(&categories, "id")?;
/// ```
#[derive(Debug, Clone)]
pub struct ColumnDef {
    sql_type: String,
    not_null: bool,
    default_value: Option<Value>,
    primary_key: bool,
    autoincrement: bool,
    foreign_key: Option<ForeignKey>,
}

impl ColumnDef {
    /// Creates a column of the given SQL type, e.g. `INTEGER` or `varchar(100)`.
    #[must_use]
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            not_null: false,
            default_value: None,
            primary_key: false,
            autoincrement: false,
            foreign_key: None,
        }
    }

    /// Marks the column `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the `DEFAULT` value used in the table DDL.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column `AUTOINCREMENT`.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Declares a foreign key to `column` of `model`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectForeignKey`] if `model` has no such column.
    pub fn references(mut self, model: &Arc<Model>, column: &str) -> Result<Self> {
        let index = model.columns().iter().position(|c| c.name() == column).ok_or_else(|| {
            Error::IncorrectForeignKey(format!("`{}` has no column `{column}`", model.table()))
        })?;

        self.foreign_key = Some(ForeignKey {
            model: Arc::clone(model),
            index,
        });
        Ok(self)
    }
}

/// A column attached to a model.
///
/// Names are fixed when the model is built. Two columns are equal when they
/// share table and name.
#[derive(Debug, Clone)]
pub struct Column {
    table: String,
    name: String,
    def: ColumnDef,
}

impl Column {
    pub(crate) const fn new(table: String, name: String, def: ColumnDef) -> Self {
        Self { table, name, def }
    }

    /// Owning table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified key used in projections and result rows: `table_column`.
    ///
    /// The key is not unique across tables: `a_b.c` and `a.b_c` both give
    /// `a_b_c`. [`Registry::register`](crate::Registry::register) rejects a
    /// model whose select would project two such columns.
    #[must_use]
    pub fn alias(&self) -> String {
        format!("{}_{}", self.table, self.name)
    }

    /// SQL type text.
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.def.sql_type
    }

    /// Whether the column is `NOT NULL`.
    #[must_use]
    pub const fn is_not_null(&self) -> bool {
        self.def.not_null
    }

    /// Declared default, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.def.default_value.as_ref()
    }

    /// Whether the column is the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.def.primary_key
    }

    /// Whether the column is `AUTOINCREMENT`.
    #[must_use]
    pub const fn is_autoincrement(&self) -> bool {
        self.def.autoincrement
    }

    /// Foreign key declared on this column.
    #[must_use]
    pub const fn foreign_key(&self) -> Option<&ForeignKey> {
        self.def.foreign_key.as_ref()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.name == other.name
    }
}

impl Eq for Column {}

/// Reference from a column to a column of another model.
#[derive(Clone)]
pub struct ForeignKey {
    model: Arc<Model>,
    index: usize,
}

impl ForeignKey {
    /// The referenced model.
    #[must_use]
    pub const fn target_model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The referenced column.
    #[must_use]
    pub fn target_column(&self) -> &Column {
        // index was validated against this model in `ColumnDef::references`
        &self.model.columns()[self.index]
    }
}

impl fmt::Debug for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignKey({}.{})", self.model.table(), self.target_column().name())
    }
}
