//! Minimal ORM over SQLite.
//!
//! Models are declared at runtime, registered with a [`Registry`] in
//! dependency order, and queried through per-statement builders. Values are
//! always bound as `?` parameters; only DDL defaults are written into SQL text.
//!
//! # Quick Start
//!
//! ## Declare Models
//!
//! ```ignore
//! use quarry_orm::{ColumnDef, Model};
//!
//! let categories = Model::builder("categories")
//!     .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
//!     .column("name", ColumnDef::new("varchar(100)").not_null())
//!     .build()?;
//!
//! let products = Model::builder("products")
//!     .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
//!     .column("name", ColumnDef::new("varchar(100)").not_null())
//!     .column("price", ColumnDef::new("REAL").default_value(0.0))
//!     .column("category", ColumnDef::new("INTEGER").references(&categories, "id")?)
//!     .build()?;
//! ```
//!
//! ## Register
//!
//! ```ignore
//! use quarry_orm::{Registry, SqliteDb};
//!
//! let mut registry = Registry::new(SqliteDb::connect()?);
//! registry.register(&categories, true)?;
//! registry.register(&products, true)?; // after `categories`, which it references
//! ```
//!
//! ## CRUD Operations
//!
//! ```ignore
//! use quarry_orm::Condition;
//!
//! let name = categories.column("name")?;
//! registry.table(&categories)?.insert([(name, "Tools")])?.execute()?;
//! let tools = registry.last_insert_id();
//!
//! let products_t = registry.table(&products)?;
//! products_t
//!     .insert([(products.column("name")?, "Hammer".into()), (products.column("category")?, tools.into())])?
//!     .execute()?;
//!
//! // Joined select: every foreign key adds a LEFT JOIN, columns are keyed `table_column`
//! let rows = products_t
//!     .select_all()
//!     .filter(Condition::like(products.column("name")?, "Ham")?)
//!     .or(Condition::eq(products.column("price")?, 0.0))?
//!     .order_by(products.column("id")?)
//!     .all()?;
//! let category_name: String = rows[0].fetch(name)?;
//!
//! // No implicit WHERE: this touches every row
//! products_t.update([(products.column("price")?, 9.5)])?.execute()?;
//!
//! products_t.delete().filter(Condition::eq(products.column("id")?, 1)).execute()?;
//! ```
//!
//! ## Errors
//!
//! Engine failures are classified once, at execution, into [`Error`]: a
//! missing table, a missing column and a `NOT NULL` violation get their own
//! kinds and everything else is passed through as [`Error::Engine`].

#![forbid(unsafe_code)]

mod clause;
mod column;
mod condition;
pub mod ddl;
mod delete;
mod error;
mod insert;
mod join;
mod model;
mod query;
mod registry;
mod row;
mod select;
mod table;
mod update;

pub use column::{Column, ColumnDef, ForeignKey};
pub use condition::{Condition, Operator};
pub use delete::DeleteBuilder;
pub use error::{Error, Result, translate};
pub use insert::{InsertBuilder, Inserted};
pub use model::{Model, ModelBuilder};
// Storage types callers need for arguments, results and custom backends.
pub use quarry_sql::{ConnectOptions, Connection, Executed, Record, SqliteDb, Value};
pub use query::Query;
pub use registry::Registry;
pub use row::{FromValue, ResultRow};
pub use select::SelectBuilder;
pub use table::Table;
pub use update::UpdateBuilder;
