//! Integration tests for engine error classification.

#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{Catalog, categories};
use quarry_orm::{ColumnDef, Error, Model, Registry, SqliteDb, Value};

#[test]
fn select_from_missing_table() {
    let categories = categories();
    let mut registry = Registry::new(SqliteDb::in_memory().unwrap());
    registry.register(&categories, false).unwrap();

    let err = registry.table(&categories).unwrap().select_all().all().unwrap_err();
    assert!(matches!(err, Error::TableNotExists(msg) if msg.contains("categories")));
}

#[test]
fn select_missing_column() {
    let catalog = Catalog::seeded();

    // same table name, one column the database has never seen
    let products = Model::builder("products")
        .column("id", ColumnDef::new("INTEGER").primary_key())
        .column("sku", ColumnDef::new("TEXT"))
        .build()
        .unwrap();
    let mut other = Registry::with_shared(Arc::clone(catalog.registry.connection()));
    other.register(&products, false).unwrap();

    let err = other.table(&products).unwrap().select_all().all().unwrap_err();
    assert!(matches!(err, Error::ColumnNotExists(msg) if msg.contains("sku")));
}

#[test]
fn insert_null_into_not_null_column() {
    let catalog = Catalog::new();
    let err = catalog
        .products_table()
        .insert([(catalog.product("name"), Value::Null)])
        .unwrap()
        .execute()
        .unwrap_err();

    assert!(matches!(err, Error::NotNullViolation(msg) if msg.contains("products.name")));
}

#[test]
fn other_failures_pass_through() {
    let catalog = Catalog::new();

    // no category 99: rejected by the foreign key, which has no dedicated kind
    let err = catalog
        .products_table()
        .insert([(catalog.product("name"), Value::from("orphan")), (catalog.product("category"), Value::from(99))])
        .unwrap()
        .execute()
        .unwrap_err();

    let Error::Engine(inner) = err else {
        panic!("expected an unclassified engine error");
    };
    assert!(format!("{inner:#}").to_lowercase().contains("foreign key constraint failed"));
}

#[test]
fn unknown_model_is_not_registered() {
    let catalog = Catalog::new();
    let stray = Model::builder("suppliers").column("id", ColumnDef::new("INTEGER")).build().unwrap();

    let err = catalog.registry.table(&stray).unwrap_err();
    assert!(matches!(err, Error::ModelNotRegistered(table) if table == "suppliers"));
}
