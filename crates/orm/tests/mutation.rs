//! Integration tests for INSERT, UPDATE and DELETE.

#![allow(missing_docs)]

mod common;

use common::{Catalog, assert_sql_contains, assert_sql_lacks};
use quarry_orm::{Condition, Error, Value};

#[test]
fn insert_binds_every_value() {
    let catalog = Catalog::new();
    let query = catalog
        .products_table()
        .insert([(catalog.product("name"), "X")])
        .unwrap()
        .build()
        .unwrap();

    assert_sql_contains(&query.sql, &["INSERT INTO products (name) VALUES (?)"]);
    assert_eq!(query.params, [Value::from("X")]);
}

#[test]
fn insert_reports_primary_key() {
    let catalog = Catalog::seeded();
    let inserted = catalog
        .products_table()
        .insert([(catalog.product("name"), "X")])
        .unwrap()
        .execute()
        .unwrap();

    assert_eq!(inserted.rows_affected, 1);
    assert_eq!(inserted.last_insert_id, 4);
    assert_eq!(catalog.registry.last_insert_id(), 4);

    let row = catalog
        .products_table()
        .select(&[catalog.product("id")])
        .filter(Condition::eq(catalog.product("name"), "X"))
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(row.fetch::<i64>(catalog.product("id")).unwrap(), inserted.last_insert_id);
}

#[test]
fn insert_applies_column_defaults() {
    let catalog = Catalog::new();
    catalog.products_table().insert([(catalog.product("name"), "free")]).unwrap().execute().unwrap();

    let row = catalog.products_table().select(&[catalog.product("price")]).first().unwrap().unwrap();
    assert!(row.fetch::<f64>(catalog.product("price")).unwrap().abs() < f64::EPSILON);
}

#[test]
fn insert_rejects_empty_and_foreign_pairs() {
    let catalog = Catalog::new();
    let table = catalog.products_table();

    let err = table.insert(Vec::<(&quarry_orm::Column, Value)>::new()).unwrap_err();
    assert!(matches!(err, Error::IncorrectArguments(_)));

    let err = table.insert([(catalog.category("name"), "tools")]).unwrap_err();
    assert!(matches!(err, Error::IncorrectArguments(msg) if msg.contains("categories_name")));

    let err = table.update([(catalog.category("name"), "tools")]).unwrap_err();
    assert!(matches!(err, Error::IncorrectArguments(_)));
}

#[test]
fn repeated_column_is_rejected() {
    let catalog = Catalog::new();
    let table = catalog.products_table();
    let name = catalog.product("name");

    let err = table.insert([(name, "a"), (name, "b")]).unwrap_err();
    assert!(matches!(err, Error::IncorrectArguments(msg) if msg.contains("products_name")));

    let err = table.update([(name, "a"), (name, "b")]).unwrap_err();
    assert!(matches!(err, Error::IncorrectArguments(_)));
}

#[test]
fn update_without_filter_touches_every_row() {
    let catalog = Catalog::seeded();
    let update = catalog.products_table().update([(catalog.product("name"), "Y")]).unwrap();

    let query = update.build().unwrap();
    assert_sql_contains(&query.sql, &["UPDATE products SET name = ?"]);
    assert_sql_lacks(&query.sql, "WHERE");

    assert_eq!(update.execute().unwrap(), 3);

    let names: Vec<String> = catalog
        .products_table()
        .select(&[catalog.product("name")])
        .all()
        .unwrap()
        .iter()
        .map(|row| row.fetch(catalog.product("name")).unwrap())
        .collect();
    assert_eq!(names, ["Y", "Y", "Y"]);
}

#[test]
fn filtered_update() {
    let catalog = Catalog::seeded();
    let update = catalog
        .products_table()
        .update([(catalog.product("price"), Value::Real(1.0)), (catalog.product("name"), "cheap".into())])
        .unwrap()
        .filter(Condition::eq(catalog.product("category"), 1))
        .and(Condition::gt(catalog.product("price"), 15).unwrap())
        .unwrap();

    let query = update.build().unwrap();
    assert_sql_contains(&query.sql, &[
        "UPDATE products SET price = ?, name = ?",
        "WHERE ((products.category) = (?)) AND ((products.price) > (?))",
    ]);
    assert_eq!(query.params, [
        Value::Real(1.0),
        Value::from("cheap"),
        Value::Integer(1),
        Value::Integer(15)
    ]);

    assert_eq!(update.execute().unwrap(), 1);
    let row = catalog
        .products_table()
        .select(&[catalog.product("name")])
        .filter(Condition::eq(catalog.product("id"), 2))
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(row.fetch::<String>(catalog.product("name")).unwrap(), "cheap");
}

#[test]
fn filtered_delete() {
    let catalog = Catalog::seeded();
    let delete =
        catalog.products_table().delete().filter(Condition::like(catalog.product("name"), "a").unwrap());

    let query = delete.build().unwrap();
    assert_sql_contains(&query.sql, &["DELETE FROM products WHERE", "LIKE (?)"]);

    // hammer, saw and rake all contain an `a`
    assert_eq!(delete.execute().unwrap(), 3);
}

#[test]
fn delete_without_filter_empties_table() {
    let catalog = Catalog::seeded();
    let delete = catalog.products_table().delete();
    assert_sql_lacks(&delete.build().unwrap().sql, "WHERE");

    assert_eq!(delete.execute().unwrap(), 3);
    assert!(catalog.products_table().select_all().first().unwrap().is_none());
}

#[test]
fn deleting_parent_cascades() {
    let catalog = Catalog::seeded();
    catalog
        .categories_table()
        .delete()
        .filter(Condition::eq(catalog.category("name"), "tools"))
        .execute()
        .unwrap();

    let rows = catalog.products_table().select_all().all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fetch::<String>(catalog.product("name")).unwrap(), "rake");
}

#[test]
fn updating_parent_key_cascades() {
    let catalog = Catalog::seeded();
    catalog
        .categories_table()
        .update([(catalog.category("id"), 20)])
        .unwrap()
        .filter(Condition::eq(catalog.category("id"), 2))
        .execute()
        .unwrap();

    let row = catalog
        .products_table()
        .select_all()
        .filter(Condition::eq(catalog.product("name"), "rake"))
        .first()
        .unwrap()
        .unwrap();
    assert_eq!(row.fetch::<i64>(catalog.product("category")).unwrap(), 20);
    assert_eq!(row.fetch::<String>(catalog.category("name")).unwrap(), "garden");
}

#[test]
fn rollback_discards_statements() {
    let catalog = Catalog::seeded();

    catalog.registry.begin().unwrap();
    catalog.products_table().delete().execute().unwrap();
    assert!(catalog.products_table().select_all().first().unwrap().is_none());
    catalog.registry.rollback().unwrap();

    assert_eq!(catalog.products_table().select_all().all().unwrap().len(), 3);
}

#[test]
fn commit_keeps_statements() {
    let catalog = Catalog::seeded();

    catalog.registry.begin().unwrap();
    catalog.products_table().insert([(catalog.product("name"), "drill")]).unwrap().execute().unwrap();
    catalog.registry.commit().unwrap();

    assert_eq!(catalog.products_table().select_all().all().unwrap().len(), 4);
}

#[test]
fn commit_without_transaction_is_an_engine_error() {
    let catalog = Catalog::new();
    assert!(matches!(catalog.registry.commit(), Err(Error::Engine(_))));
}
