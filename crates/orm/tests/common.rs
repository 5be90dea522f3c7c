//! Common test helpers shared across integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use quarry_orm::{Column, ColumnDef, Model, Registry, SqliteDb, Table, Value};

// Common test models used across multiple test files

pub fn categories() -> Arc<Model> {
    Model::builder("categories")
        .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
        .column("name", ColumnDef::new("varchar(100)").not_null())
        .build()
        .unwrap()
}

pub fn products(categories: &Arc<Model>) -> Arc<Model> {
    Model::builder("products")
        .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
        .column("name", ColumnDef::new("varchar(100)").not_null())
        .column("price", ColumnDef::new("REAL").default_value(0.0))
        .column("category", ColumnDef::new("INTEGER").references(categories, "id").unwrap())
        .build()
        .unwrap()
}

/// In-memory database with `categories` and `products` registered and created.
pub struct Catalog {
    pub registry: Registry,
    pub categories: Arc<Model>,
    pub products: Arc<Model>,
}

impl Catalog {
    pub fn new() -> Self {
        let categories = categories();
        let products = products(&categories);

        let mut registry = Registry::new(SqliteDb::in_memory().unwrap());
        registry.register(&categories, true).unwrap();
        registry.register(&products, true).unwrap();

        Self {
            registry,
            categories,
            products,
        }
    }

    /// `tools` (id 1) and `garden` (id 2), with hammer, saw and rake.
    pub fn seeded() -> Self {
        let catalog = Self::new();

        let categories = catalog.categories_table();
        for name in ["tools", "garden"] {
            categories.insert([(catalog.category("name"), name)]).unwrap().execute().unwrap();
        }

        let products = catalog.products_table();
        for (name, price, category) in [("hammer", 12.5, 1), ("saw", 20.0, 1), ("rake", 8.0, 2)] {
            products
                .insert([
                    (catalog.product("name"), Value::from(name)),
                    (catalog.product("price"), Value::from(price)),
                    (catalog.product("category"), Value::from(category)),
                ])
                .unwrap()
                .execute()
                .unwrap();
        }
        catalog
    }

    pub fn category(&self, name: &str) -> &Column {
        self.categories.column(name).unwrap()
    }

    pub fn product(&self, name: &str) -> &Column {
        self.products.column(name).unwrap()
    }

    pub fn categories_table(&self) -> Table {
        self.registry.table(&self.categories).unwrap()
    }

    pub fn products_table(&self) -> Table {
        self.registry.table(&self.products).unwrap()
    }
}

/// Normalize SQL by collapsing whitespace.
fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize SQL for comparison by removing identifier quotes and normalizing whitespace.
/// Preserves quotes inside string literals.
fn canonicalize_sql(sql: &str) -> String {
    let mut cleaned = String::with_capacity(sql.len());
    let mut in_single_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_single_quote = !in_single_quote;
                cleaned.push(ch);
            }
            '"' if !in_single_quote => {}
            _ => cleaned.push(ch),
        }
    }

    normalize_sql(&cleaned)
}

/// Assert that SQL contains all expected fragments in order.
///
/// Identifier quotes are stripped and whitespace normalized before matching,
/// so fragments can be written the way the statement reads.
#[allow(clippy::missing_panics_doc)]
pub fn assert_sql_contains(actual: &str, fragments: &[&str]) {
    let actual_canonical = canonicalize_sql(actual);
    let mut search_start = 0usize;

    for fragment in fragments {
        let fragment_canonical = canonicalize_sql(fragment);
        if fragment_canonical.is_empty() {
            continue;
        }

        if let Some(pos) = actual_canonical[search_start..].find(&fragment_canonical) {
            search_start += pos + fragment_canonical.len();
        } else {
            panic!(
                "expected SQL fragment `{fragment_canonical}` not found in `{actual_canonical}`"
            );
        }
    }
}

/// Assert that a fragment does not appear anywhere in the SQL.
#[allow(clippy::missing_panics_doc)]
pub fn assert_sql_lacks(actual: &str, fragment: &str) {
    let actual_canonical = canonicalize_sql(actual);
    assert!(
        !actual_canonical.contains(&canonicalize_sql(fragment)),
        "unexpected SQL fragment `{fragment}` in `{actual_canonical}`"
    );
}
