//! Small product catalog: two related tables, a joined select and a filtered
//! update, all inside one transaction.
//!
//! ```bash
//! RUST_LOG=quarry_orm=debug cargo run -p quarry-orm --example catalog
//! ```

use anyhow::Result;
use quarry_orm::{ColumnDef, Condition, Model, Registry, SqliteDb, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let categories = Model::builder("categories")
        .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
        .column("name", ColumnDef::new("varchar(100)").not_null())
        .build()?;

    let products = Model::builder("products")
        .column("id", ColumnDef::new("INTEGER").primary_key().autoincrement())
        .column("name", ColumnDef::new("varchar(100)").not_null())
        .column("price", ColumnDef::new("REAL").default_value(0.0))
        .column("category", ColumnDef::new("INTEGER").references(&categories, "id")?)
        .build()?;

    let mut registry = Registry::new(SqliteDb::connect()?);
    registry.register(&categories, true)?;
    registry.register(&products, true)?;

    registry.begin()?;

    let category_name = categories.column("name")?;
    registry.table(&categories)?.insert([(category_name, "Tools")])?.execute()?;
    let tools = registry.last_insert_id();
    tracing::info!(id = tools, "inserted category");

    let table = registry.table(&products)?;
    let name = products.column("name")?;
    let price = products.column("price")?;
    let category = products.column("category")?;

    for (product, cost) in [("Hammer", 12.5), ("Saw", 20.0), ("Wrench", 8.0)] {
        let inserted = table
            .insert([
                (name, Value::from(product)),
                (price, Value::from(cost)),
                (category, Value::from(tools)),
            ])?
            .execute()?;
        tracing::info!(id = inserted.last_insert_id, product, "inserted product");
    }

    let first = table.select_all().filter(Condition::like(name, "Ham")?).first()?;
    if let Some(row) = first {
        let product: String = row.fetch(name)?;
        let in_category: String = row.fetch(category_name)?;
        tracing::info!(product, category = in_category, "found");
    }

    let changed = table
        .update([(price, 9.5)])?
        .filter(Condition::lt(price, 10.0)?)
        .or(Condition::eq(name, "Saw"))?
        .execute()?;
    tracing::info!(changed, "repriced");

    for row in table.select(&[name, price, category_name]).order_by(name).all()? {
        let product: String = row.fetch(name)?;
        let cost: f64 = row.fetch(price)?;
        let in_category: String = row.fetch(category_name)?;
        println!("{product:<8} {cost:>6.2}  {in_category}");
    }

    registry.commit()?;
    Ok(())
}
