use anyhow::{Result, bail};
use quarry_sql::Value;
use sea_query::backend::{
    EscapeBuilder, OperLeftAssocDecider, PrecedenceDecider, QuotedBuilder, TableRefBuilder,
};
use sea_query::prepare::SqlWriter;
use sea_query::{
    Alias, BinOper, ColumnRef, IntoIden, Oper, Quote, SimpleExpr, SubQueryStatement, Values,
};

/// A rendered statement: SQL text plus positional arguments, one per `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL text with `?` placeholders.
    pub sql: String,

    /// Bound arguments in placeholder order.
    pub params: Vec<Value>,
}

/// `sea-query` backend for SQLite: double-quoted identifiers and unnumbered `?`
/// placeholders.
pub struct QueryBuilder {
    quote: Quote,
    placeholder: &'static str,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            quote: Quote::new(b'"'),
            placeholder: "?",
        }
    }
}

impl QuotedBuilder for QueryBuilder {
    fn quote(&self) -> Quote {
        self.quote
    }
}

impl EscapeBuilder for QueryBuilder {}

impl TableRefBuilder for QueryBuilder {}

impl OperLeftAssocDecider for QueryBuilder {
    fn well_known_left_associative(&self, op: &BinOper) -> bool {
        // Same set as sea-query 0.32 `common_well_known_left_associative`
        matches!(
            op,
            BinOper::And | BinOper::Or | BinOper::Add | BinOper::Sub | BinOper::Mul | BinOper::Mod
        )
    }
}

impl PrecedenceDecider for QueryBuilder {
    fn inner_expr_well_known_greater_precedence(
        &self, _inner: &SimpleExpr, _outer_oper: &Oper,
    ) -> bool {
        // Always parenthesize: `filter(a).or(b).and(c)` must keep its grouping
        false
    }
}

impl sea_query::backend::QueryBuilder for QueryBuilder {
    fn prepare_query_statement(&self, query: &SubQueryStatement, sql: &mut dyn SqlWriter) {
        match query {
            SubQueryStatement::SelectStatement(s) => self.prepare_select_statement(s, sql),
            SubQueryStatement::InsertStatement(s) => self.prepare_insert_statement(s, sql),
            SubQueryStatement::UpdateStatement(s) => self.prepare_update_statement(s, sql),
            SubQueryStatement::DeleteStatement(s) => self.prepare_delete_statement(s, sql),
            SubQueryStatement::WithStatement(s) => self.prepare_with_query(s, sql),
        }
    }

    fn prepare_value(&self, value: &sea_query::Value, sql: &mut dyn SqlWriter) {
        sql.push_param(value.clone(), self);
    }

    fn placeholder(&self) -> (&str, bool) {
        (self.placeholder, false)
    }
}

pub fn table_column(table: &str, column: &str) -> ColumnRef {
    ColumnRef::TableColumn(Alias::new(table).into_iden(), Alias::new(column).into_iden())
}

// Outbound conversion
pub fn to_sea_value(value: Value) -> sea_query::Value {
    match value {
        Value::Null => sea_query::Value::String(None),
        Value::Integer(v) => sea_query::Value::BigInt(Some(v)),
        Value::Real(v) => sea_query::Value::Double(Some(v)),
        Value::Text(v) => sea_query::Value::String(Some(Box::new(v))),
        Value::Blob(v) => sea_query::Value::Bytes(Some(Box::new(v))),
    }
}

// Inbound conversion, after `sea-query` has collected the bound values
pub fn from_sea_values(values: Values) -> Result<Vec<Value>> {
    values.into_iter().map(from_sea_value).collect()
}

fn from_sea_value(value: sea_query::Value) -> Result<Value> {
    use sea_query::Value as Sea;

    let value = match value {
        Sea::Bool(v) => v.map(Value::from).unwrap_or_default(),
        Sea::TinyInt(v) => v.map(|v| Value::Integer(i64::from(v))).unwrap_or_default(),
        Sea::SmallInt(v) => v.map(|v| Value::Integer(i64::from(v))).unwrap_or_default(),
        Sea::Int(v) => v.map(Value::from).unwrap_or_default(),
        Sea::BigInt(v) => v.map(Value::Integer).unwrap_or_default(),
        Sea::TinyUnsigned(v) => v.map(|v| Value::Integer(i64::from(v))).unwrap_or_default(),
        Sea::SmallUnsigned(v) => v.map(|v| Value::Integer(i64::from(v))).unwrap_or_default(),
        Sea::Unsigned(v) => v.map(Value::from).unwrap_or_default(),
        Sea::BigUnsigned(Some(v)) => Value::Integer(i64::try_from(v)?),
        Sea::BigUnsigned(None) => Value::Null,
        Sea::Float(v) => v.map(Value::from).unwrap_or_default(),
        Sea::Double(v) => v.map(Value::Real).unwrap_or_default(),
        Sea::String(v) => v.map(|s| Value::Text(*s)).unwrap_or_default(),
        Sea::Char(v) => v.map(|ch| Value::Text(ch.to_string())).unwrap_or_default(),
        Sea::Bytes(v) => v.map(|b| Value::Blob(*b)).unwrap_or_default(),
        _ => bail!("unsupported values require explicit conversion before building the query"),
    };
    Ok(value)
}
