use quarry_sql::Value;
use sea_query::{Expr, ExprTrait, SimpleExpr};

use crate::column::Column;
use crate::error::{Error, Result};
use crate::query::{table_column, to_sea_value};

/// A bound predicate on one column.
///
/// Values never reach the SQL text: they are rendered as `?` placeholders and
/// collected into the statement's argument list. Null operands are only
/// accepted where SQL has a safe spelling for them (`IS NULL` / `IS NOT NULL`).
///
/// The named constructors are the only way to build one, so every condition
/// has already passed its operand checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    table: String,
    column: String,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Compare(Comparison, Value),
    Pattern { negated: bool, pattern: String },
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Operators a [`Condition`] can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
}

impl Condition {
    /// `column = value`, or `column IS NULL` when `value` is null.
    #[must_use]
    pub fn eq(column: &Column, value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Self::new(column, Kind::IsNull),
            value => Self::new(column, Kind::Compare(Comparison::Eq, value)),
        }
    }

    /// `column != value`, or `column IS NOT NULL` when `value` is null.
    #[must_use]
    pub fn ne(column: &Column, value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Self::new(column, Kind::IsNotNull),
            value => Self::new(column, Kind::Compare(Comparison::Ne, value)),
        }
    }

    /// `column < value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is null.
    pub fn lt(column: &Column, value: impl Into<Value>) -> Result<Self> {
        ordering(column, Comparison::Lt, value.into())
    }

    /// `column <= value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is null.
    pub fn lte(column: &Column, value: impl Into<Value>) -> Result<Self> {
        ordering(column, Comparison::Lte, value.into())
    }

    /// `column > value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is null.
    pub fn gt(column: &Column, value: impl Into<Value>) -> Result<Self> {
        ordering(column, Comparison::Gt, value.into())
    }

    /// `column >= value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is null.
    pub fn gte(column: &Column, value: impl Into<Value>) -> Result<Self> {
        ordering(column, Comparison::Gte, value.into())
    }

    /// `column LIKE '%value%'`: matches `value` anywhere in the column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is not text.
    pub fn like(column: &Column, value: impl Into<Value>) -> Result<Self> {
        pattern(column, false, value.into())
    }

    /// `column NOT LIKE '%value%'`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConditionNotImplemented`] if `value` is not text.
    pub fn not_like(column: &Column, value: impl Into<Value>) -> Result<Self> {
        pattern(column, true, value.into())
    }

    /// Table of the tested column.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Name of the tested column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The operator this condition renders.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match &self.kind {
            Kind::Compare(cmp, _) => match cmp {
                Comparison::Eq => Operator::Eq,
                Comparison::Ne => Operator::Ne,
                Comparison::Lt => Operator::Lt,
                Comparison::Lte => Operator::Lte,
                Comparison::Gt => Operator::Gt,
                Comparison::Gte => Operator::Gte,
            },
            Kind::Pattern { negated: false, .. } => Operator::Like,
            Kind::Pattern { negated: true, .. } => Operator::NotLike,
            Kind::IsNull => Operator::IsNull,
            Kind::IsNotNull => Operator::IsNotNull,
        }
    }

    /// The value this condition binds, if any.
    #[must_use]
    pub fn bound_value(&self) -> Option<Value> {
        match &self.kind {
            Kind::Compare(_, value) => Some(value.clone()),
            Kind::Pattern { pattern, .. } => Some(Value::Text(pattern.clone())),
            Kind::IsNull | Kind::IsNotNull => None,
        }
    }

    /// Convert to a ``SeaQuery`` expression.
    pub(crate) fn into_expr(self) -> SimpleExpr {
        let col: SimpleExpr = Expr::col(table_column(&self.table, &self.column)).into();
        match self.kind {
            Kind::IsNull => col.is_null(),
            Kind::IsNotNull => col.is_not_null(),
            Kind::Pattern { negated: false, pattern } => col.like(pattern),
            Kind::Pattern { negated: true, pattern } => col.not_like(pattern),
            Kind::Compare(cmp, value) => {
                let value = to_sea_value(value);
                match cmp {
                    Comparison::Eq => col.eq(value),
                    Comparison::Ne => col.ne(value),
                    Comparison::Lt => col.lt(value),
                    Comparison::Lte => col.lte(value),
                    Comparison::Gt => col.gt(value),
                    Comparison::Gte => col.gte(value),
                }
            }
        }
    }

    fn new(column: &Column, kind: Kind) -> Self {
        Self {
            table: column.table().to_string(),
            column: column.name().to_string(),
            kind,
        }
    }
}

fn ordering(column: &Column, cmp: Comparison, value: Value) -> Result<Condition> {
    if value.is_null() {
        return Err(Error::ConditionNotImplemented(format!(
            "{cmp:?} on `{}` needs a non-null operand",
            column.alias()
        )));
    }
    Ok(Condition::new(column, Kind::Compare(cmp, value)))
}

fn pattern(column: &Column, negated: bool, value: Value) -> Result<Condition> {
    let Value::Text(text) = value else {
        let op = if negated { "NOT LIKE" } else { "LIKE" };
        return Err(Error::ConditionNotImplemented(format!(
            "{op} on `{}` needs a text operand, got {}",
            column.alias(),
            value.kind()
        )));
    };
    Ok(Condition::new(
        column,
        Kind::Pattern {
            negated,
            pattern: format!("%{text}%"),
        },
    ))
}
