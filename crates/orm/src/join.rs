use sea_query::{Alias, Expr, ExprTrait, JoinType, SelectStatement, SimpleExpr};

use crate::column::{Column, ForeignKey};
use crate::query::table_column;

/// `LEFT JOIN` derived from a foreign key on the selected model.
#[derive(Debug, Clone)]
pub(crate) struct Join {
    table: String,
    on: SimpleExpr,
}

impl Join {
    /// `LEFT JOIN target ON source.fk = target.column`
    pub(crate) fn foreign_key(source: &Column, fk: &ForeignKey) -> Self {
        let target = fk.target_column();
        let left = table_column(source.table(), source.name());
        let right = table_column(target.table(), target.name());

        Self {
            table: target.table().to_string(),
            on: Expr::col(left).eq(Expr::col(right)),
        }
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn apply(&self, statement: &mut SelectStatement) {
        statement.join(JoinType::LeftJoin, Alias::new(self.table.as_str()), self.on.clone());
    }
}
