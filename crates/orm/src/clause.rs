use sea_query::{ExprTrait, SimpleExpr};

use crate::condition::Condition;
use crate::error::{Error, Result};

/// Accumulated WHERE expression shared by select, update and delete builders.
///
/// Conditions fold strictly left to right, so `filter(a).or(b).and(c)`
/// renders as `((a) OR (b)) AND (c)`.
#[derive(Debug, Clone, Default)]
pub(crate) struct WhereClause {
    expr: Option<SimpleExpr>,
}

impl WhereClause {
    /// Starts the clause. A second call conjoins with what is already there.
    pub(crate) fn filter(&mut self, condition: Condition) {
        let next = condition.into_expr();
        self.expr = Some(match self.expr.take() {
            Some(current) => current.and(next),
            None => next,
        });
    }

    pub(crate) fn and(&mut self, condition: Condition) -> Result<()> {
        let current = self.expr.take().ok_or(Error::IncorrectWhereOrder)?;
        self.expr = Some(current.and(condition.into_expr()));
        Ok(())
    }

    pub(crate) fn or(&mut self, condition: Condition) -> Result<()> {
        let current = self.expr.take().ok_or(Error::IncorrectWhereOrder)?;
        self.expr = Some(current.or(condition.into_expr()));
        Ok(())
    }

    pub(crate) fn into_expr(self) -> Option<SimpleExpr> {
        self.expr
    }
}
