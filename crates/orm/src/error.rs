//! Errors

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain level error type returned by the ORM.
#[derive(Error, Debug)]
pub enum Error {
    // --- Declaration errors ---
    /// A foreign key names a column its target model does not have.
    #[error("incorrect foreign key: {0}")]
    IncorrectForeignKey(String),

    /// Arguments do not fit the model they are applied to.
    #[error("incorrect arguments: {0}")]
    IncorrectArguments(String),

    /// A model references a table the registry has not seen yet.
    #[error("model `{table}` references `{target}`, which is not registered")]
    UnregisteredDependency {
        /// Table being registered.
        table: String,
        /// Referenced table that is missing.
        target: String,
    },

    /// A builder was requested for a model the registry does not know.
    #[error("model `{0}` is not registered")]
    ModelNotRegistered(String),

    // --- Query construction errors ---
    /// The operator cannot be rendered safely for the given operand.
    #[error("condition not implemented: {0}")]
    ConditionNotImplemented(String),

    /// `and`/`or` was called before `filter`.
    #[error("`and`/`or` must follow `filter`")]
    IncorrectWhereOrder,

    /// A result value cannot be converted to the requested type.
    #[error("column `{column}` holds {found}, expected {expected}")]
    UnexpectedType {
        /// Alias of the column that was read.
        column: String,
        /// What the conversion wanted.
        expected: String,
        /// Storage class actually found.
        found: &'static str,
    },

    // --- Classified engine errors ---
    /// The statement references a table that does not exist.
    #[error("table does not exist: {0}")]
    TableNotExists(String),

    /// The statement references a column that does not exist.
    #[error("column does not exist: {0}")]
    ColumnNotExists(String),

    /// A `NOT NULL` column received a null.
    #[error("not null constraint violated: {0}")]
    NotNullViolation(String),

    /// Any other engine failure, propagated unchanged.
    #[error(transparent)]
    Engine(anyhow::Error),
}

/// Classify a storage-engine error.
///
/// The full message chain is matched case-insensitively, first match wins.
/// Anything unrecognised is passed through as [`Error::Engine`].
#[must_use]
pub fn translate(err: anyhow::Error) -> Error {
    let msg = format!("{err:#}").to_lowercase();
    tracing::debug!(error = %msg, "translating engine error");

    if msg.contains("no such table") {
        return Error::TableNotExists(msg);
    }
    if msg.contains("no such column") {
        return Error::ColumnNotExists(msg);
    }
    if msg.contains("not null constraint failed") {
        return Error::NotNullViolation(msg);
    }
    Error::Engine(err)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn classifies_known_messages() {
        let err = translate(anyhow!("no such table: ghosts"));
        assert!(matches!(err, Error::TableNotExists(msg) if msg.contains("ghosts")));

        let err = translate(anyhow!("No Such Column: products.sku"));
        assert!(matches!(err, Error::ColumnNotExists(_)));

        let err = translate(anyhow!("NOT NULL constraint failed: products.name"));
        assert!(matches!(err, Error::NotNullViolation(_)));
    }

    #[test]
    fn matches_through_context() {
        let err = anyhow!("no such table: ghosts").context("failed to prepare statement");
        assert!(matches!(translate(err), Error::TableNotExists(_)));
    }

    #[test]
    fn table_wins_over_column() {
        let err = translate(anyhow!("no such column in no such table"));
        assert!(matches!(err, Error::TableNotExists(_)));
    }

    #[test]
    fn unknown_errors_pass_through() {
        let err = translate(anyhow!("FOREIGN KEY constraint failed"));
        let Error::Engine(inner) = err else {
            panic!("expected unclassified engine error");
        };
        assert_eq!(inner.to_string(), "FOREIGN KEY constraint failed");
    }
}
