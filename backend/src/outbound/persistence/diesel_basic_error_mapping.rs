//! Shared Diesel error mapping for the repositories in this module.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// Anything else.
    Query(&'static str),
}

impl DieselFailure {
    /// Whether this is a unique violation on a constraint whose name
    /// contains `fragment`.
    pub(crate) fn violates(&self, fragment: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint } => constraint
                .as_deref()
                .is_some_and(|name| name.contains(fragment)),
            _ => false,
        }
    }
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => message,
    }
}

/// Classify a Diesel error, logging driver details at debug level only.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DeserializationError(_) => DieselFailure::Query("row decoding failed"),
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found"))]
    #[case(DieselError::RollbackTransaction, DieselFailure::Query("database error"))]
    fn maps_non_database_errors_to_query(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    fn unique_violation_matches_constraint_fragment() {
        let failure = DieselFailure::UniqueViolation {
            constraint: Some("users_email_key".to_owned()),
        };
        assert!(failure.violates("email"));
        assert!(!failure.violates("slug"));
        assert!(!DieselFailure::Query("x").violates("email"));
    }

    #[rstest]
    fn pool_messages_are_preserved() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
    }
}
