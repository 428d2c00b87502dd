//! Translation from Diesel errors into port error variants.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Whether the error came from a unique index rejecting an insert.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Split a Diesel error into the port's connection/query variants.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    connection: impl FnOnce(String) -> E,
    query: impl FnOnce(String) -> E,
) -> E {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        other => query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(
            DieselError::NotFound,
            |m| format!("conn:{m}"),
            |m| format!("query:{m}"),
        );
        assert!(mapped.starts_with("query:"));
    }

    #[test]
    fn plain_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DieselError::NotFound));
    }
}
