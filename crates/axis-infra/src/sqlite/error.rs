//! Mapping from sqlx errors to [`RepositoryError`].

use axis_types::error::RepositoryError;
use sqlx::error::ErrorKind;

/// Classify a sqlx error so the HTTP boundary can pick a status.
pub(crate) fn classify(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => {
            RepositoryError::Connection
        }
        sqlx::Error::Database(db) => {
            let message = db.message().to_owned();
            match db.kind() {
                ErrorKind::UniqueViolation => RepositoryError::Conflict {
                    field: unique_field(&message),
                    detail: message,
                },
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => RepositoryError::Constraint(message),
                _ => RepositoryError::Query(message),
            }
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// Column named in `UNIQUE constraint failed: table.column[, table.column]`.
fn unique_field(message: &str) -> Option<String> {
    let (_, columns) = message.split_once(": ")?;
    let first = columns.split(',').next()?.trim();
    let column = first.rsplit_once('.').map_or(first, |(_, col)| col);
    (!column.is_empty()).then(|| column.to_string())
}
