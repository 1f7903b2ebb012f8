use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLite primary result code for constraint violations.
const SQLITE_CONSTRAINT: i32 = 19;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("An integrity error occurred: {0}")]
    Integrity(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<crate::seed::SeedError> for AppError {
    fn from(err: crate::seed::SeedError) -> Self {
        match err {
            crate::seed::SeedError::Database(e) => AppError::Database(e),
        }
    }
}

/// Returns true when the error is a constraint violation raised by SQLite
/// (unique, foreign key, not-null, check, or a trigger `RAISE`).
pub fn is_integrity_violation(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };

    match db_err.kind() {
        ErrorKind::UniqueViolation
        | ErrorKind::ForeignKeyViolation
        | ErrorKind::NotNullViolation
        | ErrorKind::CheckViolation => true,
        _ => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| code & 0xff == SQLITE_CONSTRAINT)
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_integrity() {
        assert!(!is_integrity_violation(&sqlx::Error::RowNotFound));
        assert!(!is_integrity_violation(&sqlx::Error::PoolClosed));
    }

    #[tokio::test]
    async fn test_unique_violation_is_integrity() {
        use sqlx::Connection;
        let mut conn = sqlx::SqliteConnection::connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE t (v TEXT UNIQUE)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t (v) VALUES ('a')")
            .execute(&mut conn)
            .await
            .unwrap();
        let err = sqlx::query("INSERT INTO t (v) VALUES ('a')")
            .execute(&mut conn)
            .await
            .unwrap_err();
        assert!(is_integrity_violation(&err));
    }

    #[tokio::test]
    async fn test_syntax_error_is_not_integrity() {
        use sqlx::Connection;
        let mut conn = sqlx::SqliteConnection::connect("sqlite::memory:")
            .await
            .unwrap();
        let err = sqlx::query("SELEC 1").execute(&mut conn).await.unwrap_err();
        assert!(!is_integrity_violation(&err));
    }
}
