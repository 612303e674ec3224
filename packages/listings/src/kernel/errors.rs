use thiserror::Error;

/// Failures surfaced by the listing and contact stores.
///
/// `Fetch` is transient (store unreachable, malformed query). `NotFound` and
/// `PermissionDenied` are answers about a specific record and are never
/// retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Fetch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Postgres SQLSTATE for insufficient_privilege (row-level security, grants)
const INSUFFICIENT_PRIVILEGE: &str = "42501";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) =>
            {
                StoreError::PermissionDenied(db_err.message().to_string())
            }
            _ => StoreError::Fetch(err.to_string()),
        }
    }
}
