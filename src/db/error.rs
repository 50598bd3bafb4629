//! Database error taxonomy.

use thiserror::Error;

/// SQLSTATE reported when the server terminates a connection on the
/// administrator's initiative (`pg_terminate_backend`, endpoint suspend).
/// This is the only code worth retrying a query over: the statement never
/// ran, so re-issuing it cannot duplicate side effects.
pub const SQLSTATE_ADMIN_SHUTDOWN: &str = "57P01";

/// Errors produced by the connection layer.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// The connection string or pool parameters are unusable. Fatal at
    /// process start, never retried.
    #[error("database configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure while establishing or using a connection.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// Initialization exhausted its retry budget.
    #[error("database unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },

    /// An error reported by the database server itself, carrying its
    /// SQLSTATE when one was provided.
    #[error("database error: {message}")]
    Backend {
        code: Option<String>,
        message: String,
    },
}

impl DbError {
    /// SQLSTATE of a server-reported error, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            DbError::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether this error is a server-initiated disconnect.
    pub fn is_admin_shutdown(&self) -> bool {
        self.code() == Some(SQLSTATE_ADMIN_SHUTDOWN)
    }

    /// Whether the caller should treat this as "temporarily unavailable"
    /// rather than a request-level failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::Connection(_) | DbError::Unavailable { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => DbError::Backend {
                code: db_err.code().map(|c| c.into_owned()),
                message: db_err.message().to_string(),
            },
            sqlx::Error::Configuration(e) => DbError::Configuration(e.to_string()),
            _ => DbError::Connection(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_shutdown_detection() {
        let err = DbError::Backend {
            code: Some(SQLSTATE_ADMIN_SHUTDOWN.to_string()),
            message: "terminating connection due to administrator command".to_string(),
        };
        assert!(err.is_admin_shutdown());

        let unique_violation = DbError::Backend {
            code: Some("23505".to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert!(!unique_violation.is_admin_shutdown());

        let transport = DbError::Connection("connection refused".to_string());
        assert!(!transport.is_admin_shutdown());
        assert_eq!(transport.code(), None);
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(DbError::Connection("reset".into()).is_unavailable());
        assert!(DbError::Unavailable {
            attempts: 3,
            message: "refused".into()
        }
        .is_unavailable());
        assert!(!DbError::Configuration("bad url".into()).is_unavailable());
        assert!(!DbError::Backend {
            code: None,
            message: "syntax error".into()
        }
        .is_unavailable());
    }
}
