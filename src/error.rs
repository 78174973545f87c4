//! Error type shared by the store, the ranking engine and the façade.
//!
//! Absence is not an error here: fetch-by-id helpers return `Option`. The
//! variants below cover the cases the caller actually has to react to.

use rusqlite::ErrorCode;

/// Convenience alias used throughout the crate.
pub type Result<T, E = JournalError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// A dimension key outside the fixed set of eight.
    #[error("invalid experience dimension: {0:?}")]
    InvalidDimension(String),

    /// Rejected input from the form layer (blank cafe name, bad date, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A foreign key pointed nowhere or an identity was reused.
    #[error("{what}: constraint violated")]
    Constraint {
        what: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Update or delete targeted a record that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{what}")]
    Sqlite {
        what: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{what}")]
    Io {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("could not locate home directory")]
    NoHomeDir,
}

impl JournalError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        JournalError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True when the error came from a violated SQLite constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(self, JournalError::Constraint { .. })
    }
}

/// Attach a short description of the failed step to a SQLite result, sorting
/// constraint violations into their own variant.
pub trait SqlContext<T> {
    fn context(self, what: &'static str) -> Result<T>;
}

impl<T> SqlContext<T> for std::result::Result<T, rusqlite::Error> {
    fn context(self, what: &'static str) -> Result<T> {
        self.map_err(|source| {
            if matches!(
                source.sqlite_error_code(),
                Some(ErrorCode::ConstraintViolation)
            ) {
                JournalError::Constraint { what, source }
            } else {
                JournalError::Sqlite { what, source }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn constraint_failures_are_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY NOT NULL)")
            .unwrap();
        conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap();

        let err = conn
            .execute("INSERT INTO t (id) VALUES ('a')", [])
            .context("failed to insert row")
            .unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(err.to_string(), "failed to insert row: constraint violated");
    }

    #[test]
    fn other_failures_keep_their_description() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .execute("SELECT * FROM missing", [])
            .context("failed to query missing table")
            .unwrap_err();
        assert!(!err.is_constraint());
        assert_eq!(err.to_string(), "failed to query missing table");
    }
}
