//! # School Manager - record keeping for a small institution
//!
//! Tracks students, teachers and class sections, plus the many-to-many
//! links between them (teacher ↔ section, section ↔ student).
//!
//! School Manager provides:
//! - SQLite-backed storage with an idempotent schema
//! - Entity records that insert or update themselves by identity
//! - Replace-all synchronization of junction tables on save
//! - A graph loader with an explicit, finite load depth

pub mod config;
pub mod entity;
pub mod loader;
pub mod members;
pub mod record;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use entity::{ClassSection, Student, Teacher};
pub use loader::{GraphLoader, LoadDepth};
pub use members::Members;
pub use record::Record;
pub use storage::{DbStats, Junction, SqliteStore};

/// Result type alias for School Manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for School Manager operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(#[source] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Query error: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[source] rusqlite::Error),

    #[error("Persistence error: no {table} row with id {id}")]
    MissingRow { table: &'static str, id: i64 },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Schema,
    Query,
    Persistence,
    InvalidOperation,
    Io,
}

impl Error {
    /// Category used by callers that only care about the kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection(_) => ErrorKind::Connection,
            Error::Schema(_) => ErrorKind::Schema,
            Error::Query(_) => ErrorKind::Query,
            Error::Persistence(_) | Error::MissingRow { .. } => ErrorKind::Persistence,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn unsaved(what: &str, action: &str) -> Self {
        Error::InvalidOperation(format!("cannot {action} a {what} that has never been saved"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let missing = Error::MissingRow { table: "students", id: 4 };
        assert_eq!(missing.kind(), ErrorKind::Persistence);
        assert_eq!(missing.to_string(), "Persistence error: no students row with id 4");

        let invalid = Error::unsaved("student", "delete");
        assert_eq!(invalid.kind(), ErrorKind::InvalidOperation);
        assert!(invalid.to_string().contains("never been saved"));
    }
}
