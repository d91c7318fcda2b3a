//! SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use crate::{Result, Error};
use super::junction::{SECTION_STUDENTS, TEACHER_SECTIONS};
use super::schema;

/// Handle to the school database.
///
/// Owns the single connection used for the whole process. The handle is
/// passed explicitly to every record operation; the connection is opened
/// when the store is created, re-opened on demand after [`SqliteStore::close`],
/// and released when the store is dropped.
pub struct SqliteStore {
    conn: Option<Connection>,
    /// `None` for in-memory databases
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self {
            conn: None,
            path: Some(path.to_path_buf()),
        };
        store.connection()?;
        tracing::info!("Opened school database at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut store = Self { conn: None, path: None };
        store.connection()?;
        Ok(store)
    }

    /// Location of the database file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a live connection is currently held
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Return the live connection, establishing a new one if the previous
    /// one was closed.
    ///
    /// A re-opened in-memory store starts from an empty database.
    pub fn connection(&mut self) -> Result<&mut Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.establish()?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Create every table if absent. Safe to call any number of times.
    pub fn initialize_schema(&mut self) -> Result<()> {
        let conn = self.connection()?;
        apply_schema(conn)
    }

    /// Release the connection. The next [`SqliteStore::connection`] call
    /// opens a fresh one.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, e)) = conn.close() {
                self.conn = Some(conn);
                return Err(Error::Connection(e));
            }
            tracing::info!("Closed school database");
        }
        Ok(())
    }

    fn establish(&self) -> Result<Connection> {
        let conn = match &self.path {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        }
        .map_err(Error::Connection)?;

        // Junction rows outlive deleted records, so references stay unenforced
        conn.pragma_update(None, "foreign_keys", false)
            .map_err(Error::Connection)?;

        apply_schema(&conn)?;
        Ok(conn)
    }

    /// Get database statistics
    pub fn stats(&mut self) -> Result<DbStats> {
        let conn = self.connection()?;
        let average_gpa: Option<f64> = conn
            .query_row("SELECT AVG(gpa) FROM students", [], |row| row.get(0))
            .map_err(Error::Query)?;

        Ok(DbStats {
            students: count_rows(conn, "students")?,
            teachers: count_rows(conn, "teachers")?,
            class_sections: count_rows(conn, "class_sections")?,
            teacher_sections: count_rows(conn, TEACHER_SECTIONS.table)?,
            section_students: count_rows(conn, SECTION_STUDENTS.table)?,
            dangling_links: TEACHER_SECTIONS.dangling(conn)? + SECTION_STUDENTS.dangling(conn)?,
            average_gpa: average_gpa.unwrap_or(0.0),
        })
    }
}

fn apply_schema(conn: &Connection) -> Result<()> {
    for stmt in schema::all_schema_statements() {
        conn.execute(stmt, []).map_err(Error::Schema)?;
    }
    tracing::debug!("Schema ready ({} tables)", schema::TABLES.len());
    Ok(())
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .map_err(Error::Query)?;
    Ok(count as usize)
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub students: usize,
    pub teachers: usize,
    pub class_sections: usize,
    pub teacher_sections: usize,
    pub section_students: usize,
    /// Junction rows pointing at a row that has since been deleted
    pub dangling_links: usize,
    /// 0.0 when there are no students
    pub average_gpa: f64,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Students: {}", self.students)?;
        writeln!(f, "  Teachers: {}", self.teachers)?;
        writeln!(f, "  Sections: {}", self.class_sections)?;
        writeln!(f, "  Teacher links: {}", self.teacher_sections)?;
        writeln!(f, "  Enrollments: {}", self.section_students)?;
        writeln!(f, "  Dangling links: {}", self.dangling_links)?;
        writeln!(f, "  Average GPA: {:.2}", self.average_gpa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(store: &mut SqliteStore) -> Vec<String> {
        let conn = store.connection().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap();
        names
    }

    #[test]
    fn test_schema_created_on_open() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let names = table_names(&mut store);

        let mut expected: Vec<String> = schema::TABLES.iter().map(|t| t.to_string()).collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .unwrap()
            .execute("INSERT INTO students (name, gpa) VALUES ('Ada', 3.9)", [])
            .unwrap();

        store.initialize_schema().unwrap();
        store.initialize_schema().unwrap();

        assert_eq!(store.stats().unwrap().students, 1);
    }

    #[test]
    fn test_class_sections_keeps_teacher_id_column() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('class_sections')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(columns, vec!["id", "length", "teacher_id"]);
    }

    #[test]
    fn test_close_and_reopen_in_memory() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .unwrap()
            .execute("INSERT INTO teachers (name) VALUES ('Grace')", [])
            .unwrap();

        store.close().unwrap();
        assert!(!store.is_open());
        store.close().unwrap();

        // Fresh database, schema re-applied
        let stats = store.stats().unwrap();
        assert!(store.is_open());
        assert_eq!(stats.teachers, 0);
    }

    #[test]
    fn test_close_and_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("school.db");

        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        store
            .connection()
            .unwrap()
            .execute("INSERT INTO teachers (name) VALUES ('Grace')", [])
            .unwrap();
        store.close().unwrap();

        assert_eq!(store.stats().unwrap().teachers, 1);
    }

    #[test]
    fn test_open_unreachable_path_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("school.db");

        let err = SqliteStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Connection);
    }

    fn foreign_keys_enabled(store: &mut SqliteStore) -> bool {
        store
            .connection()
            .unwrap()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_foreign_keys_not_enforced() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(!foreign_keys_enabled(&mut store));

        let dir = tempfile::tempdir().unwrap();
        let mut store = SqliteStore::open(&dir.path().join("school.db")).unwrap();
        assert!(!foreign_keys_enabled(&mut store));

        // Still off after a reconnect
        store.close().unwrap();
        assert!(!foreign_keys_enabled(&mut store));
    }

    #[test]
    fn test_delete_referenced_row_keeps_link() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        conn.execute_batch(
            "INSERT INTO teachers (name) VALUES ('Grace');
             INSERT INTO class_sections (length) VALUES (50);
             INSERT INTO teacher_sections (teacher_id, section_id) VALUES (1, 1);",
        )
        .unwrap();

        conn.execute("DELETE FROM class_sections WHERE id = 1", []).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.teacher_sections, 1);
        assert_eq!(stats.dangling_links, 1);
    }

    #[test]
    fn test_conflicting_object_is_schema_error() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .unwrap()
            .execute_batch(
                "DROP TABLE teacher_sections;
                 CREATE VIEW teacher_sections AS SELECT 1 AS teacher_id, 1 AS section_id;",
            )
            .unwrap();

        let err = store.initialize_schema().err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Schema);
    }

    #[test]
    fn test_stats_on_empty_database() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.students, 0);
        assert_eq!(stats.dangling_links, 0);
        assert_eq!(stats.average_gpa, 0.0);
    }
}
