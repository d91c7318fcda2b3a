use rusqlite::{Connection, Row, params};
use serde::Serialize;
use crate::{Error, Result};
use crate::loader::{GraphLoader, LoadDepth};
use crate::record::{Record, sealed::RowWriter};

/// A student with a name and a GPA. No range is enforced on the GPA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    id: Option<i64>,
    name: String,
    gpa: f64,
}

impl Student {
    /// A new, unsaved student
    pub fn new(name: impl Into<String>, gpa: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            gpa,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn set_gpa(&mut self, gpa: f64) {
        self.gpa = gpa;
    }

    /// Columns: id, name, gpa
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            gpa: row.get(2)?,
        })
    }
}

impl RowWriter for Student {
    fn insert_row(&self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO students (name, gpa) VALUES (?1, ?2)",
            params![self.name, self.gpa],
        )
        .map_err(Error::Persistence)?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection, id: i64) -> Result<usize> {
        conn.execute(
            "UPDATE students SET name = ?1, gpa = ?2 WHERE id = ?3",
            params![self.name, self.gpa, id],
        )
        .map_err(Error::Persistence)
    }

    fn assign_id(&mut self, id: i64) {
        self.id.get_or_insert(id);
    }

    fn fetch(loader: &GraphLoader<'_>, id: i64, _depth: LoadDepth) -> Result<Option<Self>> {
        loader.student(id)
    }

    fn fetch_all(loader: &GraphLoader<'_>, _depth: LoadDepth) -> Result<Vec<Self>> {
        loader.students()
    }
}

impl Record for Student {
    const TABLE: &'static str = "students";
    const KIND: &'static str = "student";
    const DEFAULT_DEPTH: LoadDepth = LoadDepth::FLAT;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Student {} {} (GPA {:.2})", super::display_id(self.id), self.name, self.gpa)
    }
}
