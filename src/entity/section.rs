use rusqlite::{Connection, Row, params};
use serde::Serialize;
use crate::{Error, Result};
use crate::loader::{GraphLoader, LoadDepth};
use crate::members::Members;
use crate::record::{Record, sealed::RowWriter};
use crate::storage::SECTION_STUDENTS;
use super::Student;

/// A class section: a length in minutes and the students enrolled in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSection {
    id: Option<i64>,
    /// Minutes
    length: i64,
    students: Members<Student>,
}

impl ClassSection {
    /// A new, unsaved section with no students
    pub fn new(length: i64) -> Self {
        Self {
            id: None,
            length,
            students: Members::new(),
        }
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn set_length(&mut self, length: i64) {
        self.length = length;
    }

    pub fn students(&self) -> &Members<Student> {
        &self.students
    }

    pub fn student_ids(&self) -> Vec<i64> {
        self.students.ids().collect()
    }

    /// Enroll a saved student. Returns `Ok(false)` if already enrolled.
    ///
    /// Takes effect in storage on the next [`Record::save`].
    pub fn add_student(&mut self, student: Student) -> Result<bool> {
        self.students.insert(student)
    }

    pub fn remove_student(&mut self, student_id: i64) -> Option<Student> {
        self.students.remove(student_id)
    }

    pub fn clear_students(&mut self) {
        self.students.clear();
    }

    /// Columns: id, length
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            length: row.get(1)?,
            students: Members::new(),
        })
    }
}

impl RowWriter for ClassSection {
    fn insert_row(&self, conn: &Connection) -> Result<i64> {
        conn.execute("INSERT INTO class_sections (length) VALUES (?1)", [self.length])
            .map_err(Error::Persistence)?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection, id: i64) -> Result<usize> {
        conn.execute(
            "UPDATE class_sections SET length = ?1 WHERE id = ?2",
            params![self.length, id],
        )
        .map_err(Error::Persistence)
    }

    fn sync_links(&self, conn: &Connection, id: i64) -> Result<()> {
        SECTION_STUDENTS.replace_all(conn, id, self.students.ids())?;
        Ok(())
    }

    fn assign_id(&mut self, id: i64) {
        self.id.get_or_insert(id);
    }

    fn fetch(loader: &GraphLoader<'_>, id: i64, depth: LoadDepth) -> Result<Option<Self>> {
        loader.section(id, depth)
    }

    fn fetch_all(loader: &GraphLoader<'_>, depth: LoadDepth) -> Result<Vec<Self>> {
        loader.sections(depth)
    }
}

impl Record for ClassSection {
    const TABLE: &'static str = "class_sections";
    const KIND: &'static str = "class section";
    /// The section and its students
    const DEFAULT_DEPTH: LoadDepth = LoadDepth::hops(1);

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl std::fmt::Display for ClassSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Section {} {} min, {} student(s)",
            super::display_id(self.id),
            self.length,
            self.students.len()
        )
    }
}
