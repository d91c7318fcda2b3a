use rusqlite::{Connection, Row, params};
use serde::Serialize;
use crate::{Error, Result};
use crate::loader::{GraphLoader, LoadDepth};
use crate::members::Members;
use crate::record::{Record, sealed::RowWriter};
use crate::storage::TEACHER_SECTIONS;
use super::ClassSection;

/// A teacher and the class sections they teach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teacher {
    id: Option<i64>,
    name: String,
    sections: Members<ClassSection>,
}

impl Teacher {
    /// A new, unsaved teacher with no sections
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sections: Members::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn sections(&self) -> &Members<ClassSection> {
        &self.sections
    }

    pub fn section_ids(&self) -> Vec<i64> {
        self.sections.ids().collect()
    }

    /// Assign a saved section. Returns `Ok(false)` if already assigned.
    ///
    /// Takes effect in storage on the next [`Record::save`].
    pub fn add_section(&mut self, section: ClassSection) -> Result<bool> {
        self.sections.insert(section)
    }

    pub fn remove_section(&mut self, section_id: i64) -> Option<ClassSection> {
        self.sections.remove(section_id)
    }

    pub fn clear_sections(&mut self) {
        self.sections.clear();
    }

    /// Columns: id, name
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            sections: Members::new(),
        })
    }
}

impl RowWriter for Teacher {
    fn insert_row(&self, conn: &Connection) -> Result<i64> {
        conn.execute("INSERT INTO teachers (name) VALUES (?1)", [&self.name])
            .map_err(Error::Persistence)?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(&self, conn: &Connection, id: i64) -> Result<usize> {
        conn.execute(
            "UPDATE teachers SET name = ?1 WHERE id = ?2",
            params![self.name, id],
        )
        .map_err(Error::Persistence)
    }

    fn sync_links(&self, conn: &Connection, id: i64) -> Result<()> {
        TEACHER_SECTIONS.replace_all(conn, id, self.sections.ids())?;
        Ok(())
    }

    fn assign_id(&mut self, id: i64) {
        self.id.get_or_insert(id);
    }

    fn fetch(loader: &GraphLoader<'_>, id: i64, depth: LoadDepth) -> Result<Option<Self>> {
        loader.teacher(id, depth)
    }

    fn fetch_all(loader: &GraphLoader<'_>, depth: LoadDepth) -> Result<Vec<Self>> {
        loader.teachers(depth)
    }
}

impl Record for Teacher {
    const TABLE: &'static str = "teachers";
    const KIND: &'static str = "teacher";
    /// Sections, and the students of each section
    const DEFAULT_DEPTH: LoadDepth = LoadDepth::hops(2);

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl std::fmt::Display for Teacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Teacher {} {}, {} section(s)",
            super::display_id(self.id),
            self.name,
            self.sections.len()
        )
    }
}
