//! Graph Loader - rebuilds records together with their associations
//!
//! Teachers link to sections and sections link to students. Loading
//! follows those links through the junction tables, spending one unit of
//! [`LoadDepth`] per hop. Links only point from owner to related side and
//! the hop budget is finite, so a load always terminates.

use rusqlite::{Connection, Row};
use crate::{Error, Result};
use crate::entity::{ClassSection, Student, Teacher};
use crate::record::Record;
use crate::storage::{SECTION_STUDENTS, TEACHER_SECTIONS};

/// Number of association hops a load may follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadDepth(u8);

impl LoadDepth {
    /// Scalar columns only, collections left empty
    pub const FLAT: LoadDepth = LoadDepth(0);

    pub const fn hops(hops: u8) -> Self {
        LoadDepth(hops)
    }

    pub fn remaining(self) -> u8 {
        self.0
    }

    /// Budget left for the related side, or `None` if no hop remains
    pub fn descend(self) -> Option<LoadDepth> {
        self.0.checked_sub(1).map(LoadDepth)
    }
}

const STUDENT_COLUMNS: &str = "s.id, s.name, s.gpa";
const SECTION_COLUMNS: &str = "cs.id, cs.length";
const TEACHER_COLUMNS: &str = "t.id, t.name";

/// Reads records out of a connection
pub struct GraphLoader<'a> {
    conn: &'a Connection,
}

impl<'a> GraphLoader<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ========== Students ==========

    pub fn student(&self, id: i64) -> Result<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students s WHERE s.id = ?1");
        let mut rows = self.query(&sql, [id], Student::from_row)?;
        Ok(rows.pop())
    }

    pub fn students(&self) -> Result<Vec<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students s");
        self.query(&sql, [], Student::from_row)
    }

    /// Students enrolled in a section. Students own no links, so they are
    /// always flat.
    pub fn section_students(&self, section_id: i64) -> Result<Vec<Student>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students s \
             JOIN {} j ON s.id = j.{} \
             WHERE j.{} = ?1",
            SECTION_STUDENTS.table, SECTION_STUDENTS.related_column, SECTION_STUDENTS.owner_column
        );
        self.query(&sql, [section_id], Student::from_row)
    }

    // ========== Class sections ==========

    pub fn section(&self, id: i64, depth: LoadDepth) -> Result<Option<ClassSection>> {
        let sql = format!("SELECT {SECTION_COLUMNS} FROM class_sections cs WHERE cs.id = ?1");
        match self.query(&sql, [id], ClassSection::from_row)?.pop() {
            Some(mut section) => {
                self.populate_section(&mut section, depth)?;
                Ok(Some(section))
            }
            None => Ok(None),
        }
    }

    pub fn sections(&self, depth: LoadDepth) -> Result<Vec<ClassSection>> {
        let sql = format!("SELECT {SECTION_COLUMNS} FROM class_sections cs");
        let mut sections = self.query(&sql, [], ClassSection::from_row)?;
        for section in &mut sections {
            self.populate_section(section, depth)?;
        }
        Ok(sections)
    }

    /// Sections taught by a teacher, each populated with what `depth` allows
    pub fn teacher_sections(&self, teacher_id: i64, depth: LoadDepth) -> Result<Vec<ClassSection>> {
        let sql = format!(
            "SELECT {SECTION_COLUMNS} FROM class_sections cs \
             JOIN {} j ON cs.id = j.{} \
             WHERE j.{} = ?1",
            TEACHER_SECTIONS.table, TEACHER_SECTIONS.related_column, TEACHER_SECTIONS.owner_column
        );
        let mut sections = self.query(&sql, [teacher_id], ClassSection::from_row)?;
        for section in &mut sections {
            self.populate_section(section, depth)?;
        }
        Ok(sections)
    }

    fn populate_section(&self, section: &mut ClassSection, depth: LoadDepth) -> Result<()> {
        let (Some(id), Some(_)) = (section.id(), depth.descend()) else {
            return Ok(());
        };
        for student in self.section_students(id)? {
            section.add_student(student)?;
        }
        Ok(())
    }

    // ========== Teachers ==========

    pub fn teacher(&self, id: i64, depth: LoadDepth) -> Result<Option<Teacher>> {
        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers t WHERE t.id = ?1");
        match self.query(&sql, [id], Teacher::from_row)?.pop() {
            Some(mut teacher) => {
                self.populate_teacher(&mut teacher, depth)?;
                Ok(Some(teacher))
            }
            None => Ok(None),
        }
    }

    pub fn teachers(&self, depth: LoadDepth) -> Result<Vec<Teacher>> {
        let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers t");
        let mut teachers = self.query(&sql, [], Teacher::from_row)?;
        for teacher in &mut teachers {
            self.populate_teacher(teacher, depth)?;
        }
        Ok(teachers)
    }

    fn populate_teacher(&self, teacher: &mut Teacher, depth: LoadDepth) -> Result<()> {
        let (Some(id), Some(next)) = (teacher.id(), depth.descend()) else {
            return Ok(());
        };
        for section in self.teacher_sections(id, next)? {
            teacher.add_section(section)?;
        }
        Ok(())
    }

    fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare_cached(sql).map_err(Error::Query)?;
        let rows = stmt
            .query_map(params, map)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<T>>>()
            .map_err(Error::Query)?;
        tracing::debug!("Loaded {} row(s)", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteStore;

    /// Teacher 1 → sections {1, 2}; section 1 → students {1, 2}
    fn seed(store: &mut SqliteStore) {
        let mut ada = Student::new("Ada", 3.9);
        let mut alan = Student::new("Alan", 3.4);
        ada.save(store).unwrap();
        alan.save(store).unwrap();

        let mut morning = ClassSection::new(50);
        morning.add_student(ada).unwrap();
        morning.add_student(alan).unwrap();
        morning.save(store).unwrap();

        let mut evening = ClassSection::new(90);
        evening.save(store).unwrap();

        let mut grace = Teacher::new("Grace");
        grace.add_section(morning).unwrap();
        grace.add_section(evening).unwrap();
        grace.save(store).unwrap();
    }

    #[test]
    fn test_load_depth_descend() {
        assert_eq!(LoadDepth::FLAT.descend(), None);
        assert_eq!(LoadDepth::hops(2).descend(), Some(LoadDepth::hops(1)));
        assert_eq!(LoadDepth::hops(1).descend(), Some(LoadDepth::FLAT));
        assert_eq!(LoadDepth::hops(3).remaining(), 3);
    }

    #[test]
    fn test_teacher_depth_budget() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        seed(&mut store);
        let conn = store.connection().unwrap();
        let loader = GraphLoader::new(conn);

        let flat = loader.teacher(1, LoadDepth::FLAT).unwrap().unwrap();
        assert!(flat.sections().is_empty());

        let one = loader.teacher(1, LoadDepth::hops(1)).unwrap().unwrap();
        assert_eq!(one.sections().len(), 2);
        assert!(one.sections().iter().all(|s| s.students().is_empty()));

        let two = loader.teacher(1, LoadDepth::hops(2)).unwrap().unwrap();
        let morning = two.sections().get(1).unwrap();
        assert_eq!(morning.students().len(), 2);
        assert!(two.sections().get(2).unwrap().students().is_empty());
    }

    #[test]
    fn test_large_budget_terminates() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        seed(&mut store);
        let conn = store.connection().unwrap();
        let loader = GraphLoader::new(conn);

        let teacher = loader.teacher(1, LoadDepth::hops(u8::MAX)).unwrap().unwrap();
        assert_eq!(teacher.sections().len(), 2);
    }

    #[test]
    fn test_section_loads_students() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        seed(&mut store);
        let conn = store.connection().unwrap();
        let loader = GraphLoader::new(conn);

        let section = loader.section(1, LoadDepth::hops(1)).unwrap().unwrap();
        assert_eq!(section.length(), 50);
        let names: Vec<_> = section.students().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["Ada", "Alan"]);

        assert!(loader.section(99, LoadDepth::hops(1)).unwrap().is_none());
    }

    #[test]
    fn test_join_omits_deleted_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        seed(&mut store);
        store
            .connection()
            .unwrap()
            .execute("DELETE FROM students WHERE id = 2", [])
            .unwrap();

        let conn = store.connection().unwrap();
        let loader = GraphLoader::new(conn);
        let students = loader.section_students(1).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name(), "Ada");
    }

    #[test]
    fn test_query_error_surfaces() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let conn = store.connection().unwrap();
        conn.execute_batch("DROP TABLE section_students").unwrap();

        let err = GraphLoader::new(conn).section_students(1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Query);
    }
}
