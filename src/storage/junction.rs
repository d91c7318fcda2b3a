//! Junction tables - many-to-many association rows
//!
//! An owner (teacher or section) is linked to related rows (sections or
//! students) through a two-column table keyed by the pair of identities.
//! Synchronization is replace-all: every row for the owner is deleted and
//! the current in-memory set is re-inserted. Callers run it inside the
//! owner's save transaction so the pair of steps is atomic.

use rusqlite::{Connection, params};
use crate::{Result, Error};

/// Describes one junction table and the tables on either side of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub table: &'static str,
    pub owner_table: &'static str,
    pub owner_column: &'static str,
    pub related_table: &'static str,
    pub related_column: &'static str,
}

/// teacher ↔ class section
pub const TEACHER_SECTIONS: Junction = Junction {
    table: "teacher_sections",
    owner_table: "teachers",
    owner_column: "teacher_id",
    related_table: "class_sections",
    related_column: "section_id",
};

/// class section ↔ student
pub const SECTION_STUDENTS: Junction = Junction {
    table: "section_students",
    owner_table: "class_sections",
    owner_column: "section_id",
    related_table: "students",
    related_column: "student_id",
};

impl Junction {
    /// Make the rows for `owner_id` exactly match `related_ids`.
    ///
    /// An empty `related_ids` clears the owner's links. Returns the number
    /// of rows written.
    pub fn replace_all<I>(&self, conn: &Connection, owner_id: i64, related_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = i64>,
    {
        let removed = conn
            .execute(
                &format!("DELETE FROM {} WHERE {} = ?1", self.table, self.owner_column),
                [owner_id],
            )
            .map_err(Error::Persistence)?;

        let mut insert = conn
            .prepare_cached(&format!(
                "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
                self.table, self.owner_column, self.related_column
            ))
            .map_err(Error::Persistence)?;

        let mut written = 0;
        for related_id in related_ids {
            insert
                .execute(params![owner_id, related_id])
                .map_err(Error::Persistence)?;
            written += 1;
        }

        tracing::debug!(
            "{}: {} {} replaced {} link(s) with {}",
            self.table, self.owner_column, owner_id, removed, written
        );
        Ok(written)
    }

    /// Related identities stored for `owner_id`, including ones whose row
    /// has since been deleted
    pub fn related_ids(&self, conn: &Connection, owner_id: i64) -> Result<Vec<i64>> {
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {}",
                self.related_column, self.table, self.owner_column, self.related_column
            ))
            .map_err(Error::Query)?;

        let ids = stmt
            .query_map([owner_id], |row| row.get(0))
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(Error::Query)?;
        Ok(ids)
    }

    /// Count rows whose owner or related row no longer exists
    pub fn dangling(&self, conn: &Connection) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {j} \
             WHERE {j}.{oc} NOT IN (SELECT id FROM {ot}) \
                OR {j}.{rc} NOT IN (SELECT id FROM {rt})",
            j = self.table,
            oc = self.owner_column,
            ot = self.owner_table,
            rc = self.related_column,
            rt = self.related_table,
        );
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(Error::Query)?;
        Ok(count as usize)
    }
}
