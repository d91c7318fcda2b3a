//! Record trait - persistence operations shared by every entity type
//!
//! A record with no identity has never been written: `save` inserts it
//! and captures the identity SQLite assigns. A record with an identity is
//! updated in place. Owned associations are synchronized in the same
//! transaction as the row write.

use crate::{Error, Result};
use crate::loader::{GraphLoader, LoadDepth};
use crate::storage::SqliteStore;

pub(crate) mod sealed {
    use rusqlite::Connection;
    use crate::Result;
    use crate::loader::{GraphLoader, LoadDepth};

    /// Row-level hooks used by the provided methods of [`super::Record`]
    pub trait RowWriter: Sized {
        /// Insert a new row and return its identity
        fn insert_row(&self, conn: &Connection) -> Result<i64>;

        /// Update the row with `id`, returning the number of rows changed
        fn update_row(&self, conn: &Connection, id: i64) -> Result<usize>;

        /// Rewrite the junction rows this record owns
        fn sync_links(&self, _conn: &Connection, _id: i64) -> Result<()> {
            Ok(())
        }

        /// Record the identity after the save commits. Never overwrites.
        fn assign_id(&mut self, id: i64);

        fn fetch(loader: &GraphLoader<'_>, id: i64, depth: LoadDepth) -> Result<Option<Self>>;

        fn fetch_all(loader: &GraphLoader<'_>, depth: LoadDepth) -> Result<Vec<Self>>;
    }
}

/// An entity persisted in its own table
pub trait Record: sealed::RowWriter {
    /// Backing table
    const TABLE: &'static str;

    /// Human-readable entity name used in messages
    const KIND: &'static str;

    /// How far `find_by_id` and `find_all` follow associations
    const DEFAULT_DEPTH: LoadDepth;

    /// Identity assigned at first insert, `None` until then
    fn id(&self) -> Option<i64>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    /// Insert or update this record, then synchronize its associations.
    ///
    /// Returns the identity. On failure nothing is committed and the
    /// in-memory identity is left as it was.
    fn save(&mut self, store: &mut SqliteStore) -> Result<i64> {
        let conn = store.connection()?;
        let tx = conn.transaction().map_err(Error::Persistence)?;

        let id = match self.id() {
            Some(id) => {
                if self.update_row(&tx, id)? == 0 {
                    return Err(Error::MissingRow { table: Self::TABLE, id });
                }
                id
            }
            None => self.insert_row(&tx)?,
        };
        self.sync_links(&tx, id)?;
        tx.commit().map_err(Error::Persistence)?;

        self.assign_id(id);
        tracing::debug!("Saved {} {}", Self::KIND, id);
        Ok(id)
    }

    /// Load one record with its associations, or `None` if no row matches
    fn find_by_id(store: &mut SqliteStore, id: i64) -> Result<Option<Self>> {
        Self::find_by_id_with_depth(store, id, Self::DEFAULT_DEPTH)
    }

    fn find_by_id_with_depth(store: &mut SqliteStore, id: i64, depth: LoadDepth) -> Result<Option<Self>> {
        let conn = store.connection()?;
        Self::fetch(&GraphLoader::new(conn), id, depth)
    }

    /// Load every record of this type. Order is the table's natural order.
    fn find_all(store: &mut SqliteStore) -> Result<Vec<Self>> {
        Self::find_all_with_depth(store, Self::DEFAULT_DEPTH)
    }

    fn find_all_with_depth(store: &mut SqliteStore, depth: LoadDepth) -> Result<Vec<Self>> {
        let conn = store.connection()?;
        Self::fetch_all(&GraphLoader::new(conn), depth)
    }

    /// Delete this record's row.
    ///
    /// Junction rows that reference it are left in place. Returns `false`
    /// if the row was already gone.
    fn delete(&self, store: &mut SqliteStore) -> Result<bool> {
        let id = self.id().ok_or_else(|| Error::unsaved(Self::KIND, "delete"))?;
        let conn = store.connection()?;
        let removed = conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", Self::TABLE), [id])
            .map_err(Error::Persistence)?;

        tracing::debug!("Deleted {} {} ({} row)", Self::KIND, id, removed);
        Ok(removed > 0)
    }
}
