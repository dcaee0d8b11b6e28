//! Storage-agnostic CRUD contract over persisted entities.

use tracing::{debug, instrument};

use crate::db::{DbError, Entity, Person};

/// Number of rows returned by [`Gateway::get_page`].
pub const PAGE_SIZE: i64 = 10;

/// CRUD and paged listing for one entity type.
///
/// Storage failures are returned unchanged; nothing here retries.
pub trait Gateway<E: Entity> {
    /// Inserts the entity when it has no id, otherwise updates the row with
    /// that id. Returns the stored value with its id assigned.
    fn save(&self, entity: E) -> Result<E, DbError>;

    /// Point lookup. A missing row is `Ok(None)`, not an error.
    fn find_by_id(&self, id: i64) -> Result<Option<E>, DbError>;

    /// Removes the row and returns its last stored state.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when no row has the given id.
    fn delete(&self, id: i64) -> Result<E, DbError>;

    /// Loads every row in primary-key order.
    fn get_all(&self) -> Result<Vec<E>, DbError>;

    /// Loads rows `[page * PAGE_SIZE, page * PAGE_SIZE + PAGE_SIZE)` in
    /// primary-key order. Pages are zero-indexed.
    fn get_page(&self, page: u32) -> Result<Vec<E>, DbError>;
}

/// Gateway for [`Person`] rows with lookup by external id.
pub trait PersonGateway: Gateway<Person> {
    /// Finds the player with the given external id.
    ///
    /// The default loads every row and scans them in order, returning the
    /// first match. Stores with an index on the external id override this.
    #[instrument(skip(self))]
    fn find_by_external_id(&self, external_id: i64) -> Result<Option<Person>, DbError> {
        let all = self.get_all()?;
        debug!(rows = all.len(), "Scanning for external id");
        Ok(all
            .into_iter()
            .find(|person| *person.external_id() == external_id))
    }
}

/// Offset of the first row on `page`.
pub(crate) fn page_offset(page: u32) -> i64 {
    i64::from(page) * PAGE_SIZE
}
