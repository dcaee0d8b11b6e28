//! In-memory gateway for any entity type.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use crate::db::gateway::page_offset;
use crate::db::{DbError, Entity, Gateway, PAGE_SIZE, Person, PersonGateway};

#[derive(Debug)]
struct Rows<E> {
    by_id: BTreeMap<i64, E>,
    last_id: i64,
}

/// Gateway keeping rows in process memory.
///
/// Ids start at 1 and are never reused. Clones share the same rows.
#[derive(Debug, Clone)]
pub struct MemoryGateway<E> {
    rows: Arc<Mutex<Rows<E>>>,
}

impl<E> Default for MemoryGateway<E> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Rows {
                by_id: BTreeMap::new(),
                last_id: 0,
            })),
        }
    }
}

impl<E: Entity> MemoryGateway<E> {
    /// Creates an empty in-memory store.
    #[instrument]
    pub fn new() -> Self {
        info!(table = E::TABLE, "Creating MemoryGateway");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows<E>>, DbError> {
        self.rows
            .lock()
            .map_err(|_| DbError::new(format!("In-memory '{}' store lock poisoned", E::TABLE)))
    }
}

impl<E: Entity + Clone> Gateway<E> for MemoryGateway<E> {
    #[instrument(skip(self, entity), fields(table = E::TABLE))]
    fn save(&self, mut entity: E) -> Result<E, DbError> {
        let mut rows = self.lock()?;
        let id = match entity.id() {
            Some(id) if rows.by_id.contains_key(&id) => id,
            Some(id) => {
                return Err(DbError::new(format!(
                    "No '{}' row with id {} to update",
                    E::TABLE,
                    id
                )));
            }
            None => {
                rows.last_id += 1;
                let id = rows.last_id;
                entity.set_id(id);
                id
            }
        };
        debug!(id, "Row stored");
        rows.by_id.insert(id, entity.clone());
        Ok(entity)
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    fn find_by_id(&self, id: i64) -> Result<Option<E>, DbError> {
        Ok(self.lock()?.by_id.get(&id).cloned())
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    fn delete(&self, id: i64) -> Result<E, DbError> {
        self.lock()?
            .by_id
            .remove(&id)
            .ok_or_else(|| DbError::new(format!("No '{}' row with id {}", E::TABLE, id)))
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    fn get_all(&self) -> Result<Vec<E>, DbError> {
        Ok(self.lock()?.by_id.values().cloned().collect())
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    fn get_page(&self, page: u32) -> Result<Vec<E>, DbError> {
        let skip = usize::try_from(page_offset(page))
            .map_err(|_| DbError::new(format!("Page {} out of range", page)))?;
        Ok(self
            .lock()?
            .by_id
            .values()
            .skip(skip)
            .take(PAGE_SIZE as usize)
            .cloned()
            .collect())
    }
}

impl PersonGateway for MemoryGateway<Person> {}
