//! Generic CRUD service layer over a [`Gateway`].

use std::marker::PhantomData;

use tracing::{debug, info, instrument};

use crate::{DbError, Entity, Gateway};

/// Pass-through service for one entity type.
///
/// Each call is forwarded to the gateway unchanged, which runs it as its own
/// unit of work. Errors are not recovered here.
#[derive(Debug, Clone)]
pub struct BaseService<E, G> {
    gateway: G,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity, G: Gateway<E>> BaseService<E, G> {
    /// Creates a service backed by the given gateway.
    #[instrument(skip(gateway))]
    pub fn new(gateway: G) -> Self {
        info!(table = E::TABLE, "Creating BaseService");
        Self {
            gateway,
            entity: PhantomData,
        }
    }

    /// Returns the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Inserts or updates the entity.
    #[instrument(skip(self, entity), fields(table = E::TABLE, id = ?entity.id()))]
    pub fn save(&self, entity: E) -> Result<E, DbError> {
        debug!("Saving entity");
        self.gateway.save(entity)
    }

    /// Looks up an entity by id.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub fn find_by_id(&self, id: i64) -> Result<Option<E>, DbError> {
        self.gateway.find_by_id(id)
    }

    /// Deletes an entity by id, returning its last stored state.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub fn delete(&self, id: i64) -> Result<E, DbError> {
        debug!(id, "Deleting entity");
        self.gateway.delete(id)
    }

    /// Loads every entity.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub fn get_all(&self) -> Result<Vec<E>, DbError> {
        self.gateway.get_all()
    }

    /// Loads one zero-indexed page of entities.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub fn get_page(&self, page: u32) -> Result<Vec<E>, DbError> {
        self.gateway.get_page(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryGateway, PAGE_SIZE, Person};

    fn seeded(count: i64) -> BaseService<Person, MemoryGateway<Person>> {
        let service = BaseService::new(MemoryGateway::new());
        for external_id in 1..=count {
            service
                .save(Person::new(external_id))
                .expect("Save failed");
        }
        service
    }

    #[test]
    fn pages_are_windows_of_ten() {
        let service = seeded(25);

        let first = service.get_page(0).expect("Page failed");
        let third = service.get_page(2).expect("Page failed");
        let past_end = service.get_page(3).expect("Page failed");

        assert_eq!(first.len() as i64, PAGE_SIZE);
        assert_eq!(*first[0].external_id(), 1);
        assert_eq!(*first[9].external_id(), 10);
        assert_eq!(third.len(), 5);
        assert_eq!(*third[0].external_id(), 21);
        assert!(past_end.is_empty());
    }

    #[test]
    fn delete_returns_snapshot_and_removes_row() {
        let service = seeded(2);

        let removed = service.delete(1).expect("Delete failed");
        assert_eq!(*removed.external_id(), 1);
        assert!(service.find_by_id(1).expect("Lookup failed").is_none());
        assert_eq!(service.get_all().expect("List failed").len(), 1);
    }

    #[test]
    fn delete_missing_id_is_an_error() {
        let service = seeded(0);
        assert!(service.delete(404).is_err());
    }
}
