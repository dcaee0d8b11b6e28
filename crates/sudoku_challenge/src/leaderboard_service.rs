//! Player login, score recording and top-list business logic.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument, warn};

use crate::{BaseService, DbError, Person, PersonGateway};

/// Number of entries returned by [`LeaderboardService::get_top`].
pub const TOP_SIZE: usize = 10;

/// Joins first and last name the way they are shown on the leaderboard.
pub fn compose_full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// Service layer for leaderboard operations.
///
/// Wraps a [`BaseService`] over [`Person`] with get-or-create login,
/// score recording and the top-10 ranking. Clones share the write lock.
#[derive(Debug, Clone)]
pub struct LeaderboardService<G> {
    base: BaseService<Person, G>,
    // Serializes find-then-save so two requests for one player cannot both insert.
    write_lock: Arc<Mutex<()>>,
}

impl<G: PersonGateway> LeaderboardService<G> {
    /// Creates a new leaderboard service backed by the given gateway.
    #[instrument(skip(gateway))]
    pub fn new(gateway: G) -> Self {
        info!("Creating LeaderboardService");
        Self {
            base: BaseService::new(gateway),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the generic CRUD service.
    pub fn base(&self) -> &BaseService<Person, G> {
        &self.base
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, DbError> {
        self.write_lock
            .lock()
            .map_err(|_| DbError::new("Leaderboard write lock poisoned"))
    }

    /// Logs a player in, creating the record on first sight.
    ///
    /// An existing player gets the composed name written over the stored
    /// one and keeps their points. A new player starts with zero points.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self, first_name, last_name))]
    pub fn login(
        &self,
        external_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<Person, DbError> {
        let full_name = compose_full_name(first_name, last_name);
        debug!(full_name = %full_name, "Logging in player");

        let _guard = self.lock_writes()?;

        if let Some(mut person) = self.base.gateway().find_by_external_id(external_id)? {
            info!(id = ?person.id(), "Existing player found");
            person.set_full_name(Some(full_name));
            return self.base.save(person);
        }

        info!("Creating new player");
        self.base.save(Person::with_name(external_id, full_name))
    }

    /// Adds `points_delta` to a known player's score.
    ///
    /// Returns `Ok(None)` and stores nothing when the player has never
    /// logged in.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn record_solved(
        &self,
        external_id: i64,
        points_delta: i64,
    ) -> Result<Option<Person>, DbError> {
        let _guard = self.lock_writes()?;

        let Some(mut person) = self.base.gateway().find_by_external_id(external_id)? else {
            warn!("Solve reported for unknown player, ignoring");
            return Ok(None);
        };

        let points = person.points().saturating_add(points_delta);
        debug!(old = person.points(), new = points, "Updating points");
        person.set_points(points);

        let saved = self.base.save(person)?;
        info!(id = ?saved.id(), points = saved.points(), "Solve recorded");
        Ok(Some(saved))
    }

    /// Returns exactly [`TOP_SIZE`] players, highest points first.
    ///
    /// Missing slots are filled with [`Person::placeholder`] entries. The
    /// sort is stable, so real players with zero points stay ahead of
    /// placeholders and ties keep store order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails.
    #[instrument(skip(self))]
    pub fn get_top(&self) -> Result<Vec<Person>, DbError> {
        let mut all = self.base.get_all()?;
        let players = all.len();

        while all.len() < TOP_SIZE {
            all.push(Person::placeholder());
        }
        all.sort_by(|a, b| b.points().cmp(a.points()));
        all.truncate(TOP_SIZE);

        debug!(players, placeholders = TOP_SIZE.saturating_sub(players), "Top list built");
        Ok(all)
    }
}
