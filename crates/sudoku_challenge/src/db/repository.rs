//! SQLite repository for leaderboard players.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use tracing::{debug, info, instrument};

use crate::db::gateway::page_offset;
use crate::db::{
    DbError, Gateway, MIGRATIONS, PAGE_SIZE, Person, PersonGateway, PersonRecord, PersonValues,
    schema,
};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for [`Person`] rows.
///
/// Holds only the database path. Every operation opens its own connection
/// and runs inside a single transaction.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    db_path: String,
}

impl PersonRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// `":memory:"` gives each operation a fresh empty database, so use a
    /// file path for anything that needs to persist between calls.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating PersonRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Applies any pending schema migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        for version in &applied {
            info!(version = %version, "Migration applied");
        }
        Ok(applied.len())
    }
}

impl Gateway<Person> for PersonRepository {
    #[instrument(skip(self, entity), fields(external_id = entity.external_id()))]
    fn save(&self, entity: Person) -> Result<Person, DbError> {
        let mut conn = self.connection()?;
        let values = PersonValues::from(&entity);

        let record = conn.transaction::<_, DbError, _>(|conn| {
            let record = match entity.id() {
                None => diesel::insert_into(schema::persons::table)
                    .values(&values)
                    .returning(PersonRecord::as_returning())
                    .get_result(conn)?,
                Some(id) => diesel::update(schema::persons::table.find(id))
                    .set(&values)
                    .returning(PersonRecord::as_returning())
                    .get_result(conn)?,
            };
            Ok(record)
        })?;

        let person = Person::from(record);
        info!(id = ?person.id(), points = person.points(), "Person saved");
        Ok(person)
    }

    #[instrument(skip(self))]
    fn find_by_id(&self, id: i64) -> Result<Option<Person>, DbError> {
        let mut conn = self.connection()?;

        let record = conn.transaction::<_, DbError, _>(|conn| {
            Ok(schema::persons::table
                .find(id)
                .select(PersonRecord::as_select())
                .first(conn)
                .optional()?)
        })?;

        debug!(found = record.is_some(), "Lookup by id finished");
        Ok(record.map(Person::from))
    }

    #[instrument(skip(self))]
    fn delete(&self, id: i64) -> Result<Person, DbError> {
        let mut conn = self.connection()?;

        let record = conn.transaction::<_, DbError, _>(|conn| {
            let record = schema::persons::table
                .find(id)
                .select(PersonRecord::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| DbError::new(format!("No person with id {}", id)))?;
            diesel::delete(schema::persons::table.find(id)).execute(conn)?;
            Ok(record)
        })?;

        info!(id, "Person deleted");
        Ok(Person::from(record))
    }

    #[instrument(skip(self))]
    fn get_all(&self) -> Result<Vec<Person>, DbError> {
        let mut conn = self.connection()?;

        let records = conn.transaction::<_, DbError, _>(|conn| {
            Ok(schema::persons::table
                .order(schema::persons::id.asc())
                .select(PersonRecord::as_select())
                .load(conn)?)
        })?;

        debug!(count = records.len(), "Persons loaded");
        Ok(records.into_iter().map(Person::from).collect())
    }

    #[instrument(skip(self))]
    fn get_page(&self, page: u32) -> Result<Vec<Person>, DbError> {
        let mut conn = self.connection()?;

        let records = conn.transaction::<_, DbError, _>(|conn| {
            Ok(schema::persons::table
                .order(schema::persons::id.asc())
                .limit(PAGE_SIZE)
                .offset(page_offset(page))
                .select(PersonRecord::as_select())
                .load(conn)?)
        })?;

        debug!(page, count = records.len(), "Page loaded");
        Ok(records.into_iter().map(Person::from).collect())
    }
}

impl PersonGateway for PersonRepository {
    /// Indexed lookup on the unique `external_id` column.
    #[instrument(skip(self))]
    fn find_by_external_id(&self, external_id: i64) -> Result<Option<Person>, DbError> {
        let mut conn = self.connection()?;

        let record = conn.transaction::<_, DbError, _>(|conn| {
            Ok(schema::persons::table
                .filter(schema::persons::external_id.eq(external_id))
                .select(PersonRecord::as_select())
                .first(conn)
                .optional()?)
        })?;

        debug!(found = record.is_some(), "Lookup by external id finished");
        Ok(record.map(Person::from))
    }
}
