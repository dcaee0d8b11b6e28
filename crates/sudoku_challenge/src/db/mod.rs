//! Database persistence layer for leaderboard players.

mod error;
mod gateway;
mod memory;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub use error::DbError;
pub use gateway::{Gateway, PAGE_SIZE, PersonGateway};
pub use memory::MemoryGateway;
pub use models::{Entity, Person};
pub(crate) use models::{PersonRecord, PersonValues};
pub use repository::PersonRepository;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
