//! Sudoku Challenge leaderboard backend.
//!
//! Players log in with an id issued by an external identity provider, earn
//! points for solved puzzles, and compete for a top-10 ranking.
//!
//! # Architecture
//!
//! - **Db**: [`Person`] entity, the generic [`Gateway`] contract, a SQLite
//!   [`PersonRepository`] and an in-memory [`MemoryGateway`]
//! - **Services**: generic [`BaseService`] CRUD plus the
//!   [`LeaderboardService`] business rules
//! - **Server**: axum routes under `/persons`
//!
//! # Example
//!
//! ```no_run
//! use sudoku_challenge::{LeaderboardService, PersonRepository};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = PersonRepository::new("sudoku_challenge.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let service = LeaderboardService::new(repository);
//! service.login(42, "Ann", "Lee")?;
//! service.record_solved(42, 350)?;
//! let top = service.get_top()?;
//! assert_eq!(top.len(), 10);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod base_service;
mod config;
mod db;
mod leaderboard_service;
mod server;

// Crate-level exports - Persistence
pub use db::{
    DbError, Entity, Gateway, MIGRATIONS, MemoryGateway, PAGE_SIZE, Person, PersonGateway,
    PersonRepository,
};

// Crate-level exports - Services
pub use base_service::BaseService;
pub use leaderboard_service::{LeaderboardService, TOP_SIZE, compose_full_name};

// Crate-level exports - Configuration
pub use config::{ConfigError, DATABASE_URL_VAR, ServerConfig};

// Crate-level exports - HTTP server
pub use server::{ApiError, LoginForm, PageQuery, SolvedForm, router};
