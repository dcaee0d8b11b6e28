//! Database models and domain types.

use std::hash::{Hash, Hasher};

use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::schema;

/// Identity contract shared by every persisted entity.
///
/// `TABLE` names the backing table so gateways never have to discover it
/// at runtime.
pub trait Entity {
    /// Name of the table or collection holding this entity.
    const TABLE: &'static str;

    /// Store-assigned identifier, `None` until the first save.
    fn id(&self) -> Option<i64>;

    /// Records the identifier assigned by the store.
    fn set_id(&mut self, id: i64);
}

/// A player on the leaderboard.
///
/// Equality and hashing consider only the external id, so an unsaved
/// value compares equal to the stored row for the same player.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "set_", borrow_self)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[getter(skip)]
    #[setters(skip)]
    id: Option<i64>,
    /// Identity token issued by the external login provider.
    #[serde(rename = "vk")]
    external_id: i64,
    full_name: Option<String>,
    points: i64,
}

impl Person {
    /// Name shown on placeholder rows of the top list.
    pub const PLACEHOLDER_NAME: &'static str = "None";

    /// Creates an unsaved player with no name and zero points.
    #[instrument]
    pub fn new(external_id: i64) -> Self {
        Self {
            id: None,
            external_id,
            full_name: None,
            points: 0,
        }
    }

    /// Creates an unsaved named player with zero points.
    #[instrument(skip(full_name))]
    pub fn with_name(external_id: i64, full_name: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            ..Self::new(external_id)
        }
    }

    /// Synthetic entry used to pad the top list. Never persisted.
    #[instrument]
    pub fn placeholder() -> Self {
        Self::with_name(0, Self::PLACEHOLDER_NAME)
    }

    /// Store-assigned identifier, `None` until saved.
    pub fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Person {
    const TABLE: &'static str = "persons";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.external_id == other.external_id
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.external_id.hash(state);
    }
}

/// Person row as stored in the database.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::persons)]
pub struct PersonRecord {
    id: i64,
    external_id: i64,
    full_name: Option<String>,
    points: i64,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Self {
            id: Some(record.id),
            external_id: record.external_id,
            full_name: record.full_name,
            points: record.points,
        }
    }
}

/// Column values written on insert and update.
///
/// `None` clears the stored name instead of leaving it untouched.
#[derive(Debug, Clone, Insertable, AsChangeset, new)]
#[diesel(table_name = schema::persons)]
#[diesel(treat_none_as_null = true)]
pub struct PersonValues {
    external_id: i64,
    full_name: Option<String>,
    points: i64,
}

impl From<&Person> for PersonValues {
    fn from(person: &Person) -> Self {
        Self::new(
            person.external_id,
            person.full_name.clone(),
            person.points,
        )
    }
}
