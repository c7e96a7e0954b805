//! Data store seam: where tournaments are read from and written to.

mod csv_import;
mod memory;
mod query;

pub use csv_import::load_csv;
pub use memory::InMemoryStore;
pub use query::{matches_all, Direction, Field, Filter, Query, Value};

use crate::models::{Tournament, TournamentDates, TournamentId, TournamentPhase, TournamentStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Errors reported by a data store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StoreError {
    /// Store could not be reached or queried (network, auth, lock poisoned...).
    #[error("data store unavailable: {0}")]
    Unavailable(String),
    #[error("tournament {0} not found")]
    NotFound(TournamentId),
    #[error("tournament {0} already exists")]
    Duplicate(TournamentId),
    /// A legacy row could not be parsed.
    #[error("row {row}: {message}")]
    Import { row: u64, message: String },
}

/// Partial update: only `Some` fields are written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TournamentPatch {
    pub name: Option<String>,
    pub game: Option<String>,
    pub status: Option<TournamentStatus>,
    pub phase: Option<TournamentPhase>,
    pub dates: Option<TournamentDates>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TournamentPatch {
    /// Status/phase change as written by the sync routine.
    pub fn status_change(status: TournamentStatus, phase: TournamentPhase, now: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            phase: Some(phase),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Write the patch into a record.
    pub fn apply_to(&self, t: &mut Tournament) {
        if let Some(name) = &self.name {
            t.name = name.clone();
        }
        if let Some(game) = &self.game {
            t.game = game.clone();
        }
        if let Some(status) = self.status {
            t.status = status;
        }
        if let Some(phase) = self.phase {
            t.phase = phase;
        }
        if let Some(d) = self.dates {
            t.registration_open_date = d.registration_open_date;
            t.registration_close_date = d.registration_close_date;
            t.playing_start_date = d.playing_start_date;
            t.finish_date = d.finish_date;
            t.payment_date = d.payment_date;
        }
        if let Some(updated_at) = self.updated_at {
            t.updated_at = updated_at;
        }
    }
}

/// A hosted or in-process tournament table.
///
/// Calls are ordinary blocking request/response calls; implementations decide
/// their own locking.
pub trait TournamentStore {
    /// Records matching the query's filters, ordered and limited.
    fn find(&self, query: &Query) -> Result<Vec<Tournament>, StoreError>;

    /// Apply `patch` to every record matching all `filters`; returns rows changed.
    fn update(&self, filters: &[Filter], patch: &TournamentPatch) -> Result<usize, StoreError>;

    fn insert(&self, tournament: Tournament) -> Result<(), StoreError>;

    /// Remove every record matching all `filters`; returns rows removed.
    fn delete(&self, filters: &[Filter]) -> Result<usize, StoreError>;

    /// Single record by id.
    fn get(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        let query = Query::new().filter(Filter::Eq(Field::Id, Value::Id(id))).limit(1);
        Ok(self.find(&query)?.into_iter().next())
    }
}
