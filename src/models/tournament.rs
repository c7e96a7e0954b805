//! Tournament record and its date fields.

use crate::models::status::{StatusPair, TournamentPhase, TournamentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// The milestone dates of a tournament, as entered by an admin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentDates {
    pub registration_open_date: NaiveDate,
    pub registration_close_date: NaiveDate,
    pub playing_start_date: NaiveDate,
    pub finish_date: NaiveDate,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl TournamentDates {
    /// True when open ≤ close ≤ playing start ≤ finish (and finish ≤ payment, when set).
    pub fn is_ordered(&self) -> bool {
        self.registration_open_date <= self.registration_close_date
            && self.registration_close_date <= self.playing_start_date
            && self.playing_start_date <= self.finish_date
            && self.payment_date.map_or(true, |p| self.finish_date <= p)
    }
}

/// A tournament as stored in the data store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Game title the tournament is played in (e.g. "Valorant").
    pub game: String,
    pub status: TournamentStatus,
    pub phase: TournamentPhase,
    pub registration_open_date: NaiveDate,
    pub registration_close_date: NaiveDate,
    pub playing_start_date: NaiveDate,
    pub finish_date: NaiveDate,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Refreshed whenever status/phase or an admin-edited field changes.
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// New tournament in (announced, pre_registration) with a fresh id.
    pub fn new(name: impl Into<String>, game: impl Into<String>, dates: TournamentDates) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            game: game.into(),
            status: TournamentStatus::Announced,
            phase: TournamentPhase::PreRegistration,
            registration_open_date: dates.registration_open_date,
            registration_close_date: dates.registration_close_date,
            playing_start_date: dates.playing_start_date,
            finish_date: dates.finish_date,
            payment_date: dates.payment_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pair(&self) -> StatusPair {
        StatusPair::new(self.status, self.phase)
    }

    pub fn dates(&self) -> TournamentDates {
        TournamentDates {
            registration_open_date: self.registration_open_date,
            registration_close_date: self.registration_close_date,
            playing_start_date: self.playing_start_date,
            finish_date: self.finish_date,
            payment_date: self.payment_date,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    /// Date to surface as the next milestone for the current phase (None once finished).
    pub fn next_milestone(&self) -> Option<NaiveDate> {
        match self.phase {
            TournamentPhase::PreRegistration => Some(self.registration_open_date),
            TournamentPhase::Registration => Some(self.registration_close_date),
            TournamentPhase::PreTournament => Some(self.playing_start_date),
            TournamentPhase::Playing => Some(self.finish_date),
            TournamentPhase::Payment => self.payment_date,
            TournamentPhase::Finished => None,
        }
    }
}
