//! Display-layer view of a tournament, rendered in a chosen status vocabulary.

use crate::models::status::StatusVocabulary;
use crate::models::tournament::{Tournament, TournamentId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentView {
    pub id: TournamentId,
    pub name: String,
    pub game: String,
    pub status: &'static str,
    pub phase: &'static str,
    pub next_milestone: Option<NaiveDate>,
    pub registration_open_date: NaiveDate,
    pub registration_close_date: NaiveDate,
    pub playing_start_date: NaiveDate,
    pub finish_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl TournamentView {
    pub fn new(t: &Tournament, vocabulary: StatusVocabulary) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            game: t.game.clone(),
            status: t.status.label(vocabulary),
            phase: t.phase.as_str(),
            next_milestone: t.next_milestone(),
            registration_open_date: t.registration_open_date,
            registration_close_date: t.registration_close_date,
            playing_start_date: t.playing_start_date,
            finish_date: t.finish_date,
            payment_date: t.payment_date,
            updated_at: t.updated_at,
        }
    }
}
