//! Loading legacy tournament rows from CSV.
//!
//! Expected header: `id,name,game,status,phase,registration_open_date,
//! registration_close_date,playing_start_date,finish_date,payment_date`.
//! `id`, `phase` and `payment_date` may be empty; `status` may use either vocabulary.

use crate::models::{Tournament, TournamentDates, TournamentPhase, TournamentStatus};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    game: String,
    status: String,
    #[serde(default)]
    phase: Option<String>,
    registration_open_date: NaiveDate,
    registration_close_date: NaiveDate,
    playing_start_date: NaiveDate,
    finish_date: NaiveDate,
    #[serde(default)]
    payment_date: Option<NaiveDate>,
}

impl CsvRow {
    fn into_tournament(self, row: u64) -> Result<Tournament, StoreError> {
        let import_err = |message: String| StoreError::Import { row, message };
        let status: TournamentStatus = self.status.parse().map_err(|e| import_err(format!("{e}")))?;
        let phase = match self.phase.as_deref().map(str::trim) {
            None | Some("") => status.default_phase(),
            Some(p) => p
                .parse::<TournamentPhase>()
                .map_err(|e| import_err(format!("{e}")))?,
        };
        let dates = TournamentDates {
            registration_open_date: self.registration_open_date,
            registration_close_date: self.registration_close_date,
            playing_start_date: self.playing_start_date,
            finish_date: self.finish_date,
            payment_date: self.payment_date,
        };
        if !dates.is_ordered() {
            log::warn!("Row {}: tournament '{}' has out-of-order dates", row, self.name);
        }
        let mut t = Tournament::new(self.name, self.game, dates);
        if let Some(id) = self.id {
            t.id = id;
        }
        t.status = status;
        t.phase = phase;
        Ok(t)
    }
}

/// Parse every row; the first malformed row aborts the import.
///
/// Errors carry the line the offending record starts on, so quoted fields that
/// span lines do not shift the count.
pub fn load_csv<R: io::Read>(reader: R) -> Result<Vec<Tournament>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let line_of = |e: &csv::Error| e.position().map_or(0, |p| p.line());
    let headers = rdr
        .headers()
        .map_err(|e| StoreError::Import {
            row: line_of(&e),
            message: e.to_string(),
        })?
        .clone();
    let mut record = csv::StringRecord::new();
    let mut out = Vec::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                return Err(StoreError::Import {
                    row: line_of(&e),
                    message: e.to_string(),
                })
            }
        }
        let row = record.position().map_or(0, |p| p.line());
        let parsed: CsvRow = record.deserialize(Some(&headers)).map_err(|e| StoreError::Import {
            row,
            message: e.to_string(),
        })?;
        out.push(parsed.into_tournament(row)?);
    }
    log::info!("Loaded {} tournament(s) from CSV", out.len());
    Ok(out)
}
