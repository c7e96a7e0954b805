//! Sync routine: recompute status/phase and write back only what changed.

use crate::logic::lifecycle::{compute_status, LifecycleConfig};
use crate::models::{StatusPair, Tournament, TournamentId, TournamentStatus};
use crate::store::{Direction, Field, Filter, Query, StoreError, TournamentPatch, TournamentStore, Value};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// The candidate set could not be read; nothing was written.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("failed to read tournaments: {0}")]
    Read(#[source] StoreError),
}

/// One tournament whose status write failed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RowFailure {
    pub id: TournamentId,
    pub error: StoreError,
}

/// Outcome of one sync run.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SyncReport {
    /// Non-cancelled tournaments looked at.
    pub examined: usize,
    /// Rows the store reported as changed.
    pub updated: usize,
    pub failures: Vec<RowFailure>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn not_cancelled() -> Filter {
    Filter::Neq(Field::Status, Value::Status(TournamentStatus::Cancelled))
}

/// Sync every non-cancelled tournament.
pub fn sync_all<S>(store: &S, today: NaiveDate, config: &LifecycleConfig) -> Result<SyncReport, SyncError>
where
    S: TournamentStore + ?Sized,
{
    let query = Query::new()
        .filter(not_cancelled())
        .order_by(Field::Id, Direction::Asc);
    let report = run(store, &query, today, config)?;
    log::info!(
        "Status sync for {}: {} examined, {} updated, {} failed",
        today,
        report.examined,
        report.updated,
        report.failures.len()
    );
    Ok(report)
}

/// Sync a single tournament. A missing or cancelled id gives an empty report.
pub fn sync_one<S>(
    store: &S,
    id: TournamentId,
    today: NaiveDate,
    config: &LifecycleConfig,
) -> Result<SyncReport, SyncError>
where
    S: TournamentStore + ?Sized,
{
    let query = Query::new()
        .filter(Filter::Eq(Field::Id, Value::Id(id)))
        .filter(not_cancelled());
    run(store, &query, today, config)
}

fn run<S>(store: &S, query: &Query, today: NaiveDate, config: &LifecycleConfig) -> Result<SyncReport, SyncError>
where
    S: TournamentStore + ?Sized,
{
    let candidates = store.find(query).map_err(SyncError::Read)?;
    let mut report = SyncReport {
        examined: candidates.len(),
        ..SyncReport::default()
    };
    for t in &candidates {
        let Some(desired) = compute_status(t, today, config) else {
            continue;
        };
        if desired == t.pair() {
            continue;
        }
        match write_pair(store, t, desired) {
            Ok(changed) => report.updated += changed,
            Err(error) => {
                log::warn!("Tournament {}: status update to {} failed: {}", t.id, desired, error);
                report.failures.push(RowFailure { id: t.id, error });
            }
        }
    }
    Ok(report)
}

/// Conditional write: a row cancelled since it was read is left alone.
fn write_pair<S>(store: &S, t: &Tournament, desired: StatusPair) -> Result<usize, StoreError>
where
    S: TournamentStore + ?Sized,
{
    let filters = [Filter::Eq(Field::Id, Value::Id(t.id)), not_cancelled()];
    let patch = TournamentPatch::status_change(desired.status, desired.phase, Utc::now());
    let changed = store.update(&filters, &patch)?;
    if changed > 0 {
        log::debug!("Tournament {}: {} -> {}", t.id, t.pair(), desired);
    } else {
        log::debug!("Tournament {}: skipped, cancelled or deleted since read", t.id);
    }
    Ok(changed)
}

/// Sync routines bound to one lifecycle configuration ("run sync now").
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LifecycleEngine {
    pub config: LifecycleConfig,
}

impl LifecycleEngine {
    pub fn new(config: LifecycleConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, t: &Tournament, today: NaiveDate) -> Option<StatusPair> {
        compute_status(t, today, &self.config)
    }

    pub fn sync_all<S: TournamentStore + ?Sized>(&self, store: &S, today: NaiveDate) -> Result<SyncReport, SyncError> {
        sync_all(store, today, &self.config)
    }

    pub fn sync_one<S: TournamentStore + ?Sized>(
        &self,
        store: &S,
        id: TournamentId,
        today: NaiveDate,
    ) -> Result<SyncReport, SyncError> {
        sync_one(store, id, today, &self.config)
    }
}
