//! Integration tests for the sync routine: conditional writes, cancelled rows, partial failures.

use chrono::NaiveDate;
use esports_backoffice::store::{Field, Filter, Query, TournamentPatch, Value};
use esports_backoffice::{
    sync_all, sync_one, InMemoryStore, LifecycleConfig, LifecycleEngine, StoreError, SyncError,
    Tournament, TournamentDates, TournamentId, TournamentPhase, TournamentStatus, TournamentStore,
};
use std::cell::Cell;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn january_cup(name: &str) -> Tournament {
    Tournament::new(
        name,
        "Counter-Strike 2",
        TournamentDates {
            registration_open_date: date(2025, 1, 1),
            registration_close_date: date(2025, 1, 10),
            playing_start_date: date(2025, 1, 15),
            finish_date: date(2025, 1, 20),
            payment_date: None,
        },
    )
}

/// Wraps an in-memory store; reads can be made to fail, and updates of one id always fail.
struct FlakyStore {
    inner: InMemoryStore,
    fail_reads: bool,
    fail_updates_for: Option<TournamentId>,
    update_calls: Cell<usize>,
}

impl FlakyStore {
    fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_updates_for: None,
            update_calls: Cell::new(0),
        }
    }
}

impl TournamentStore for FlakyStore {
    fn find(&self, query: &Query) -> Result<Vec<Tournament>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.find(query)
    }

    fn update(&self, filters: &[Filter], patch: &TournamentPatch) -> Result<usize, StoreError> {
        self.update_calls.set(self.update_calls.get() + 1);
        if let Some(bad) = self.fail_updates_for {
            if filters.contains(&Filter::Eq(Field::Id, Value::Id(bad))) {
                return Err(StoreError::Unavailable("write timed out".to_string()));
            }
        }
        self.inner.update(filters, patch)
    }

    fn insert(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.inner.insert(tournament)
    }

    fn delete(&self, filters: &[Filter]) -> Result<usize, StoreError> {
        self.inner.delete(filters)
    }
}

#[test]
fn sync_all_updates_changed_rows_only() {
    let a = january_cup("A");
    let mut b = january_cup("B");
    b.status = TournamentStatus::RegistrationOpen;
    b.phase = TournamentPhase::Registration;
    let store = InMemoryStore::with_tournaments([a.clone(), b.clone()]);

    let report = sync_all(&store, date(2025, 1, 5), &LifecycleConfig::default()).unwrap();
    assert_eq!(report.examined, 2);
    assert_eq!(report.updated, 1);
    assert!(report.is_clean());

    let a_now = store.get(a.id).unwrap().unwrap();
    assert_eq!(a_now.status, TournamentStatus::RegistrationOpen);
    assert_eq!(a_now.phase, TournamentPhase::Registration);
    assert!(a_now.updated_at >= a.updated_at);
    // B was already right: untouched, updated_at included.
    assert_eq!(store.get(b.id).unwrap().unwrap(), b);
}

#[test]
fn second_sync_writes_nothing() {
    let store = InMemoryStore::with_tournaments([january_cup("A"), january_cup("B"), january_cup("C")]);
    let flaky = FlakyStore::new(store);
    let today = date(2025, 1, 17);
    let cfg = LifecycleConfig::default();

    let first = sync_all(&flaky, today, &cfg).unwrap();
    assert_eq!(first.updated, 3);
    let calls_after_first = flaky.update_calls.get();

    let second = sync_all(&flaky, today, &cfg).unwrap();
    assert_eq!(second.examined, 3);
    assert_eq!(second.updated, 0);
    assert_eq!(flaky.update_calls.get(), calls_after_first);
}

#[test]
fn cancelled_rows_are_left_alone() {
    let mut cancelled = january_cup("Called off");
    cancelled.status = TournamentStatus::Cancelled;
    cancelled.phase = TournamentPhase::Registration;
    let store = InMemoryStore::with_tournaments([cancelled.clone(), january_cup("Live")]);

    for today in [date(2024, 12, 1), date(2025, 1, 5), date(2025, 1, 12), date(2025, 1, 17), date(2025, 6, 1)] {
        let report = sync_all(&store, today, &LifecycleConfig::default()).unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(store.get(cancelled.id).unwrap().unwrap(), cancelled);
    }
}

/// An admin cancels each row after the sync has read it but before the status write lands.
struct CancelledBeforeWrite(InMemoryStore);

impl TournamentStore for CancelledBeforeWrite {
    fn find(&self, query: &Query) -> Result<Vec<Tournament>, StoreError> {
        self.0.find(query)
    }

    fn update(&self, filters: &[Filter], patch: &TournamentPatch) -> Result<usize, StoreError> {
        if let Some(Filter::Eq(Field::Id, id)) = filters.first() {
            let cancel = TournamentPatch {
                status: Some(TournamentStatus::Cancelled),
                ..TournamentPatch::default()
            };
            self.0.update(&[Filter::Eq(Field::Id, id.clone())], &cancel)?;
        }
        self.0.update(filters, patch)
    }

    fn insert(&self, tournament: Tournament) -> Result<(), StoreError> {
        self.0.insert(tournament)
    }

    fn delete(&self, filters: &[Filter]) -> Result<usize, StoreError> {
        self.0.delete(filters)
    }
}

#[test]
fn row_cancelled_between_read_and_write_stays_cancelled() {
    let t = january_cup("Pulled");
    let store = CancelledBeforeWrite(InMemoryStore::with_tournaments([t.clone()]));

    let report = sync_all(&store, date(2025, 1, 25), &LifecycleConfig::default()).unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.updated, 0);
    assert!(report.failures.is_empty());

    let stored = store.get(t.id).unwrap().unwrap();
    assert_eq!(stored.status, TournamentStatus::Cancelled);
    assert_eq!(stored.phase, t.phase);
    assert_eq!(stored.updated_at, t.updated_at);
}

#[test]
fn failed_row_write_does_not_stop_the_batch() {
    let rows = [january_cup("One"), january_cup("Two"), january_cup("Three")];
    let bad = rows[1].id;
    let mut flaky = FlakyStore::new(InMemoryStore::with_tournaments(rows.clone()));
    flaky.fail_updates_for = Some(bad);

    let report = sync_all(&flaky, date(2025, 1, 25), &LifecycleConfig::default()).unwrap();
    assert_eq!(report.examined, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, bad);
    assert!(matches!(report.failures[0].error, StoreError::Unavailable(_)));

    for t in &rows {
        let now = flaky.inner.get(t.id).unwrap().unwrap();
        if t.id == bad {
            assert_eq!(now.status, TournamentStatus::Announced);
        } else {
            assert_eq!(now.status, TournamentStatus::Completed);
            assert_eq!(now.phase, TournamentPhase::Finished);
        }
    }
}

#[test]
fn failed_read_aborts_without_writes() {
    let mut flaky = FlakyStore::new(InMemoryStore::with_tournaments([january_cup("A")]));
    flaky.fail_reads = true;

    let err = sync_all(&flaky, date(2025, 1, 25), &LifecycleConfig::default()).unwrap_err();
    assert!(matches!(err, SyncError::Read(StoreError::Unavailable(_))));
    assert_eq!(flaky.update_calls.get(), 0);
}

#[test]
fn sync_one_touches_only_its_tournament() {
    let a = january_cup("A");
    let b = january_cup("B");
    let store = InMemoryStore::with_tournaments([a.clone(), b.clone()]);

    let report = sync_one(&store, a.id, date(2025, 1, 12), &LifecycleConfig::default()).unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(store.get(a.id).unwrap().unwrap().status, TournamentStatus::RegistrationClosed);
    assert_eq!(store.get(b.id).unwrap().unwrap(), b);
}

#[test]
fn sync_one_on_missing_or_cancelled_id_is_empty() {
    let mut c = january_cup("C");
    c.status = TournamentStatus::Cancelled;
    let store = InMemoryStore::with_tournaments([c.clone()]);
    let cfg = LifecycleConfig::default();

    let report = sync_one(&store, c.id, date(2025, 1, 12), &cfg).unwrap();
    assert_eq!(report.examined, 0);
    assert_eq!(report.updated, 0);

    let report = sync_one(&store, uuid::Uuid::new_v4(), date(2025, 1, 12), &cfg).unwrap();
    assert_eq!(report.examined, 0);
}

#[test]
fn legacy_and_canonical_rows_do_not_churn() {
    // "ongoing" and "in_progress" parse to the same status, so neither row needs a write.
    let mut legacy = january_cup("Legacy");
    legacy.status = "ongoing".parse().unwrap();
    legacy.phase = TournamentPhase::Playing;
    let mut canonical = january_cup("Canonical");
    canonical.status = "in_progress".parse().unwrap();
    canonical.phase = TournamentPhase::Playing;
    let store = InMemoryStore::with_tournaments([legacy, canonical]);

    let report = sync_all(&store, date(2025, 1, 17), &LifecycleConfig::default()).unwrap();
    assert_eq!(report.updated, 0);
}

#[test]
fn engine_respects_gap_phase_setting() {
    let t = january_cup("Gap");
    let store = InMemoryStore::with_tournaments([t.clone()]);
    let engine = LifecycleEngine::new(LifecycleConfig { enable_gap_phase: false });

    // Announced on 01-05 -> registration open.
    engine.sync_all(&store, date(2025, 1, 5)).unwrap();
    // In the gap the stored pair is kept.
    let report = engine.sync_one(&store, t.id, date(2025, 1, 12)).unwrap();
    assert_eq!(report.updated, 0);
    let now = store.get(t.id).unwrap().unwrap();
    assert_eq!(now.status, TournamentStatus::RegistrationOpen);
    assert_eq!(engine.compute(&now, date(2025, 1, 12)), Some(now.pair()));
}
