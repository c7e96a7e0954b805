//! Integration tests for admin actions and permissions.

use chrono::NaiveDate;
use esports_backoffice::store::{Filter, Query, TournamentPatch};
use esports_backoffice::{
    cancel_tournament, create_tournament, delete_tournament, edit_dates, run_sync, AdminContext,
    AdminError, InMemoryStore, LifecycleConfig, NewTournament, Permission, StoreError, Tournament,
    TournamentDates, TournamentPhase, TournamentStatus, TournamentStore,
};

/// In-memory store whose status writes fail; date edits, inserts and reads go through.
struct StatusWritesFail(InMemoryStore);

impl TournamentStore for StatusWritesFail {
    fn find(&self, query: &Query) -> Result<Vec<Tournament>, StoreError> {
        self.0.find(query)
    }

    fn update(&self, filters: &[Filter], patch: &TournamentPatch) -> Result<usize, StoreError> {
        if patch.status.is_some() {
            return Err(StoreError::Unavailable("write timed out".to_string()));
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

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dates() -> TournamentDates {
    TournamentDates {
        registration_open_date: date(2025, 1, 1),
        registration_close_date: date(2025, 1, 10),
        playing_start_date: date(2025, 1, 15),
        finish_date: date(2025, 1, 20),
        payment_date: Some(date(2025, 1, 31)),
    }
}

fn new_tournament(name: &str) -> NewTournament {
    NewTournament {
        name: name.to_string(),
        game: "League of Legends".to_string(),
        dates: dates(),
    }
}

fn admin() -> AdminContext {
    AdminContext::superuser("root")
}

#[test]
fn create_inserts_with_status_for_today() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();

    let early = create_tournament(&store, &admin(), new_tournament("Early"), date(2024, 12, 1), &cfg).unwrap();
    assert_eq!(early.status, TournamentStatus::Announced);
    assert_eq!(early.phase, TournamentPhase::PreRegistration);
    assert_eq!(early.next_milestone(), Some(date(2025, 1, 1)));

    let late = create_tournament(&store, &admin(), new_tournament("  Late  "), date(2025, 1, 5), &cfg).unwrap();
    assert_eq!(late.name, "Late");
    assert_eq!(late.status, TournamentStatus::RegistrationOpen);
    assert_eq!(store.get(late.id).unwrap().unwrap(), late);
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn create_rejects_bad_input() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let today = date(2025, 1, 1);

    let mut backwards = new_tournament("Backwards");
    backwards.dates.finish_date = date(2025, 1, 14);
    assert_eq!(
        create_tournament(&store, &admin(), backwards, today, &cfg).unwrap_err(),
        AdminError::InvalidDates
    );
    assert_eq!(
        create_tournament(&store, &admin(), new_tournament("   "), today, &cfg).unwrap_err(),
        AdminError::EmptyName
    );
    assert!(store.is_empty().unwrap());
}

#[test]
fn missing_permission_is_forbidden() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let sync_only = AdminContext::new("ops", [Permission::RunSync]);
    let manage_only = AdminContext::new("editor", [Permission::ManageTournaments]);

    let err = create_tournament(&store, &sync_only, new_tournament("X"), date(2025, 1, 1), &cfg).unwrap_err();
    assert!(matches!(
        err,
        AdminError::Forbidden { permission: Permission::ManageTournaments, .. }
    ));
    let err = run_sync(&store, &manage_only, date(2025, 1, 1), &cfg).unwrap_err();
    assert!(matches!(err, AdminError::Forbidden { permission: Permission::RunSync, .. }));
    assert!(run_sync(&store, &sync_only, date(2025, 1, 1), &cfg).is_ok());
}

#[test]
fn editing_dates_rederives_status() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let today = date(2025, 1, 5);
    let t = create_tournament(&store, &admin(), new_tournament("Moved"), today, &cfg).unwrap();
    assert_eq!(t.status, TournamentStatus::RegistrationOpen);

    let pushed_back = TournamentDates {
        registration_open_date: date(2025, 2, 1),
        registration_close_date: date(2025, 2, 10),
        playing_start_date: date(2025, 2, 15),
        finish_date: date(2025, 2, 20),
        payment_date: None,
    };
    let edited = edit_dates(&store, &admin(), t.id, pushed_back, today, &cfg).unwrap();
    assert_eq!(edited.dates(), pushed_back);
    assert_eq!(edited.status, TournamentStatus::Announced);
    assert_eq!(edited.phase, TournamentPhase::PreRegistration);
}

#[test]
fn editing_a_cancelled_tournament_does_not_revive_it() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let today = date(2025, 1, 5);
    let t = create_tournament(&store, &admin(), new_tournament("Off"), today, &cfg).unwrap();
    cancel_tournament(&store, &admin(), t.id).unwrap();

    let mut later = dates();
    later.registration_open_date = date(2025, 1, 2);
    let edited = edit_dates(&store, &admin(), t.id, later, today, &cfg).unwrap();
    assert_eq!(edited.status, TournamentStatus::Cancelled);
    assert_eq!(edited.registration_open_date, date(2025, 1, 2));
}

#[test]
fn cancel_is_sticky_and_repeatable() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let t = create_tournament(&store, &admin(), new_tournament("Stormed out"), date(2025, 1, 5), &cfg).unwrap();

    let cancelled = cancel_tournament(&store, &admin(), t.id).unwrap();
    assert_eq!(cancelled.status, TournamentStatus::Cancelled);
    assert_eq!(cancelled.phase, TournamentPhase::Registration);

    let again = cancel_tournament(&store, &admin(), t.id).unwrap();
    assert_eq!(again, cancelled);

    let report = run_sync(&store, &admin(), date(2025, 1, 25), &cfg).unwrap();
    assert_eq!(report.examined, 0);
    assert_eq!(store.get(t.id).unwrap().unwrap(), cancelled);
}

#[test]
fn delete_removes_the_row() {
    let store = InMemoryStore::new();
    let cfg = LifecycleConfig::default();
    let t = create_tournament(&store, &admin(), new_tournament("Gone"), date(2025, 1, 5), &cfg).unwrap();

    delete_tournament(&store, &admin(), t.id).unwrap();
    assert!(store.get(t.id).unwrap().is_none());
    assert_eq!(
        delete_tournament(&store, &admin(), t.id).unwrap_err(),
        AdminError::NotFound(t.id)
    );
    assert_eq!(
        cancel_tournament(&store, &admin(), t.id).unwrap_err(),
        AdminError::NotFound(t.id)
    );
    assert_eq!(
        edit_dates(&store, &admin(), t.id, dates(), date(2025, 1, 5), &cfg).unwrap_err(),
        AdminError::NotFound(t.id)
    );
}

#[test]
fn failed_status_write_is_reported_to_the_admin() {
    let store = StatusWritesFail(InMemoryStore::new());
    let cfg = LifecycleConfig::default();

    // Dates already over: the new row should go straight to completed, but that write fails.
    let err = create_tournament(&store, &admin(), new_tournament("Late entry"), date(2025, 1, 25), &cfg)
        .unwrap_err();
    let failure = match err {
        AdminError::StatusWrite(failure) => failure,
        other => panic!("unexpected error: {other}"),
    };
    assert!(matches!(failure.error, StoreError::Unavailable(_)));
    let stored = store.get(failure.id).unwrap().unwrap();
    assert_eq!(stored.status, TournamentStatus::Announced);

    // Same for a date edit that would move the tournament on.
    let mut earlier = dates();
    earlier.registration_open_date = date(2024, 12, 1);
    let err = edit_dates(&store, &admin(), failure.id, earlier, date(2025, 1, 5), &cfg).unwrap_err();
    assert!(matches!(err, AdminError::StatusWrite(ref f) if f.id == failure.id));
    assert_eq!(store.get(failure.id).unwrap().unwrap().registration_open_date, date(2024, 12, 1));
}
