//! Esports tournament back-office: tournament records, the date-driven status
//! lifecycle, and the admin actions around it.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{Config, ConfigError};
pub use logic::{
    cancel_tournament, compute_status, create_tournament, delete_tournament, edit_dates, run_sync,
    sync_all, sync_one, AdminError, LifecycleConfig, LifecycleEngine, NewTournament, RowFailure,
    SyncError, SyncReport,
};
pub use models::{
    AdminContext, Permission, StatusPair, StatusVocabulary, Tournament, TournamentDates,
    TournamentId, TournamentPhase, TournamentStatus, TournamentView, UnknownLabel,
};
pub use store::{InMemoryStore, StoreError, TournamentStore};
