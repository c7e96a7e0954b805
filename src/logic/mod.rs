//! Tournament business logic: status lifecycle, sync, admin actions.

mod admin;
mod lifecycle;
mod sync;

pub use admin::{
    cancel_tournament, create_tournament, delete_tournament, edit_dates, run_sync, AdminError,
    NewTournament,
};
pub use lifecycle::{compute_status, LifecycleConfig};
pub use sync::{sync_all, sync_one, LifecycleEngine, RowFailure, SyncError, SyncReport};
