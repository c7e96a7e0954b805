//! Admin actions on tournaments: create, edit dates, cancel, delete, manual sync.

use crate::logic::lifecycle::LifecycleConfig;
use crate::logic::sync::{sync_all, sync_one, RowFailure, SyncError, SyncReport};
use crate::models::{AdminContext, Permission, Tournament, TournamentDates, TournamentId, TournamentStatus};
use crate::store::{Field, Filter, StoreError, TournamentPatch, TournamentStore, Value};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

/// Errors that can occur during admin actions.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AdminError {
    #[error("admin '{username}' lacks permission {permission}")]
    Forbidden { username: String, permission: Permission },
    #[error("tournament {0} not found")]
    NotFound(TournamentId),
    /// Dates must satisfy open ≤ close ≤ playing start ≤ finish (≤ payment).
    #[error("tournament dates are out of order")]
    InvalidDates,
    #[error("tournament name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// The tournament was saved but its status/phase could not be brought up to date.
    #[error("tournament {} saved, but its status update failed: {}", .0.id, .0.error)]
    StatusWrite(RowFailure),
}

/// Form fields for a new tournament.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub game: String,
    #[serde(flatten)]
    pub dates: TournamentDates,
}

fn require(ctx: &AdminContext, permission: Permission) -> Result<(), AdminError> {
    if ctx.can(permission) {
        Ok(())
    } else {
        log::warn!("Admin '{}' denied: missing {}", ctx.username, permission);
        Err(AdminError::Forbidden {
            username: ctx.username.clone(),
            permission,
        })
    }
}

fn by_id(id: TournamentId) -> Filter {
    Filter::Eq(Field::Id, Value::Id(id))
}

/// Re-derive one tournament's status; a failed status write is an error for the admin.
fn resync<S>(store: &S, id: TournamentId, today: NaiveDate, config: &LifecycleConfig) -> Result<(), AdminError>
where
    S: TournamentStore + ?Sized,
{
    let report = sync_one(store, id, today, config)?;
    match report.failures.into_iter().next() {
        Some(failure) => Err(AdminError::StatusWrite(failure)),
        None => Ok(()),
    }
}

/// Create a tournament and bring its status in line with `today`.
pub fn create_tournament<S>(
    store: &S,
    ctx: &AdminContext,
    new: NewTournament,
    today: NaiveDate,
    config: &LifecycleConfig,
) -> Result<Tournament, AdminError>
where
    S: TournamentStore + ?Sized,
{
    require(ctx, Permission::ManageTournaments)?;
    let name = new.name.trim();
    if name.is_empty() {
        return Err(AdminError::EmptyName);
    }
    if !new.dates.is_ordered() {
        return Err(AdminError::InvalidDates);
    }
    let tournament = Tournament::new(name, new.game.trim(), new.dates);
    let id = tournament.id;
    store.insert(tournament)?;
    log::info!("Admin '{}' created tournament {} ({})", ctx.username, name, id);
    resync(store, id, today, config)?;
    store.get(id)?.ok_or(AdminError::NotFound(id))
}

/// Replace a tournament's dates and re-derive its status right away.
///
/// A cancelled tournament keeps its dates edited but stays cancelled.
pub fn edit_dates<S>(
    store: &S,
    ctx: &AdminContext,
    id: TournamentId,
    dates: TournamentDates,
    today: NaiveDate,
    config: &LifecycleConfig,
) -> Result<Tournament, AdminError>
where
    S: TournamentStore + ?Sized,
{
    require(ctx, Permission::ManageTournaments)?;
    if !dates.is_ordered() {
        return Err(AdminError::InvalidDates);
    }
    let patch = TournamentPatch {
        dates: Some(dates),
        updated_at: Some(Utc::now()),
        ..TournamentPatch::default()
    };
    if store.update(&[by_id(id)], &patch)? == 0 {
        return Err(AdminError::NotFound(id));
    }
    log::info!("Admin '{}' edited dates of tournament {}", ctx.username, id);
    resync(store, id, today, config)?;
    store.get(id)?.ok_or(AdminError::NotFound(id))
}

/// Cancel a tournament. Cancelling an already cancelled tournament succeeds without a write.
pub fn cancel_tournament<S>(store: &S, ctx: &AdminContext, id: TournamentId) -> Result<Tournament, AdminError>
where
    S: TournamentStore + ?Sized,
{
    require(ctx, Permission::ManageTournaments)?;
    let current = store.get(id)?.ok_or(AdminError::NotFound(id))?;
    if current.is_cancelled() {
        return Ok(current);
    }
    let patch = TournamentPatch {
        status: Some(TournamentStatus::Cancelled),
        updated_at: Some(Utc::now()),
        ..TournamentPatch::default()
    };
    store.update(&[by_id(id)], &patch)?;
    log::info!("Admin '{}' cancelled tournament {}", ctx.username, id);
    store.get(id)?.ok_or(AdminError::NotFound(id))
}

/// Delete a tournament for good.
pub fn delete_tournament<S>(store: &S, ctx: &AdminContext, id: TournamentId) -> Result<(), AdminError>
where
    S: TournamentStore + ?Sized,
{
    require(ctx, Permission::ManageTournaments)?;
    if store.delete(&[by_id(id)])? == 0 {
        return Err(AdminError::NotFound(id));
    }
    log::info!("Admin '{}' deleted tournament {}", ctx.username, id);
    Ok(())
}

/// Manual "run sync now".
pub fn run_sync<S>(
    store: &S,
    ctx: &AdminContext,
    today: NaiveDate,
    config: &LifecycleConfig,
) -> Result<SyncReport, AdminError>
where
    S: TournamentStore + ?Sized,
{
    require(ctx, Permission::RunSync)?;
    Ok(sync_all(store, today, config)?)
}
