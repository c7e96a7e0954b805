//! In-process store: tournaments by id behind a RwLock.

use crate::models::{Tournament, TournamentId};
use crate::store::{matches_all, Filter, Query, StoreError, TournamentPatch, TournamentStore};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: RwLock<HashMap<TournamentId, Tournament>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given tournaments (later duplicates replace earlier ones).
    pub fn with_tournaments(tournaments: impl IntoIterator<Item = Tournament>) -> Self {
        let rows = tournaments.into_iter().map(|t| (t.id, t)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<TournamentId, Tournament>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<TournamentId, Tournament>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }
}

impl TournamentStore for InMemoryStore {
    fn find(&self, query: &Query) -> Result<Vec<Tournament>, StoreError> {
        let g = self.read()?;
        Ok(query.run(g.values()))
    }

    fn update(&self, filters: &[Filter], patch: &TournamentPatch) -> Result<usize, StoreError> {
        let mut g = self.write()?;
        let mut changed = 0;
        for t in g.values_mut().filter(|t| matches_all(filters, t)) {
            patch.apply_to(t);
            changed += 1;
        }
        Ok(changed)
    }

    fn insert(&self, tournament: Tournament) -> Result<(), StoreError> {
        let mut g = self.write()?;
        if g.contains_key(&tournament.id) {
            return Err(StoreError::Duplicate(tournament.id));
        }
        g.insert(tournament.id, tournament);
        Ok(())
    }

    fn delete(&self, filters: &[Filter]) -> Result<usize, StoreError> {
        let mut g = self.write()?;
        let before = g.len();
        g.retain(|_, t| !matches_all(filters, t));
        Ok(before - g.len())
    }
}
