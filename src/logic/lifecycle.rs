//! Date-driven status/phase derivation.

use crate::models::{StatusPair, Tournament, TournamentPhase, TournamentStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tunables of the status derivation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Derive `registration_closed / pre_tournament` between registration close and playing start.
    /// When off, days in that window keep whatever pair is stored.
    pub enable_gap_phase: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enable_gap_phase: true,
        }
    }
}

/// Pair the dates call for, or None when no rule matches (out-of-order dates,
/// or the gap window with the gap phase disabled). Guards are evaluated in order.
fn derive_pair(t: &Tournament, today: NaiveDate, config: &LifecycleConfig) -> Option<StatusPair> {
    use TournamentPhase as P;
    use TournamentStatus as S;

    if today < t.registration_open_date {
        Some(StatusPair::new(S::Announced, P::PreRegistration))
    } else if today <= t.registration_close_date {
        Some(StatusPair::new(S::RegistrationOpen, P::Registration))
    } else if config.enable_gap_phase && today < t.playing_start_date {
        Some(StatusPair::new(S::RegistrationClosed, P::PreTournament))
    } else if t.playing_start_date <= today && today <= t.finish_date {
        Some(StatusPair::new(S::InProgress, P::Playing))
    } else if today > t.finish_date {
        Some(StatusPair::new(S::Completed, P::Finished))
    } else {
        None
    }
}

/// Status/phase a tournament should have on `today`.
///
/// Returns None for cancelled tournaments: they are never recomputed. When no
/// date rule matches, the stored pair is returned unchanged.
pub fn compute_status(t: &Tournament, today: NaiveDate, config: &LifecycleConfig) -> Option<StatusPair> {
    if t.is_cancelled() {
        return None;
    }
    match derive_pair(t, today, config) {
        Some(pair) => Some(pair),
        None => {
            log::debug!(
                "Tournament {}: no status rule matches on {}, keeping {}",
                t.id,
                today,
                t.pair()
            );
            Some(t.pair())
        }
    }
}
