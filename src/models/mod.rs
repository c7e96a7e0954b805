//! Data structures: tournaments, status/phase, admin context, display views.

mod admin;
mod status;
mod tournament;
mod view;

pub use admin::{AdminContext, Permission};
pub use status::{StatusPair, StatusVocabulary, TournamentPhase, TournamentStatus, UnknownLabel};
pub use tournament::{Tournament, TournamentDates, TournamentId};
pub use view::TournamentView;
