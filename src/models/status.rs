//! TournamentStatus, TournamentPhase and the two status vocabularies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a tournament is in its lifecycle.
///
/// Variants are declared in lifecycle order, so `Ord` follows the progression
/// announced → registration open → registration closed → in progress → completed.
/// `Cancelled` sorts last and is terminal.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[serde(alias = "upcoming")]
    Announced,
    #[serde(alias = "registration")]
    RegistrationOpen,
    RegistrationClosed,
    #[serde(alias = "ongoing")]
    InProgress,
    Completed,
    Cancelled,
}

/// Which set of status names to render at a boundary (UI, exports).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVocabulary {
    /// announced / registration_open / registration_closed / in_progress / completed / cancelled
    #[default]
    Canonical,
    /// upcoming / registration / ongoing / completed / cancelled
    Legacy,
}

impl TournamentStatus {
    pub const ALL: [TournamentStatus; 6] = [
        TournamentStatus::Announced,
        TournamentStatus::RegistrationOpen,
        TournamentStatus::RegistrationClosed,
        TournamentStatus::InProgress,
        TournamentStatus::Completed,
        TournamentStatus::Cancelled,
    ];

    /// Canonical name, as stored and serialized.
    pub fn as_str(self) -> &'static str {
        self.label(StatusVocabulary::Canonical)
    }

    /// Name of this status in the given vocabulary.
    ///
    /// The legacy vocabulary has no name for `RegistrationClosed`; the canonical
    /// name is used for it.
    pub fn label(self, vocabulary: StatusVocabulary) -> &'static str {
        use TournamentStatus::*;
        match (self, vocabulary) {
            (Announced, StatusVocabulary::Canonical) => "announced",
            (Announced, StatusVocabulary::Legacy) => "upcoming",
            (RegistrationOpen, StatusVocabulary::Canonical) => "registration_open",
            (RegistrationOpen, StatusVocabulary::Legacy) => "registration",
            (RegistrationClosed, _) => "registration_closed",
            (InProgress, StatusVocabulary::Canonical) => "in_progress",
            (InProgress, StatusVocabulary::Legacy) => "ongoing",
            (Completed, _) => "completed",
            (Cancelled, _) => "cancelled",
        }
    }

    pub fn is_cancelled(self) -> bool {
        self == TournamentStatus::Cancelled
    }

    /// Phase normally paired with this status, for rows that carry no phase.
    pub fn default_phase(self) -> TournamentPhase {
        match self {
            TournamentStatus::Announced | TournamentStatus::Cancelled => TournamentPhase::PreRegistration,
            TournamentStatus::RegistrationOpen => TournamentPhase::Registration,
            TournamentStatus::RegistrationClosed => TournamentPhase::PreTournament,
            TournamentStatus::InProgress => TournamentPhase::Playing,
            TournamentStatus::Completed => TournamentPhase::Finished,
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status or phase name that matches neither vocabulary.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TournamentStatus {
    type Err = UnknownLabel;

    /// Accepts both vocabularies, case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use TournamentStatus::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "announced" | "upcoming" => Ok(Announced),
            "registration_open" | "registration" => Ok(RegistrationOpen),
            "registration_closed" => Ok(RegistrationClosed),
            "in_progress" | "ongoing" => Ok(InProgress),
            "completed" => Ok(Completed),
            "cancelled" => Ok(Cancelled),
            _ => Err(UnknownLabel {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for StatusVocabulary {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(StatusVocabulary::Canonical),
            "legacy" => Ok(StatusVocabulary::Legacy),
            _ => Err(UnknownLabel {
                kind: "status vocabulary",
                value: s.to_string(),
            }),
        }
    }
}

/// Secondary label paired with the status; picks the "next milestone" date shown in the UI.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    PreRegistration,
    Registration,
    PreTournament,
    Playing,
    /// Prize payout window after play ends. Older rows call it `post_tournament`.
    #[serde(alias = "post_tournament")]
    Payment,
    Finished,
}

impl TournamentPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentPhase::PreRegistration => "pre_registration",
            TournamentPhase::Registration => "registration",
            TournamentPhase::PreTournament => "pre_tournament",
            TournamentPhase::Playing => "playing",
            TournamentPhase::Payment => "payment",
            TournamentPhase::Finished => "finished",
        }
    }
}

impl fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentPhase {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use TournamentPhase::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "pre_registration" => Ok(PreRegistration),
            "registration" => Ok(Registration),
            "pre_tournament" => Ok(PreTournament),
            "playing" => Ok(Playing),
            "payment" | "post_tournament" => Ok(Payment),
            "finished" => Ok(Finished),
            _ => Err(UnknownLabel {
                kind: "phase",
                value: s.to_string(),
            }),
        }
    }
}

/// The (status, phase) pair the lifecycle engine derives and compares.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct StatusPair {
    pub status: TournamentStatus,
    pub phase: TournamentPhase,
}

impl StatusPair {
    pub const fn new(status: TournamentStatus, phase: TournamentPhase) -> Self {
        Self { status, phase }
    }
}

impl fmt::Display for StatusPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.status, self.phase)
    }
}
