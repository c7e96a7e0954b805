//! Explicit admin identity and permissions, passed into every admin operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Something an admin may be allowed to do.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create, edit, cancel and delete tournaments.
    ManageTournaments,
    /// Trigger a status sync by hand.
    RunSync,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::ManageTournaments => f.write_str("manage_tournaments"),
            Permission::RunSync => f.write_str("run_sync"),
        }
    }
}

/// The admin on whose behalf an operation runs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdminContext {
    pub username: String,
    pub permissions: BTreeSet<Permission>,
}

impl AdminContext {
    pub fn new(username: impl Into<String>, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            username: username.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Admin holding every permission.
    pub fn superuser(username: impl Into<String>) -> Self {
        Self::new(username, [Permission::ManageTournaments, Permission::RunSync])
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
