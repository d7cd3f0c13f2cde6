//! Profile roles and the acting identity passed into every engine operation.
//!
//! Role names must match the `profiles.role` check constraint in
//! `20261001000001_create_profiles.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_COACH: &str = "coach";
pub const ROLE_CLIENT: &str = "client";

/// Which side of the coach/client relationship a profile is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Coach,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coach => ROLE_COACH,
            Self::Client => ROLE_CLIENT,
        }
    }

    /// Parse from the database `role` column or a token claim.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            ROLE_COACH => Ok(Self::Coach),
            ROLE_CLIENT => Ok(Self::Client),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated profile performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub profile_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn coach(profile_id: DbId) -> Self {
        Self {
            profile_id,
            role: Role::Coach,
        }
    }

    pub fn client(profile_id: DbId) -> Self {
        Self {
            profile_id,
            role: Role::Client,
        }
    }
}
