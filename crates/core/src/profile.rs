//! Profiles as seen by the engine: role, coach code, subscription plan and
//! preferred weight unit.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lbs => "lbs",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "kg" => Ok(Self::Kg),
            "lbs" => Ok(Self::Lbs),
            other => Err(CoreError::Validation(format!("Unknown weight unit '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: DbId,
    pub display_name: String,
    pub role: Role,
    /// Join code handed to clients. Only coaches have one.
    pub coach_code: Option<String>,
    /// Subscription plan display name, e.g. `"Starter"`.
    pub plan_name: String,
    /// Maximum number of linked clients. `999` means unlimited.
    pub plan_user_limit: i32,
    pub weight_unit: WeightUnit,
    pub created_at: Timestamp,
}

impl Profile {
    pub fn is_coach(&self) -> bool {
        self.role == Role::Coach
    }
}
