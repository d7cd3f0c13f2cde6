//! Client links and the subscription capacity gate for joining a coach.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::profile::Profile;
use crate::types::{DbId, Timestamp};

/// A plan user limit of this value never rejects on capacity.
pub const UNLIMITED_USER_LIMIT: i32 = 999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientLink {
    pub id: DbId,
    pub coach_id: DbId,
    pub client_profile_id: DbId,
    pub display_name: String,
    pub joined_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClientLink {
    pub coach_id: DbId,
    pub client_profile_id: DbId,
    pub display_name: String,
}

/// What a join request resolves to once the coach is known.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinDecision {
    /// The client is already linked to this coach.
    AlreadyLinked(ClientLink),
    /// A new link may be created.
    Create,
}

/// Normalize a join code for comparison.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Reject when `active_links` has reached the plan limit.
pub fn check_capacity(plan_name: &str, limit: i32, active_links: usize) -> Result<(), CoreError> {
    if limit == UNLIMITED_USER_LIMIT {
        return Ok(());
    }
    if active_links as i64 >= i64::from(limit) {
        return Err(CoreError::CapacityExceeded {
            plan: plan_name.to_string(),
            limit,
        });
    }
    Ok(())
}

/// Decide a join request.
///
/// An existing link to the same coach is returned as-is. Any other existing
/// link is rejected before capacity is looked at.
pub fn evaluate_join(
    coach: &Profile,
    existing: Option<&ClientLink>,
    active_links: usize,
) -> Result<JoinDecision, CoreError> {
    if !coach.is_coach() {
        return Err(CoreError::Validation(format!(
            "Profile {} is not a coach",
            coach.id
        )));
    }
    if let Some(link) = existing {
        if link.coach_id == coach.id {
            return Ok(JoinDecision::AlreadyLinked(link.clone()));
        }
        return Err(CoreError::Conflict("Client already has a coach".into()));
    }
    check_capacity(&coach.plan_name, coach.plan_user_limit, active_links)?;
    Ok(JoinDecision::Create)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::WeightUnit;
    use crate::roles::Role;
    use assert_matches::assert_matches;

    fn coach(limit: i32) -> Profile {
        Profile {
            id: 1,
            display_name: "Coach Kim".into(),
            role: Role::Coach,
            coach_code: Some("KIM123".into()),
            plan_name: "Starter".into(),
            plan_user_limit: limit,
            weight_unit: WeightUnit::Kg,
            created_at: chrono::Utc::now(),
        }
    }

    fn link(coach_id: DbId) -> ClientLink {
        ClientLink {
            id: 5,
            coach_id,
            client_profile_id: 2,
            display_name: "Sam".into(),
            joined_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn under_limit_creates() {
        assert_eq!(evaluate_join(&coach(3), None, 2).unwrap(), JoinDecision::Create);
    }

    #[test]
    fn at_limit_rejects_with_plan_details() {
        let err = evaluate_join(&coach(3), None, 3).unwrap_err();
        assert_matches!(err, CoreError::CapacityExceeded { ref plan, limit: 3 } if plan == "Starter");
    }

    #[test]
    fn unlimited_never_rejects() {
        assert!(check_capacity("Unlimited", UNLIMITED_USER_LIMIT, 5000).is_ok());
    }

    #[test]
    fn same_coach_link_is_returned() {
        let existing = link(1);
        assert_eq!(
            evaluate_join(&coach(1), Some(&existing), 1).unwrap(),
            JoinDecision::AlreadyLinked(existing)
        );
    }

    #[test]
    fn other_coach_link_rejects_before_capacity() {
        let err = evaluate_join(&coach(0), Some(&link(42)), 0).unwrap_err();
        assert_matches!(err, CoreError::Conflict(ref msg) if msg.contains("already has a coach"));
    }

    #[test]
    fn client_profile_cannot_be_joined() {
        let mut not_coach = coach(5);
        not_coach.role = Role::Client;
        assert_matches!(evaluate_join(&not_coach, None, 0), Err(CoreError::Validation(_)));
    }

    #[test]
    fn codes_normalize_case_and_whitespace() {
        assert_eq!(normalize_code(" kim123 "), "KIM123");
    }
}
