//! Repository for the `client_links` table.

use coachsync_core::capacity::NewClientLink;
use coachsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::client_link::ClientLinkRow;

/// Column list for `client_links` queries.
const COLUMNS: &str = "id, coach_id, client_profile_id, display_name, joined_at";

pub struct ClientLinkRepo;

impl ClientLinkRepo {
    pub async fn find_by_pair(
        pool: &PgPool,
        coach_id: DbId,
        client_profile_id: DbId,
    ) -> Result<Option<ClientLinkRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_links \
             WHERE coach_id = $1 AND client_profile_id = $2"
        );
        sqlx::query_as::<_, ClientLinkRow>(&query)
            .bind(coach_id)
            .bind(client_profile_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_client(
        pool: &PgPool,
        client_profile_id: DbId,
    ) -> Result<Option<ClientLinkRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_links WHERE client_profile_id = $1");
        sqlx::query_as::<_, ClientLinkRow>(&query)
            .bind(client_profile_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_coach(
        pool: &PgPool,
        coach_id: DbId,
    ) -> Result<Vec<ClientLinkRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_links WHERE coach_id = $1 ORDER BY joined_at"
        );
        sqlx::query_as::<_, ClientLinkRow>(&query)
            .bind(coach_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a link. Fails with a unique violation if the client is
    /// already linked to any coach.
    pub async fn create(pool: &PgPool, input: &NewClientLink) -> Result<ClientLinkRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_links (coach_id, client_profile_id, display_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientLinkRow>(&query)
            .bind(input.coach_id)
            .bind(input.client_profile_id)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }
}
