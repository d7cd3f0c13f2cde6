use coachsync_core::capacity::ClientLink;
use coachsync_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `client_links` table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientLinkRow {
    pub id: DbId,
    pub coach_id: DbId,
    pub client_profile_id: DbId,
    pub display_name: String,
    pub joined_at: Timestamp,
}

impl From<ClientLinkRow> for ClientLink {
    fn from(row: ClientLinkRow) -> Self {
        ClientLink {
            id: row.id,
            coach_id: row.coach_id,
            client_profile_id: row.client_profile_id,
            display_name: row.display_name,
            joined_at: row.joined_at,
        }
    }
}
