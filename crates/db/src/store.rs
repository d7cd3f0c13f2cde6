//! [`PgStore`]: the PostgreSQL implementation of the engine's store traits.

use coachsync_core::capacity::{ClientLink, NewClientLink};
use coachsync_core::error::CoreError;
use coachsync_core::feedback::{NewNotification, Notification};
use coachsync_core::personal_records::{NewPersonalRecord, PersonalRecord};
use coachsync_core::profile::Profile;
use coachsync_core::program::Program;
use coachsync_core::store::{
    ClientLinkStore, NotificationStore, ProfileStore, ProgramStore, RecordStore, StoreResult,
    VideoStore,
};
use coachsync_core::types::{DbId, Timestamp};
use coachsync_core::video::{NewVideoArtifact, VideoArtifact};

use crate::repositories::{
    ClientLinkRepo, NotificationRepo, PersonalRecordRepo, ProfileRepo, ProgramRepo,
    VideoArtifactRepo,
};
use crate::DbPool;

/// Store traits over a shared connection pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Translate a sqlx error into the engine's error type.
///
/// Unique violations become conflicts; the one-coach-per-client constraint
/// gets its own message. Everything else is a storage failure.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return match db_err.constraint() {
                Some("uq_client_links_client") => {
                    CoreError::Conflict("Client already has a coach".into())
                }
                Some(constraint) => CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )),
                None => CoreError::Conflict("Duplicate value".into()),
            };
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Storage(err.to_string())
}

impl ProgramStore for PgStore {
    async fn load_program(&self, id: DbId) -> StoreResult<Option<Program>> {
        ProgramRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Program::try_from)
            .transpose()
    }

    async fn save_program(&self, program: &Program) -> StoreResult<Program> {
        ProgramRepo::replace(&self.pool, program)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("Program", program.id))?
            .try_into()
    }

    async fn delete_program(&self, id: DbId) -> StoreResult<bool> {
        ProgramRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}

impl ProfileStore for PgStore {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>> {
        ProfileRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Profile::try_from)
            .transpose()
    }

    async fn find_coach_by_code(&self, code: &str) -> StoreResult<Option<Profile>> {
        ProfileRepo::find_coach_by_code(&self.pool, code)
            .await
            .map_err(map_db_error)?
            .map(Profile::try_from)
            .transpose()
    }
}

impl ClientLinkStore for PgStore {
    async fn resolve_client_link(
        &self,
        coach_id: DbId,
        client_profile_id: DbId,
    ) -> StoreResult<Option<ClientLink>> {
        Ok(
            ClientLinkRepo::find_by_pair(&self.pool, coach_id, client_profile_id)
                .await
                .map_err(map_db_error)?
                .map(ClientLink::from),
        )
    }

    async fn find_link_for_client(&self, client_profile_id: DbId) -> StoreResult<Option<ClientLink>> {
        Ok(ClientLinkRepo::find_for_client(&self.pool, client_profile_id)
            .await
            .map_err(map_db_error)?
            .map(ClientLink::from))
    }

    async fn list_client_links(&self, coach_id: DbId) -> StoreResult<Vec<ClientLink>> {
        Ok(ClientLinkRepo::list_for_coach(&self.pool, coach_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(ClientLink::from)
            .collect())
    }

    async fn create_client_link(&self, input: &NewClientLink) -> StoreResult<ClientLink> {
        ClientLinkRepo::create(&self.pool, input)
            .await
            .map(ClientLink::from)
            .map_err(map_db_error)
    }
}

impl NotificationStore for PgStore {
    async fn create_notification(&self, input: &NewNotification) -> StoreResult<Notification> {
        NotificationRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?
            .try_into()
    }

    async fn delete_notifications_for_program(
        &self,
        program_id: DbId,
        profile_id: DbId,
    ) -> StoreResult<u64> {
        NotificationRepo::delete_for_program(&self.pool, program_id, profile_id)
            .await
            .map_err(map_db_error)
    }
}

impl RecordStore for PgStore {
    async fn list_prs(&self, profile_id: DbId) -> StoreResult<Vec<PersonalRecord>> {
        PersonalRecordRepo::list_for_profile(&self.pool, profile_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(PersonalRecord::try_from)
            .collect()
    }

    async fn create_pr(&self, input: &NewPersonalRecord) -> StoreResult<PersonalRecord> {
        PersonalRecordRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?
            .try_into()
    }
}

impl VideoStore for PgStore {
    async fn create_video(&self, input: &NewVideoArtifact) -> StoreResult<VideoArtifact> {
        VideoArtifactRepo::create(&self.pool, input)
            .await
            .map(VideoArtifact::from)
            .map_err(map_db_error)
    }

    async fn find_video(&self, filename: &str) -> StoreResult<Option<VideoArtifact>> {
        Ok(VideoArtifactRepo::find_by_filename(&self.pool, filename)
            .await
            .map_err(map_db_error)?
            .map(VideoArtifact::from))
    }

    async fn mark_video_viewed(&self, filename: &str, viewed_at: Timestamp) -> StoreResult<bool> {
        VideoArtifactRepo::mark_viewed(&self.pool, filename, viewed_at)
            .await
            .map_err(map_db_error)
    }

    async fn list_viewed_before(&self, cutoff: Timestamp) -> StoreResult<Vec<VideoArtifact>> {
        Ok(VideoArtifactRepo::list_viewed_before(&self.pool, cutoff)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(VideoArtifact::from)
            .collect())
    }

    async fn list_unviewed_uploaded_before(
        &self,
        cutoff: Timestamp,
    ) -> StoreResult<Vec<VideoArtifact>> {
        Ok(VideoArtifactRepo::list_unviewed_uploaded_before(&self.pool, cutoff)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(VideoArtifact::from)
            .collect())
    }

    async fn list_videos_for_program(&self, program_id: DbId) -> StoreResult<Vec<VideoArtifact>> {
        Ok(VideoArtifactRepo::list_for_program(&self.pool, program_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(VideoArtifact::from)
            .collect())
    }

    async fn delete_video(&self, id: DbId) -> StoreResult<bool> {
        VideoArtifactRepo::delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }
}
