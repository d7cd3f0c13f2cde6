//! Persistence seams consumed by the engine.
//!
//! Each trait covers one table family. `coachsync_db::PgStore` implements
//! all of them over PostgreSQL; [`crate::memory::MemoryStore`] implements
//! them in-process. File storage is separate ([`MediaStore`]) because media
//! lives on disk, not in the database.

use std::future::Future;

use crate::capacity::{ClientLink, NewClientLink};
use crate::error::CoreError;
use crate::feedback::{NewNotification, Notification};
use crate::personal_records::{NewPersonalRecord, PersonalRecord};
use crate::profile::Profile;
use crate::program::Program;
use crate::types::{DbId, Timestamp};
use crate::video::{NewVideoArtifact, VideoArtifact};

pub type StoreResult<T> = Result<T, CoreError>;

pub trait ProgramStore: Send + Sync {
    fn load_program(&self, id: DbId) -> impl Future<Output = StoreResult<Option<Program>>> + Send;

    /// Replace the whole stored document. Returns the stored copy.
    fn save_program(&self, program: &Program) -> impl Future<Output = StoreResult<Program>> + Send;

    /// Returns `true` if a row was deleted.
    fn delete_program(&self, id: DbId) -> impl Future<Output = StoreResult<bool>> + Send;
}

pub trait ProfileStore: Send + Sync {
    fn find_profile(&self, id: DbId) -> impl Future<Output = StoreResult<Option<Profile>>> + Send;

    /// Case-insensitive exact match among coach profiles.
    fn find_coach_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = StoreResult<Option<Profile>>> + Send;
}

pub trait ClientLinkStore: Send + Sync {
    fn resolve_client_link(
        &self,
        coach_id: DbId,
        client_profile_id: DbId,
    ) -> impl Future<Output = StoreResult<Option<ClientLink>>> + Send;

    /// The link a client holds, with any coach.
    fn find_link_for_client(
        &self,
        client_profile_id: DbId,
    ) -> impl Future<Output = StoreResult<Option<ClientLink>>> + Send;

    fn list_client_links(
        &self,
        coach_id: DbId,
    ) -> impl Future<Output = StoreResult<Vec<ClientLink>>> + Send;

    fn create_client_link(
        &self,
        input: &NewClientLink,
    ) -> impl Future<Output = StoreResult<ClientLink>> + Send;
}

pub trait NotificationStore: Send + Sync {
    fn create_notification(
        &self,
        input: &NewNotification,
    ) -> impl Future<Output = StoreResult<Notification>> + Send;

    /// Delete every notification about `program_id` addressed to
    /// `profile_id`. Returns the number deleted.
    fn delete_notifications_for_program(
        &self,
        program_id: DbId,
        profile_id: DbId,
    ) -> impl Future<Output = StoreResult<u64>> + Send;
}

pub trait RecordStore: Send + Sync {
    fn list_prs(
        &self,
        profile_id: DbId,
    ) -> impl Future<Output = StoreResult<Vec<PersonalRecord>>> + Send;

    fn create_pr(
        &self,
        input: &NewPersonalRecord,
    ) -> impl Future<Output = StoreResult<PersonalRecord>> + Send;
}

pub trait VideoStore: Send + Sync {
    fn create_video(
        &self,
        input: &NewVideoArtifact,
    ) -> impl Future<Output = StoreResult<VideoArtifact>> + Send;

    fn find_video(
        &self,
        filename: &str,
    ) -> impl Future<Output = StoreResult<Option<VideoArtifact>>> + Send;

    /// Set the view timestamp if it is not set yet. Returns `true` if a row
    /// changed.
    fn mark_video_viewed(
        &self,
        filename: &str,
        viewed_at: Timestamp,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Viewed artifacts whose view timestamp is before `cutoff`.
    fn list_viewed_before(
        &self,
        cutoff: Timestamp,
    ) -> impl Future<Output = StoreResult<Vec<VideoArtifact>>> + Send;

    /// Unviewed artifacts uploaded before `cutoff`.
    fn list_unviewed_uploaded_before(
        &self,
        cutoff: Timestamp,
    ) -> impl Future<Output = StoreResult<Vec<VideoArtifact>>> + Send;

    fn list_videos_for_program(
        &self,
        program_id: DbId,
    ) -> impl Future<Output = StoreResult<Vec<VideoArtifact>>> + Send;

    /// Returns `true` if a row was deleted; deleting a missing row is not an
    /// error.
    fn delete_video(&self, id: DbId) -> impl Future<Output = StoreResult<bool>> + Send;
}

/// Every table-backed store the engine needs.
pub trait Store:
    ProgramStore + ProfileStore + ClientLinkStore + NotificationStore + RecordStore + VideoStore
{
}

impl<T> Store for T where
    T: ProgramStore + ProfileStore + ClientLinkStore + NotificationStore + RecordStore + VideoStore
{
}

/// Stored media files.
pub trait MediaStore: Send + Sync {
    /// Persist `bytes` under a fresh filename with `extension`.
    fn store_file(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> impl Future<Output = StoreResult<String>> + Send;

    /// Delete a stored file. Returns `false` when it was already gone.
    fn delete_file(&self, filename: &str) -> impl Future<Output = StoreResult<bool>> + Send;

    fn file_exists(&self, filename: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}
