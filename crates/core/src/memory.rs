//! In-process implementation of every [`crate::store`] trait.
//!
//! Backs the engine in tests and local experiments. Ids are assigned from
//! one shared counter, so they are unique across tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::capacity::{normalize_code, ClientLink, NewClientLink};
use crate::error::CoreError;
use crate::feedback::{NewNotification, Notification};
use crate::personal_records::{NewPersonalRecord, PersonalRecord};
use crate::profile::Profile;
use crate::program::Program;
use crate::roles::Role;
use crate::store::{
    ClientLinkStore, NotificationStore, ProfileStore, ProgramStore, RecordStore, StoreResult,
    VideoStore,
};
use crate::types::{DbId, Timestamp};
use crate::video::{NewVideoArtifact, VideoArtifact};

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    profiles: BTreeMap<DbId, Profile>,
    programs: BTreeMap<DbId, Program>,
    links: BTreeMap<DbId, ClientLink>,
    notifications: BTreeMap<DbId, Notification>,
    records: BTreeMap<DbId, PersonalRecord>,
    videos: BTreeMap<DbId, VideoArtifact>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Cheaply cloneable; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile, assigning its id.
    pub async fn insert_profile(&self, mut profile: Profile) -> Profile {
        let mut t = self.tables.lock().await;
        profile.id = t.next_id();
        t.profiles.insert(profile.id, profile.clone());
        profile
    }

    /// Insert a program, assigning its id.
    pub async fn insert_program(&self, mut program: Program) -> Program {
        let mut t = self.tables.lock().await;
        program.id = t.next_id();
        t.programs.insert(program.id, program.clone());
        program
    }

    /// Insert a video artifact as-is (apart from the id), including any
    /// view timestamp.
    pub async fn insert_video(&self, mut artifact: VideoArtifact) -> VideoArtifact {
        let mut t = self.tables.lock().await;
        artifact.id = t.next_id();
        t.videos.insert(artifact.id, artifact.clone());
        artifact
    }

    pub async fn program(&self, id: DbId) -> Option<Program> {
        self.tables.lock().await.programs.get(&id).cloned()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.tables.lock().await.notifications.values().cloned().collect()
    }

    pub async fn personal_records(&self) -> Vec<PersonalRecord> {
        self.tables.lock().await.records.values().cloned().collect()
    }

    pub async fn videos(&self) -> Vec<VideoArtifact> {
        self.tables.lock().await.videos.values().cloned().collect()
    }

    pub async fn client_links(&self) -> Vec<ClientLink> {
        self.tables.lock().await.links.values().cloned().collect()
    }
}

impl ProgramStore for MemoryStore {
    async fn load_program(&self, id: DbId) -> StoreResult<Option<Program>> {
        Ok(self.program(id).await)
    }

    async fn save_program(&self, program: &Program) -> StoreResult<Program> {
        let mut saved = program.clone();
        saved.updated_at = Utc::now();
        self.tables
            .lock()
            .await
            .programs
            .insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_program(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.lock().await.programs.remove(&id).is_some())
    }
}

impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>> {
        Ok(self.tables.lock().await.profiles.get(&id).cloned())
    }

    async fn find_coach_by_code(&self, code: &str) -> StoreResult<Option<Profile>> {
        let wanted = normalize_code(code);
        Ok(self
            .tables
            .lock()
            .await
            .profiles
            .values()
            .find(|p| {
                p.role == Role::Coach
                    && p.coach_code.as_deref().map(normalize_code).as_deref() == Some(wanted.as_str())
            })
            .cloned())
    }
}

impl ClientLinkStore for MemoryStore {
    async fn resolve_client_link(
        &self,
        coach_id: DbId,
        client_profile_id: DbId,
    ) -> StoreResult<Option<ClientLink>> {
        Ok(self
            .tables
            .lock()
            .await
            .links
            .values()
            .find(|l| l.coach_id == coach_id && l.client_profile_id == client_profile_id)
            .cloned())
    }

    async fn find_link_for_client(&self, client_profile_id: DbId) -> StoreResult<Option<ClientLink>> {
        Ok(self
            .tables
            .lock()
            .await
            .links
            .values()
            .find(|l| l.client_profile_id == client_profile_id)
            .cloned())
    }

    async fn list_client_links(&self, coach_id: DbId) -> StoreResult<Vec<ClientLink>> {
        Ok(self
            .tables
            .lock()
            .await
            .links
            .values()
            .filter(|l| l.coach_id == coach_id)
            .cloned()
            .collect())
    }

    async fn create_client_link(&self, input: &NewClientLink) -> StoreResult<ClientLink> {
        let mut t = self.tables.lock().await;
        // Mirrors the one-coach-per-client unique constraint.
        if t
            .links
            .values()
            .any(|l| l.client_profile_id == input.client_profile_id)
        {
            return Err(CoreError::Conflict("Client already has a coach".into()));
        }
        let link = ClientLink {
            id: t.next_id(),
            coach_id: input.coach_id,
            client_profile_id: input.client_profile_id,
            display_name: input.display_name.clone(),
            joined_at: Utc::now(),
        };
        t.links.insert(link.id, link.clone());
        Ok(link)
    }
}

impl NotificationStore for MemoryStore {
    async fn create_notification(&self, input: &NewNotification) -> StoreResult<Notification> {
        let mut t = self.tables.lock().await;
        let notification = Notification {
            id: t.next_id(),
            profile_id: input.profile_id,
            kind: input.kind,
            title: input.title.clone(),
            message: input.message.clone(),
            program_id: input.program_id,
            program_title: input.program_title.clone(),
            exercise_name: input.exercise_name.clone(),
            from_role: input.from_role,
            is_read: false,
            created_at: Utc::now(),
        };
        t.notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn delete_notifications_for_program(
        &self,
        program_id: DbId,
        profile_id: DbId,
    ) -> StoreResult<u64> {
        let mut t = self.tables.lock().await;
        let before = t.notifications.len();
        t.notifications
            .retain(|_, n| !(n.program_id == Some(program_id) && n.profile_id == profile_id));
        Ok((before - t.notifications.len()) as u64)
    }
}

impl RecordStore for MemoryStore {
    async fn list_prs(&self, profile_id: DbId) -> StoreResult<Vec<PersonalRecord>> {
        Ok(self
            .tables
            .lock()
            .await
            .records
            .values()
            .filter(|r| r.profile_id == profile_id)
            .cloned()
            .collect())
    }

    async fn create_pr(&self, input: &NewPersonalRecord) -> StoreResult<PersonalRecord> {
        let mut t = self.tables.lock().await;
        let record = PersonalRecord {
            id: t.next_id(),
            profile_id: input.profile_id,
            lift_type: input.lift_type,
            weight: input.weight,
            unit: input.unit,
            recorded_at: input.recorded_at,
            notes: input.notes.clone(),
        };
        t.records.insert(record.id, record.clone());
        Ok(record)
    }
}

impl VideoStore for MemoryStore {
    async fn create_video(&self, input: &NewVideoArtifact) -> StoreResult<VideoArtifact> {
        let mut t = self.tables.lock().await;
        let artifact = VideoArtifact {
            id: t.next_id(),
            filename: input.filename.clone(),
            program_id: input.program_id,
            exercise_id: input.exercise_id.clone(),
            uploader_id: input.uploader_id,
            coach_id: input.coach_id,
            coach_viewed_at: None,
            uploaded_at: input.uploaded_at,
        };
        t.videos.insert(artifact.id, artifact.clone());
        Ok(artifact)
    }

    async fn find_video(&self, filename: &str) -> StoreResult<Option<VideoArtifact>> {
        Ok(self
            .tables
            .lock()
            .await
            .videos
            .values()
            .find(|v| v.filename == filename)
            .cloned())
    }

    async fn mark_video_viewed(&self, filename: &str, viewed_at: Timestamp) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        let Some(video) = t
            .videos
            .values_mut()
            .find(|v| v.filename == filename && v.coach_viewed_at.is_none())
        else {
            return Ok(false);
        };
        video.coach_viewed_at = Some(viewed_at);
        Ok(true)
    }

    async fn list_viewed_before(&self, cutoff: Timestamp) -> StoreResult<Vec<VideoArtifact>> {
        Ok(self
            .tables
            .lock()
            .await
            .videos
            .values()
            .filter(|v| v.coach_viewed_at.is_some_and(|at| at < cutoff))
            .cloned()
            .collect())
    }

    async fn list_unviewed_uploaded_before(
        &self,
        cutoff: Timestamp,
    ) -> StoreResult<Vec<VideoArtifact>> {
        Ok(self
            .tables
            .lock()
            .await
            .videos
            .values()
            .filter(|v| v.coach_viewed_at.is_none() && v.uploaded_at < cutoff)
            .cloned()
            .collect())
    }

    async fn list_videos_for_program(&self, program_id: DbId) -> StoreResult<Vec<VideoArtifact>> {
        Ok(self
            .tables
            .lock()
            .await
            .videos
            .values()
            .filter(|v| v.program_id == program_id)
            .cloned()
            .collect())
    }

    async fn delete_video(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.lock().await.videos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn new_link(coach_id: DbId, client_profile_id: DbId) -> NewClientLink {
        NewClientLink {
            coach_id,
            client_profile_id,
            display_name: "Sam".into(),
        }
    }

    #[tokio::test]
    async fn second_link_for_same_client_conflicts() {
        let store = MemoryStore::new();
        store.create_client_link(&new_link(1, 10)).await.unwrap();

        let err = store.create_client_link(&new_link(2, 10)).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(ref msg) if msg == "Client already has a coach");
        let again = store.create_client_link(&new_link(1, 10)).await;
        assert_matches!(again, Err(CoreError::Conflict(_)));
        assert_eq!(store.client_links().await.len(), 1);
    }

    #[tokio::test]
    async fn links_for_different_clients_coexist() {
        let store = MemoryStore::new();
        store.create_client_link(&new_link(1, 10)).await.unwrap();
        store.create_client_link(&new_link(1, 11)).await.unwrap();
        assert_eq!(store.list_client_links(1).await.unwrap().len(), 2);
    }
}
