//! The synchronization engine.
//!
//! Orchestrates the pure pieces of this crate over the persistence seams in
//! [`crate::store`]:
//!
//! - **save**: authorize, persist the whole document, diff against the prior
//!   version, notify the counterpart and (for client saves) promote
//!   personal records.
//! - **videos**: accept uploads, record coach views and sweep expired
//!   artifacts together with every reference to them.
//! - **joining**: link a client to a coach through the capacity gate.
//!
//! Foreground operations propagate storage failures. Work that happens
//! after the document is durable (notifications, record promotion) and the
//! background sweep log failures and carry on.

use chrono::Utc;
use serde::Serialize;

use crate::capacity::{evaluate_join, ClientLink, JoinDecision, NewClientLink};
use crate::diff::{diff_programs, DiffScope};
use crate::error::CoreError;
use crate::feedback::{draft_notifications, Notification};
use crate::personal_records::{
    scan_for_promotions, KeywordLiftClassifier, LiftClassifier, PersonalRecord,
};
use crate::program::Program;
use crate::roles::{Actor, Role};
use crate::store::{MediaStore, Store};
use crate::types::{DbId, Timestamp};
use crate::video::{
    scrub_video_references, validate_video_extension, ExpiryPolicy, NewVideoArtifact,
    SweepReport, VideoArtifact,
};

/// Result of a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub program: Program,
    pub notifications: Vec<Notification>,
    pub promoted: Vec<PersonalRecord>,
}

/// Counts of what a program deletion removed alongside the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramDeletion {
    pub videos_deleted: usize,
    pub notifications_deleted: u64,
}

pub struct SyncEngine<S, M, C = KeywordLiftClassifier> {
    store: S,
    media: M,
    classifier: C,
    policy: ExpiryPolicy,
}

impl<S: Store, M: MediaStore> SyncEngine<S, M> {
    pub fn new(store: S, media: M) -> Self {
        Self {
            store,
            media,
            classifier: KeywordLiftClassifier::default(),
            policy: ExpiryPolicy::default(),
        }
    }
}

impl<S: Store, M: MediaStore, C: LiftClassifier> SyncEngine<S, M, C> {
    /// Replace the lift classifier used by the record scan.
    pub fn with_classifier<C2: LiftClassifier>(self, classifier: C2) -> SyncEngine<S, M, C2> {
        SyncEngine {
            store: self.store,
            media: self.media,
            classifier,
            policy: self.policy,
        }
    }

    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Persist `candidate` on behalf of `actor`, then notify and promote.
    ///
    /// Identity fields (`id`, `coach_id`, `created_at`) always come from the
    /// stored version; a client cannot reassign the program either.
    pub async fn save_program(
        &self,
        actor: Actor,
        mut candidate: Program,
        scope: Option<DiffScope>,
    ) -> Result<SaveOutcome, CoreError> {
        let prior = self
            .store
            .load_program(candidate.id)
            .await?
            .ok_or_else(|| CoreError::not_found("Program", candidate.id))?;

        authorize_program_access(&actor, &prior)?;
        candidate.validate_structure()?;

        candidate.id = prior.id;
        candidate.coach_id = prior.coach_id;
        candidate.created_at = prior.created_at;
        if actor.role == Role::Client {
            candidate.client_id = prior.client_id;
        }

        let program = self.store.save_program(&candidate).await?;

        let transitions = diff_programs(&prior, &program, actor.role, scope);
        tracing::debug!(
            program_id = program.id,
            role = %actor.role,
            transitions = transitions.len(),
            "Program saved",
        );

        let notifications = if transitions.is_empty() {
            Vec::new()
        } else {
            self.dispatch_notifications(&actor, &program, &transitions)
                .await
        };

        let promoted = if actor.role == Role::Client {
            match self.promote_records(actor.profile_id, &program).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        program_id = program.id,
                        profile_id = actor.profile_id,
                        error = %e,
                        "Personal record scan failed",
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(SaveOutcome {
            program,
            notifications,
            promoted,
        })
    }

    /// The profile that should hear about `actor`'s edits, if any.
    async fn resolve_counterpart(
        &self,
        actor: &Actor,
        program: &Program,
    ) -> Result<Option<DbId>, CoreError> {
        match actor.role {
            Role::Client => Ok(Some(program.coach_id)),
            Role::Coach => {
                let Some(client_id) = program.client_id else {
                    return Ok(None);
                };
                let link = self
                    .store
                    .resolve_client_link(program.coach_id, client_id)
                    .await?;
                Ok(link.map(|l| l.client_profile_id))
            }
        }
    }

    async fn dispatch_notifications(
        &self,
        actor: &Actor,
        program: &Program,
        transitions: &[crate::diff::FieldTransition],
    ) -> Vec<Notification> {
        let recipient = match self.resolve_counterpart(actor, program).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(
                    program_id = program.id,
                    "No linked counterpart, notifications suppressed"
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(program_id = program.id, error = %e, "Failed to resolve counterpart");
                return Vec::new();
            }
        };

        let drafts = draft_notifications(transitions, actor.role, recipient, program);
        let mut sent = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            match self.store.create_notification(draft).await {
                Ok(n) => sent.push(n),
                Err(e) => tracing::warn!(
                    program_id = program.id,
                    recipient,
                    kind = draft.kind.as_str(),
                    error = %e,
                    "Failed to persist notification",
                ),
            }
        }
        if !sent.is_empty() {
            tracing::info!(program_id = program.id, recipient, count = sent.len(), "Notifications sent");
        }
        sent
    }

    async fn promote_records(
        &self,
        profile_id: DbId,
        program: &Program,
    ) -> Result<Vec<PersonalRecord>, CoreError> {
        let profile = self
            .store
            .find_profile(profile_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
        let existing = self.store.list_prs(profile_id).await?;

        let proposals = scan_for_promotions(
            program,
            profile_id,
            profile.weight_unit,
            &existing,
            &self.classifier,
            Utc::now(),
        );

        let mut promoted = Vec::with_capacity(proposals.len());
        for proposal in &proposals {
            let record = self.store.create_pr(proposal).await?;
            tracing::info!(
                profile_id,
                lift = record.lift_type.as_str(),
                weight = record.weight,
                "Personal record promoted",
            );
            promoted.push(record);
        }
        Ok(promoted)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete a program with its videos and the notifications about it.
    pub async fn delete_program(
        &self,
        actor: Actor,
        program_id: DbId,
    ) -> Result<ProgramDeletion, CoreError> {
        let program = self
            .store
            .load_program(program_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Program", program_id))?;
        if actor.role != Role::Coach || actor.profile_id != program.coach_id {
            return Err(CoreError::Forbidden(
                "Only the owning coach can delete a program".into(),
            ));
        }

        let mut deletion = ProgramDeletion::default();
        for artifact in self.store.list_videos_for_program(program_id).await? {
            self.media.delete_file(&artifact.filename).await?;
            if self.store.delete_video(artifact.id).await? {
                deletion.videos_deleted += 1;
            }
        }

        let mut recipients = vec![program.coach_id];
        recipients.extend(program.client_id);
        for profile_id in recipients {
            deletion.notifications_deleted += self
                .store
                .delete_notifications_for_program(program_id, profile_id)
                .await?;
        }

        self.store.delete_program(program_id).await?;
        tracing::info!(
            program_id,
            videos = deletion.videos_deleted,
            notifications = deletion.notifications_deleted,
            "Program deleted",
        );
        Ok(deletion)
    }

    // -----------------------------------------------------------------------
    // Videos
    // -----------------------------------------------------------------------

    /// Register an already stored file as a video artifact.
    pub async fn record_upload(
        &self,
        program_id: DbId,
        exercise_id: &str,
        uploader_id: DbId,
        coach_id: DbId,
        filename: &str,
    ) -> Result<VideoArtifact, CoreError> {
        let artifact = self
            .store
            .create_video(&NewVideoArtifact {
                filename: filename.to_string(),
                program_id,
                exercise_id: exercise_id.to_string(),
                uploader_id,
                coach_id,
                uploaded_at: Utc::now(),
            })
            .await?;
        tracing::info!(
            program_id,
            exercise_id,
            filename = %artifact.filename,
            "Video recorded",
        );
        Ok(artifact)
    }

    /// Store an uploaded form-check video for one exercise and record it.
    ///
    /// Only the program's assigned client may upload. The exercise's video
    /// reference is not touched here; the client sets it with a normal save.
    pub async fn upload_video(
        &self,
        actor: Actor,
        program_id: DbId,
        exercise_id: &str,
        bytes: &[u8],
        extension: &str,
    ) -> Result<VideoArtifact, CoreError> {
        let extension = validate_video_extension(extension)?;
        if bytes.is_empty() {
            return Err(CoreError::Validation("Video file is empty".into()));
        }

        let program = self
            .store
            .load_program(program_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Program", program_id))?;
        if actor.role != Role::Client || program.client_id != Some(actor.profile_id) {
            return Err(CoreError::Forbidden(
                "Only the assigned client can upload videos".into(),
            ));
        }
        if program.find_exercise(exercise_id).is_none() {
            return Err(CoreError::not_found("Exercise", exercise_id));
        }

        let filename = self.media.store_file(bytes, &extension).await?;
        match self
            .record_upload(
                program_id,
                exercise_id,
                actor.profile_id,
                program.coach_id,
                &filename,
            )
            .await
        {
            Ok(artifact) => Ok(artifact),
            Err(e) => {
                if let Err(cleanup) = self.media.delete_file(&filename).await {
                    tracing::warn!(%filename, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e)
            }
        }
    }

    /// Record the first coach view of `filename`. Returns `false` when no
    /// artifact exists or it was already viewed.
    pub async fn mark_viewed(&self, filename: &str) -> Result<bool, CoreError> {
        let changed = self.store.mark_video_viewed(filename, Utc::now()).await?;
        if changed {
            tracing::debug!(%filename, "Video marked as viewed");
        }
        Ok(changed)
    }

    /// Coach-facing view: checks the artifact belongs to `actor` before
    /// recording the view.
    pub async fn open_video(&self, actor: Actor, filename: &str) -> Result<VideoArtifact, CoreError> {
        let artifact = self
            .store
            .find_video(filename)
            .await?
            .ok_or_else(|| CoreError::not_found("Video", filename))?;
        if actor.role != Role::Coach || artifact.coach_id != actor.profile_id {
            return Err(CoreError::Forbidden(
                "Only the program's coach can review this video".into(),
            ));
        }
        self.mark_viewed(filename).await?;
        Ok(self
            .store
            .find_video(filename)
            .await?
            .unwrap_or(artifact))
    }

    /// Run one expiry sweep against the current time.
    pub async fn sweep_expired(&self) -> SweepReport {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Delete every artifact expired at `now`, its file and every program
    /// reference to it.
    ///
    /// A failing artifact is logged and left in place so the next sweep
    /// retries it; the rest of the batch continues.
    pub async fn sweep_expired_at(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();
        let mut batch = Vec::new();

        match self
            .store
            .list_viewed_before(self.policy.viewed_cutoff(now))
            .await
        {
            Ok(found) => batch.extend(found),
            Err(e) => {
                tracing::error!(error = %e, "Failed to select viewed videos");
                report.errors.push(format!("select viewed: {e}"));
            }
        }
        match self
            .store
            .list_unviewed_uploaded_before(self.policy.unviewed_cutoff(now))
            .await
        {
            Ok(found) => batch.extend(found),
            Err(e) => {
                tracing::error!(error = %e, "Failed to select unviewed videos");
                report.errors.push(format!("select unviewed: {e}"));
            }
        }
        // An artifact viewed between the two selections shows up in both.
        batch.sort_by_key(|a| a.id);
        batch.dedup_by_key(|a| a.id);
        batch.retain(|a| self.policy.is_expired(a, now));
        report.selected = batch.len();

        for artifact in &batch {
            if let Err(e) = self.expire_artifact(artifact, &mut report).await {
                tracing::warn!(
                    video_id = artifact.id,
                    filename = %artifact.filename,
                    error = %e,
                    "Failed to expire video",
                );
                report.errors.push(format!("{}: {e}", artifact.filename));
            }
        }

        if report.selected > 0 {
            tracing::info!(
                selected = report.selected,
                deleted = report.artifacts_deleted,
                programs_updated = report.programs_updated,
                errors = report.errors.len(),
                "Video sweep finished",
            );
        }
        report
    }

    async fn expire_artifact(
        &self,
        artifact: &VideoArtifact,
        report: &mut SweepReport,
    ) -> Result<(), CoreError> {
        if self.media.delete_file(&artifact.filename).await? {
            report.files_deleted += 1;
        } else {
            tracing::debug!(filename = %artifact.filename, "Video file already gone");
        }

        if let Some(mut program) = self.store.load_program(artifact.program_id).await? {
            let cleared = scrub_video_references(&mut program, &artifact.filename);
            if cleared > 0 {
                self.store.save_program(&program).await?;
                report.programs_updated += 1;
                report.references_cleared += cleared;
            }
        }

        if self.store.delete_video(artifact.id).await? {
            report.artifacts_deleted += 1;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Joining
    // -----------------------------------------------------------------------

    /// Link `client_profile_id` to the coach owning `code`.
    ///
    /// Joining the same coach twice returns the existing link.
    pub async fn join_coach(
        &self,
        code: &str,
        client_profile_id: DbId,
    ) -> Result<ClientLink, CoreError> {
        let client = self
            .store
            .find_profile(client_profile_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Profile", client_profile_id))?;
        if client.role != Role::Client {
            return Err(CoreError::Validation(
                "Only client profiles can join a coach".into(),
            ));
        }

        let coach = self
            .store
            .find_coach_by_code(code)
            .await?
            .ok_or_else(|| CoreError::UnknownCoachCode(code.trim().to_string()))?;

        let existing = self.store.find_link_for_client(client_profile_id).await?;
        let active_links = match existing {
            Some(_) => 0,
            None => self.store.list_client_links(coach.id).await?.len(),
        };

        match evaluate_join(&coach, existing.as_ref(), active_links)? {
            JoinDecision::AlreadyLinked(link) => Ok(link),
            JoinDecision::Create => {
                let link = self
                    .store
                    .create_client_link(&NewClientLink {
                        coach_id: coach.id,
                        client_profile_id,
                        display_name: client.display_name.clone(),
                    })
                    .await?;
                tracing::info!(coach_id = coach.id, client_profile_id, "Client joined coach");
                Ok(link)
            }
        }
    }
}

/// The owning coach or the assigned client may save a program.
pub fn authorize_program_access(actor: &Actor, program: &Program) -> Result<(), CoreError> {
    let allowed = match actor.role {
        Role::Coach => program.coach_id == actor.profile_id,
        Role::Client => program.client_id == Some(actor.profile_id),
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Profile {} cannot edit program {}",
            actor.profile_id, program.id
        )))
    }
}
