//! Integration tests for the PostgreSQL store.
//!
//! `#[sqlx::test]` creates a fresh database per test through `DATABASE_URL`
//! and applies `crates/db/migrations`.

use chrono::{Duration, Utc};
use coachsync_core::capacity::NewClientLink;
use coachsync_core::engine::SyncEngine;
use coachsync_core::error::CoreError;
use coachsync_core::media::LocalMediaStore;
use coachsync_core::personal_records::LiftType;
use coachsync_core::profile::{Profile, WeightUnit};
use coachsync_core::program::{Day, Exercise, Program, ProgramStatus, Week};
use coachsync_core::roles::{Actor, Role};
use coachsync_core::store::{ClientLinkStore, ProfileStore, ProgramStore, VideoStore};
use coachsync_core::video::NewVideoArtifact;
use coachsync_db::models::profile::CreateProfile;
use coachsync_db::repositories::{NotificationRepo, ProfileRepo, ProgramRepo};
use coachsync_db::PgStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_profile(pool: &PgPool, name: &str, role: Role, code: Option<&str>) -> Profile {
    let row = ProfileRepo::create(
        pool,
        &CreateProfile {
            display_name: name.to_string(),
            role,
            coach_code: code.map(str::to_string),
            plan_name: "Starter".to_string(),
            plan_user_limit: 1,
            weight_unit: WeightUnit::Kg,
        },
    )
    .await
    .unwrap();
    Profile::try_from(row).unwrap()
}

async fn new_program(pool: &PgPool, coach_id: i64, client_id: Option<i64>) -> Program {
    let now = Utc::now();
    let draft = Program {
        id: 0,
        title: "Meet Prep".to_string(),
        description: String::new(),
        weeks: vec![Week {
            week_number: 1,
            days: vec![Day {
                day_number: 1,
                exercises: vec![Exercise {
                    id: "ex-1".to_string(),
                    name: "Squat".to_string(),
                    weight: "100".to_string(),
                    ..Default::default()
                }],
            }],
        }],
        days_per_week: 4,
        status: ProgramStatus::Active,
        coach_id,
        client_id,
        share_code: String::new(),
        created_at: now,
        updated_at: now,
    };
    Program::try_from(ProgramRepo::create(pool, &draft).await.unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    coachsync_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_program_document_round_trips_through_jsonb(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("ABC")).await;
    let program = new_program(&pool, coach.id, None).await;
    let store = PgStore::new(pool);

    let mut edited = program.clone();
    edited.weeks[0].days[0].exercises[0].coach_comment = "Brace harder".to_string();
    let saved = store.save_program(&edited).await.unwrap();
    assert!(saved.updated_at >= program.updated_at);

    let loaded = store.load_program(program.id).await.unwrap().unwrap();
    assert_eq!(loaded.weeks, edited.weeks);
    assert_eq!(loaded.status, ProgramStatus::Active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_saving_missing_program_is_not_found(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("ABC")).await;
    let mut program = new_program(&pool, coach.id, None).await;
    let store = PgStore::new(pool);
    program.id += 1000;

    let err = store.save_program(&program).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { entity: "Program", .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_coach_code_lookup_ignores_case(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("KIM123")).await;
    let store = PgStore::new(pool);

    let found = store.find_coach_by_code(" kim123 ").await.unwrap().unwrap();
    assert_eq!(found.id, coach.id);
    assert!(store.find_coach_by_code("OTHER").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_link_for_client_is_a_conflict(pool: PgPool) {
    let a = new_profile(&pool, "A", Role::Coach, Some("AAA")).await;
    let b = new_profile(&pool, "B", Role::Coach, Some("BBB")).await;
    let client = new_profile(&pool, "Sam", Role::Client, None).await;
    let store = PgStore::new(pool);

    let link = |coach_id| NewClientLink {
        coach_id,
        client_profile_id: client.id,
        display_name: "Sam".to_string(),
    };
    store.create_client_link(&link(a.id)).await.unwrap();
    let err = store.create_client_link(&link(b.id)).await.unwrap_err();
    assert!(matches!(err, CoreError::Conflict(ref m) if m == "Client already has a coach"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_viewed_only_once(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("ABC")).await;
    let client = new_profile(&pool, "Sam", Role::Client, None).await;
    let program = new_program(&pool, coach.id, Some(client.id)).await;
    let store = PgStore::new(pool);

    store
        .create_video(&NewVideoArtifact {
            filename: "clip.mp4".to_string(),
            program_id: program.id,
            exercise_id: "ex-1".to_string(),
            uploader_id: client.id,
            coach_id: coach.id,
            uploaded_at: Utc::now() - Duration::days(1),
        })
        .await
        .unwrap();

    assert!(store.mark_video_viewed("clip.mp4", Utc::now()).await.unwrap());
    assert!(!store.mark_video_viewed("clip.mp4", Utc::now()).await.unwrap());
    assert!(!store.mark_video_viewed("missing.mp4", Utc::now()).await.unwrap());

    let viewed = store
        .list_viewed_before(Utc::now() + Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(viewed.len(), 1);
    assert!(store
        .list_unviewed_uploaded_before(Utc::now())
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sweep_selects_by_view_and_upload_age(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("ABC")).await;
    let client = new_profile(&pool, "Sam", Role::Client, None).await;
    let mut program = new_program(&pool, coach.id, Some(client.id)).await;
    let dir = tempfile::tempdir().unwrap();
    let engine = SyncEngine::new(PgStore::new(pool.clone()), LocalMediaStore::new(dir.path()));
    let store = engine.store();
    let now = Utc::now();

    program.weeks[0].days[0].exercises[0].video_url = "/media/viewed-old.mp4".to_string();
    store.save_program(&program).await.unwrap();

    for (filename, uploaded_days_ago, viewed_days_ago) in [
        ("viewed-old.mp4", 5, Some(4)),
        ("viewed-new.mp4", 10, Some(2)),
        ("unviewed-old.mp4", 8, None),
        ("unviewed-new.mp4", 6, None),
    ] {
        store
            .create_video(&NewVideoArtifact {
                filename: filename.to_string(),
                program_id: program.id,
                exercise_id: "ex-1".to_string(),
                uploader_id: client.id,
                coach_id: coach.id,
                uploaded_at: now - Duration::days(uploaded_days_ago),
            })
            .await
            .unwrap();
        if let Some(days) = viewed_days_ago {
            assert!(store
                .mark_video_viewed(filename, now - Duration::days(days))
                .await
                .unwrap());
        }
    }

    let report = engine.sweep_expired_at(now).await;
    assert_eq!(report.selected, 2);
    assert_eq!(report.artifacts_deleted, 2);
    assert_eq!(report.references_cleared, 1);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    for gone in ["viewed-old.mp4", "unviewed-old.mp4"] {
        assert!(store.find_video(gone).await.unwrap().is_none());
    }
    for kept in ["viewed-new.mp4", "unviewed-new.mp4"] {
        assert!(store.find_video(kept).await.unwrap().is_some());
    }
    let reloaded = store.load_program(program.id).await.unwrap().unwrap();
    assert_eq!(reloaded.weeks[0].days[0].exercises[0].video_url, "");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_engine_over_postgres(pool: PgPool) {
    let coach = new_profile(&pool, "Coach", Role::Coach, Some("ABC")).await;
    let client = new_profile(&pool, "Sam", Role::Client, None).await;
    let program = new_program(&pool, coach.id, Some(client.id)).await;
    let dir = tempfile::tempdir().unwrap();
    let engine = SyncEngine::new(PgStore::new(pool.clone()), LocalMediaStore::new(dir.path()));

    engine.join_coach("abc", client.id).await.unwrap();
    assert!(engine
        .store()
        .resolve_client_link(coach.id, client.id)
        .await
        .unwrap()
        .is_some());

    let mut edited = program.clone();
    let squat = &mut edited.weeks[0].days[0].exercises[0];
    squat.is_completed = true;
    squat.client_notes = "Felt fast".to_string();

    let outcome = engine
        .save_program(Actor::client(client.id), edited, None)
        .await
        .unwrap();
    assert_eq!(outcome.notifications.len(), 2);
    assert_eq!(outcome.promoted.len(), 1);
    assert_eq!(outcome.promoted[0].lift_type, LiftType::Squat);

    let inbox = NotificationRepo::list_for_profile(&pool, coach.id, true, 50, 0)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);

    let deletion = engine
        .delete_program(Actor::coach(coach.id), program.id)
        .await
        .unwrap();
    assert_eq!(deletion.notifications_deleted, 2);
    assert!(engine.store().find_profile(coach.id).await.unwrap().is_some());
    assert!(engine.store().load_program(program.id).await.unwrap().is_none());
}
