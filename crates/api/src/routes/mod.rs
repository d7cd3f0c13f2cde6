pub mod coaches;
pub mod health;
pub mod notifications;
pub mod personal_records;
pub mod programs;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /programs/{id}                                   get, save (PUT), delete
/// /programs/{id}/exercises/{exercise_id}/videos    upload video (POST, multipart)
///
/// /videos/{filename}/viewed                        mark viewed (POST, coach)
///
/// /coaches/join                                    join a coach by code (POST, client)
///
/// /notifications                                   list own notifications
/// /personal-records                                own record history + best per lift
/// ```
///
/// Every route requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/programs", programs::router())
        .nest("/videos", videos::router())
        .nest("/coaches", coaches::router())
        .nest("/notifications", notifications::router())
        .nest("/personal-records", personal_records::router())
}
