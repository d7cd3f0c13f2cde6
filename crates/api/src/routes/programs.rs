//! Route definitions for the `/programs` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{programs, videos};
use crate::state::AppState;

/// Routes mounted at `/programs`.
///
/// ```text
/// GET    /{id}                                -> get_program
/// PUT    /{id}                                -> save_program
/// DELETE /{id}                                -> delete_program
/// POST   /{id}/exercises/{exercise_id}/videos -> upload_video
/// ```
///
/// The upload route lifts axum's default body cap; the server-wide
/// `RequestBodyLimitLayer` bounds it instead.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(programs::get_program)
                .put(programs::save_program)
                .delete(programs::delete_program),
        )
        .route(
            "/{id}/exercises/{exercise_id}/videos",
            post(videos::upload_video).layer(DefaultBodyLimit::disable()),
        )
}
