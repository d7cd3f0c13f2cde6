//! Route definitions for the `/videos` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// POST   /{filename}/viewed  -> mark_viewed
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{filename}/viewed", post(videos::mark_viewed))
}
