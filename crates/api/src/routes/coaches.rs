use axum::routing::post;
use axum::Router;

use crate::handlers::coaches;
use crate::state::AppState;

/// Routes mounted at `/coaches`.
///
/// ```text
/// POST   /join  -> join_coach
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/join", post(coaches::join_coach))
}
