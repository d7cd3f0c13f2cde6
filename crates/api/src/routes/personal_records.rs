use axum::routing::get;
use axum::Router;

use crate::handlers::personal_records;
use crate::state::AppState;

/// Routes mounted at `/personal-records`.
///
/// ```text
/// GET    /  -> list_personal_records
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(personal_records::list_personal_records))
}
