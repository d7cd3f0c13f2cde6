//! Periodic expiry of form-check videos.
//!
//! Runs [`SyncEngine::sweep_expired`] once at startup and then on a fixed
//! interval using `tokio::time::interval`. Per-video failures are reported
//! by the sweep itself; this loop only schedules it.
//!
//! [`SyncEngine::sweep_expired`]: coachsync_core::engine::SyncEngine::sweep_expired

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::state::Engine;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(engine: Arc<Engine>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = period.as_secs(),
        viewed_retention_days = engine.policy().viewed_retention.num_days(),
        unviewed_retention_days = engine.policy().unviewed_retention.num_days(),
        "Video sweep job started"
    );

    // The first tick completes immediately, so a sweep runs at startup.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Video sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                let report = engine.sweep_expired().await;
                if report.selected == 0 {
                    tracing::debug!("Video sweep: nothing expired");
                } else if !report.errors.is_empty() {
                    tracing::warn!(
                        selected = report.selected,
                        deleted = report.artifacts_deleted,
                        failed = report.errors.len(),
                        "Video sweep: some videos could not be expired"
                    );
                }
            }
        }
    }
}
