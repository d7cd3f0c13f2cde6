use std::path::PathBuf;

use coachsync_core::video::{
    ExpiryPolicy, DEFAULT_UNVIEWED_RETENTION_DAYS, DEFAULT_VIEWED_RETENTION_DAYS,
};

use crate::auth::jwt::JwtConfig;

/// Default upload size cap: 200 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default sweep period: one hour.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding uploaded videos (default: `storage/videos`).
    pub media_dir: PathBuf,
    /// Largest accepted request body in bytes (default: 200 MiB).
    pub max_upload_bytes: usize,
    /// Seconds between expiry sweeps (default: `3600`).
    pub video_sweep_interval_secs: u64,
    /// Days a video is kept after the coach viewed it (default: `3`).
    pub video_viewed_retention_days: i64,
    /// Days an unviewed video is kept after upload (default: `7`).
    pub video_unviewed_retention_days: i64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `MEDIA_DIR`                     | `storage/videos`        |
    /// | `MAX_UPLOAD_BYTES`              | `209715200`             |
    /// | `VIDEO_SWEEP_INTERVAL_SECS`     | `3600`                  |
    /// | `VIDEO_VIEWED_RETENTION_DAYS`   | `3`                     |
    /// | `VIDEO_UNVIEWED_RETENTION_DAYS` | `7`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let media_dir = PathBuf::from(
            std::env::var("MEDIA_DIR").unwrap_or_else(|_| "storage/videos".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let video_sweep_interval_secs: u64 = std::env::var("VIDEO_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("VIDEO_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            video_sweep_interval_secs > 0,
            "VIDEO_SWEEP_INTERVAL_SECS must be positive"
        );

        let video_viewed_retention_days: i64 = std::env::var("VIDEO_VIEWED_RETENTION_DAYS")
            .unwrap_or_else(|_| DEFAULT_VIEWED_RETENTION_DAYS.to_string())
            .parse()
            .expect("VIDEO_VIEWED_RETENTION_DAYS must be a valid i64");

        let video_unviewed_retention_days: i64 = std::env::var("VIDEO_UNVIEWED_RETENTION_DAYS")
            .unwrap_or_else(|_| DEFAULT_UNVIEWED_RETENTION_DAYS.to_string())
            .parse()
            .expect("VIDEO_UNVIEWED_RETENTION_DAYS must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media_dir,
            max_upload_bytes,
            video_sweep_interval_secs,
            video_viewed_retention_days,
            video_unviewed_retention_days,
            jwt,
        }
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::from_days(
            self.video_viewed_retention_days,
            self.video_unviewed_retention_days,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_policy_uses_configured_days() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            media_dir: PathBuf::from("videos"),
            max_upload_bytes: 1024,
            video_sweep_interval_secs: 60,
            video_viewed_retention_days: 1,
            video_unviewed_retention_days: 2,
            jwt: JwtConfig {
                secret: "s".into(),
                access_token_expiry_mins: 15,
            },
        };
        assert_eq!(config.expiry_policy(), ExpiryPolicy::from_days(1, 2));
    }
}
