//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_link_repo;
pub mod notification_repo;
pub mod personal_record_repo;
pub mod profile_repo;
pub mod program_repo;
pub mod video_artifact_repo;

pub use client_link_repo::ClientLinkRepo;
pub use notification_repo::NotificationRepo;
pub use personal_record_repo::PersonalRecordRepo;
pub use profile_repo::ProfileRepo;
pub use program_repo::ProgramRepo;
pub use video_artifact_repo::VideoArtifactRepo;
