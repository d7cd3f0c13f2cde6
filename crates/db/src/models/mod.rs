//! Row structs for each table.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! a conversion into the matching `coachsync_core` type. Enum-like columns
//! are stored as text and parsed on the way out.

pub mod client_link;
pub mod notification;
pub mod personal_record;
pub mod profile;
pub mod program;
pub mod video_artifact;
