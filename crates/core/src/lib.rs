//! Domain logic for coachsync.
//!
//! Everything in this crate is independent of the database: persistence is
//! reached through the traits in [`store`], implemented by `coachsync_db`
//! for PostgreSQL and by [`memory::MemoryStore`] for tests and local runs.

pub mod capacity;
pub mod diff;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod media;
pub mod memory;
pub mod personal_records;
pub mod profile;
pub mod program;
pub mod roles;
pub mod store;
pub mod types;
pub mod video;
