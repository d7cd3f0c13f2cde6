pub mod coaches;
pub mod notifications;
pub mod personal_records;
pub mod programs;
pub mod videos;
