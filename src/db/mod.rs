//! Database access layer. Route handlers call these functions; nothing
//! here knows about HTTP.

pub mod archives;
pub mod exams;
pub mod game;
pub mod messages;
pub mod prefs;
pub mod study_logs;
pub mod targets;
pub mod tasks;
pub mod users;
pub mod wishlist;
