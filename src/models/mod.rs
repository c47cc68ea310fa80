//! Data model structs shared by the db and route layers.
//!
//! Row structs derive `sqlx::FromRow` and are validated on read; request
//! and response DTOs live next to the entity they belong to.

pub mod exam;
pub mod game;
pub mod message;
pub mod study_log;
pub mod target;
pub mod task;
pub mod user;
pub mod wishlist;

pub use exam::*;
pub use game::*;
pub use message::*;
pub use study_log::*;
pub use target::*;
pub use task::*;
pub use user::*;
pub use wishlist::*;
