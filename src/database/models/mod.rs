//! Database models.

pub mod chat;
pub mod user;

pub use chat::ChatRecord;
pub use user::UserRecord;
