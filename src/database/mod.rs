//! Database module exports.

mod chats;
mod models;
mod mongo;
mod users;

pub use chats::ChatRepo;
pub use models::*;
pub use mongo::Database;
pub use users::UserRepo;
