//! Utility functions.
//!
//! Collection of helpers used across the bot.

pub mod format;
pub mod message;

pub use format::{format_uptime, html_escape, no_preview, user_mention, with_preview};
pub use message::MessageExt;
