//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod lifecycle;
mod runtime;
mod webhook;

use std::time::Instant;

use once_cell::sync::Lazy;

pub use dispatcher::{AppState, build_dispatcher};
pub use runtime::run;

/// Process start time, for uptime reports.
pub static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);
