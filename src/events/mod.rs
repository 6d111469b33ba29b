//! Event handler system.
//!
//! Add new event handlers by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_event;` below
//! 3. Adding the handler to `membership_handler()`

pub mod membership;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

/// Build the handler for join/leave service messages.
pub fn membership_handler() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(membership::joined_handler())
        .branch(membership::left_handler())
}
