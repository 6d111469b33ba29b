//! Administrative broadcasts.
//!
//! A broadcast takes one snapshot of users or chats, delivers the same
//! content to each of them in order through the throttled bot, classifies
//! every attempt and reports a single summary to the operator.

mod content;
mod fanout;
mod outcome;
mod recipients;
mod surface;
mod tally;

pub use content::{BroadcastContent, deliver};
pub use fanout::{BroadcastError, run_broadcast};
pub use outcome::{DeliveryFailure, DeliveryOutcome, classify};
pub use recipients::{Recipient, RecipientKind, RecipientSource, StoredRecipients};
pub use surface::{ChatSurface, StatusSurface};
pub use tally::BroadcastTally;
