//! Paged listings with previous/next navigation.

mod browser;
pub mod nav;
mod pager;

pub use browser::{ListingBrowser, PagerSession};
pub use nav::NavToken;
pub use pager::{Page, RenderedItem, paginate};
