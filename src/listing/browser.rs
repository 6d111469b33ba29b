//! Interactive listing sessions.
//!
//! Each `/groups` invocation opens a session holding its pages and the
//! current index. Sessions live in a Moka cache (idle sessions expire) and
//! each operator has at most one: opening a new listing discards the old one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::debug;

use super::nav::{self, NOOP_TOKEN, NavToken};
use super::Page;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};

/// Pages of one listing plus the page being shown.
#[derive(Debug, Clone)]
pub struct PagerSession {
    pages: Arc<Vec<Page>>,
    current: usize,
}

impl PagerSession {
    /// Start at the first page. An empty `pages` becomes a single empty page.
    pub fn new(pages: Vec<Page>) -> Self {
        let pages = if pages.is_empty() { vec![Page::default()] } else { pages };
        Self {
            pages: Arc::new(pages),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self) -> &Page {
        &self.pages[self.current]
    }

    /// Jump to `requested`, or the nearest valid page if it is out of range.
    pub fn go_to(&mut self, requested: usize) {
        self.current = nav::clamp(requested, self.page_count());
    }

    /// Previous/next buttons for the current page. Disabled controls show
    /// a dot and carry a no-op payload.
    pub fn keyboard(&self, session: u64) -> InlineKeyboardMarkup {
        let state = nav::nav_state(self.current, self.page_count());

        let button = |target: Option<usize>, label: fn(usize) -> String| match target {
            Some(page) => {
                InlineKeyboardButton::callback(label(page), NavToken { session, page }.to_string())
            }
            None => InlineKeyboardButton::callback("·", NOOP_TOKEN),
        };

        InlineKeyboardMarkup::new(vec![vec![
            button(state.previous, |page| format!("« {}", page + 1)),
            button(state.next, |page| format!("{} »", page + 1)),
        ]])
    }
}

/// Store of live listing sessions.
#[derive(Clone)]
pub struct ListingBrowser {
    sessions: TypedCache<u64, PagerSession>,
    by_operator: Arc<DashMap<u64, u64>>,
    next_id: Arc<AtomicU64>,
}

impl ListingBrowser {
    pub fn new(cache: &CacheRegistry) -> Self {
        // Seed from the clock so tokens from before a restart don't match
        // sessions created after it.
        let seed = chrono::Utc::now().timestamp_millis().unsigned_abs();

        Self {
            sessions: cache.get_or_create("listing_sessions", CacheConfig::session_data()),
            by_operator: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(seed)),
        }
    }

    /// Open a session for `operator`, replacing any earlier one.
    pub fn open(&self, operator: u64, pages: Vec<Page>) -> (u64, PagerSession) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = PagerSession::new(pages);

        if let Some(old) = self.by_operator.insert(operator, id) {
            self.sessions.invalidate(&old);
            debug!("Listing {} superseded by {} for {}", old, id, operator);
        }
        self.sessions.insert(id, session.clone());
        debug!(
            "Opened listing {} with {} pages in {}",
            id,
            session.page_count(),
            self.sessions.name()
        );

        (id, session)
    }

    /// Apply a navigation token. Returns `None` if the session is gone.
    pub fn navigate(&self, token: NavToken) -> Option<PagerSession> {
        let mut session = self.sessions.get(&token.session)?;
        session.go_to(token.page);
        self.sessions.insert(token.session, session.clone());
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use teloxide::types::InlineKeyboardButtonKind;

    use super::super::nav::Nav;
    use super::super::{RenderedItem, paginate};
    use super::*;

    fn pages(count: usize) -> Vec<Page> {
        let items = (0..count).map(|i| RenderedItem::new(format!("{i:>9}\n")));
        paginate(items, NonZeroUsize::new(10).unwrap())
    }

    fn press(session: &mut PagerSession, action: Nav) {
        let target = nav::step(session.current(), session.page_count(), action);
        session.go_to(target);
    }

    fn callbacks(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup.inline_keyboard[0]
            .iter()
            .map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                other => panic!("unexpected button {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_empty_listing_stays_put() {
        let mut session = PagerSession::new(paginate(Vec::new(), NonZeroUsize::new(10).unwrap()));
        assert_eq!(session.page_count(), 1);

        press(&mut session, Nav::Next);
        assert_eq!(session.current(), 0);
        press(&mut session, Nav::Previous);
        assert_eq!(session.current(), 0);
        assert_eq!(callbacks(&session.keyboard(1)), vec![NOOP_TOKEN, NOOP_TOKEN]);
    }

    #[test]
    fn test_keyboard_targets() {
        let mut session = PagerSession::new(pages(3));
        assert_eq!(session.page_count(), 3);
        assert_eq!(callbacks(&session.keyboard(7)), vec![NOOP_TOKEN, "groups:7:1"]);

        press(&mut session, Nav::Next);
        assert_eq!(callbacks(&session.keyboard(7)), vec!["groups:7:0", "groups:7:2"]);

        press(&mut session, Nav::Next);
        press(&mut session, Nav::Next);
        assert_eq!(session.current(), 2);
        assert_eq!(callbacks(&session.keyboard(7)), vec!["groups:7:1", NOOP_TOKEN]);
    }

    #[test]
    fn test_navigate_and_stale_tokens() {
        let browser = ListingBrowser::new(&CacheRegistry::new());
        let (id, session) = browser.open(1, pages(4));
        assert_eq!(session.current(), 0);

        let moved = browser.navigate(NavToken { session: id, page: 2 }).unwrap();
        assert_eq!(moved.current(), 2);

        // Out of range clamps to the last page
        let clamped = browser.navigate(NavToken { session: id, page: 40 }).unwrap();
        assert_eq!(clamped.current(), 3);

        // Unknown session
        assert!(browser.navigate(NavToken { session: id + 100, page: 0 }).is_none());
    }

    #[test]
    fn test_new_listing_supersedes_old() {
        let browser = ListingBrowser::new(&CacheRegistry::new());
        let (first, _) = browser.open(1, pages(2));
        let (other, _) = browser.open(2, pages(2));
        let (second, _) = browser.open(1, pages(3));

        assert_ne!(first, second);
        assert!(browser.navigate(NavToken { session: first, page: 1 }).is_none());
        assert!(browser.navigate(NavToken { session: second, page: 1 }).is_some());
        // Other operators keep their sessions
        assert!(browser.navigate(NavToken { session: other, page: 1 }).is_some());
    }
}
