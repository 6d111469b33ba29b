//! Page navigation rules and the callback tokens that carry them.

use std::fmt;

/// Callback data prefix for listing navigation.
pub const TOKEN_PREFIX: &str = "groups";

/// Callback data of a disabled control.
pub const NOOP_TOKEN: &str = "groups:noop";

/// A navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Next,
    Previous,
}

/// Index reached from `current` by `nav`, clamped to `[0, page_count - 1]`.
pub fn step(current: usize, page_count: usize, nav: Nav) -> usize {
    let last = page_count.saturating_sub(1);
    match nav {
        Nav::Next => current.saturating_add(1).min(last),
        Nav::Previous => current.saturating_sub(1).min(last),
    }
}

/// Nearest valid index for a possibly stale request.
pub fn clamp(requested: usize, page_count: usize) -> usize {
    requested.min(page_count.saturating_sub(1))
}

/// State of the two navigation controls for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

/// Controls for page `current` of `page_count`; a control is `None`
/// (disabled) when it would not move.
pub fn nav_state(current: usize, page_count: usize) -> NavState {
    let current = clamp(current, page_count);
    let target = |nav| Some(step(current, page_count, nav)).filter(|&t| t != current);
    NavState {
        previous: target(Nav::Previous),
        next: target(Nav::Next),
    }
}

/// Callback payload `groups:<session>:<page>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavToken {
    pub session: u64,
    pub page: usize,
}

impl NavToken {
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        if parts.next()? != TOKEN_PREFIX {
            return None;
        }
        let session = parts.next()?.parse().ok()?;
        let page = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { session, page })
    }
}

impl fmt::Display for NavToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", TOKEN_PREFIX, self.session, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_boundaries() {
        assert_eq!(step(0, 4, Nav::Previous), 0);
        assert_eq!(step(3, 4, Nav::Next), 3);
        assert_eq!(step(1, 4, Nav::Next), 2);
        assert_eq!(step(2, 4, Nav::Previous), 1);
    }

    #[test]
    fn test_single_page_never_moves() {
        assert_eq!(step(0, 1, Nav::Next), 0);
        assert_eq!(step(0, 1, Nav::Previous), 0);
        assert_eq!(nav_state(0, 1), NavState { previous: None, next: None });
    }

    #[test]
    fn test_nav_state() {
        assert_eq!(nav_state(0, 3), NavState { previous: None, next: Some(1) });
        assert_eq!(nav_state(1, 3), NavState { previous: Some(0), next: Some(2) });
        assert_eq!(nav_state(2, 3), NavState { previous: Some(1), next: None });
        // Out of range is treated as the last page
        assert_eq!(nav_state(9, 3), NavState { previous: Some(1), next: None });
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(7, 3), 2);
        assert_eq!(clamp(1, 3), 1);
        assert_eq!(clamp(5, 0), 0);
    }

    #[test]
    fn test_token_parse() {
        let token = NavToken { session: 42, page: 3 };
        assert_eq!(NavToken::parse(&token.to_string()), Some(token));
        assert_eq!(NavToken::parse("groups:42:-1"), None);
        assert_eq!(NavToken::parse("groups:noop"), None);
        assert_eq!(NavToken::parse("groups:1:2:3"), None);
        assert_eq!(NavToken::parse("help:1:2"), None);
        assert_eq!(NavToken::parse("groups:1:99999999999999999999999"), None);
    }
}
