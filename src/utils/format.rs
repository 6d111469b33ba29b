//! Text formatting helpers.

use std::time::Duration;

use teloxide::types::LinkPreviewOptions;

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_uptime(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// HTML link that mentions a user by ID.
pub fn user_mention(user_id: i64, name: &str) -> String {
    format!(r#"<a href="tg://user?id={}">{}</a>"#, user_id, html_escape(name))
}

/// Link preview options with previews turned off.
pub fn no_preview() -> LinkPreviewOptions {
    preview_options(true)
}

/// Link preview options with Telegram's default preview.
pub fn with_preview() -> LinkPreviewOptions {
    preview_options(false)
}

fn preview_options(is_disabled: bool) -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(3_661)), "01:01:01");
        assert_eq!(format_uptime(Duration::from_secs(100 * 3600 + 59)), "100:00:59");
    }

    #[test]
    fn test_user_mention() {
        assert_eq!(
            user_mention(5, "Ana <3"),
            r#"<a href="tg://user?id=5">Ana &lt;3</a>"#
        );
    }
}
