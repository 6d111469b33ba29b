//! Message helper utilities.

use teloxide::types::Message;

/// Extension trait for reading command messages.
pub trait MessageExt {
    /// Text after the command word, trimmed. Empty if there is none.
    fn command_args(&self) -> &str;

    /// ID of the sender, if the message has one.
    fn sender_id(&self) -> Option<i64>;
}

impl MessageExt for Message {
    fn command_args(&self) -> &str {
        split_command(self.text().unwrap_or(""))
    }

    fn sender_id(&self) -> Option<i64> {
        self.from.as_ref().map(|u| u.id.0 as i64)
    }
}

/// Drop the leading `/command` (or `/command@bot`) word.
pub fn split_command(text: &str) -> &str {
    let text = text.trim_start();
    if !text.starts_with('/') {
        return text.trim();
    }
    match text.find(char::is_whitespace) {
        Some(pos) => text[pos..].trim(),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("/bc -d <b>hi</b> there"), "-d <b>hi</b> there");
        assert_eq!(split_command("/sendgp@nimbus_bot   text\nline"), "text\nline");
        assert_eq!(split_command("/groups"), "");
        assert_eq!(split_command("plain"), "plain");
    }
}
