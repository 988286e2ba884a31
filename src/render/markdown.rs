//! Telegram `Markdown` escaping.

/// Parse mode sent with every message. The escape set below belongs to it.
pub const PARSE_MODE: &str = "Markdown";

/// Characters prefixed with a backslash before user text is interpolated.
const SPECIAL_CHARS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes user-supplied text for interpolation into a message template.
///
/// Each special character is prefixed with a single backslash in one left to
/// right pass. The transform is not idempotent (escaped text gains another
/// backslash per special character), so apply it exactly once per substring.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
