//! Small shared helpers.

/// Current time as an RFC 3339 timestamp, UTC.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Truncate a string to at most `max_chars` characters, appending "..." if
/// truncated. Safe for multi-byte UTF-8 (emoji, CJK): truncation happens at
/// character boundaries, never byte indices.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}
