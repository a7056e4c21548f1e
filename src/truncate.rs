//! Bounding extracted article text for the agent's context window.

/// Appended when text is cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Keep at most `max_chars` characters of `text`, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
///
/// Lengths are counted in `char`s so a multi-byte code point is never split.
///
/// ```ignore
/// assert_eq!(truncate("Hello world", 5), "Hello...");
/// assert_eq!(truncate("Hello", 5), "Hello");
/// ```
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}
