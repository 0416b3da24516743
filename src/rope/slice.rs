use super::span::Span;

/// Extracts the text for a span from plain text as an owned String.
pub fn slice_to_string(text: &str, sp: Span) -> String {
    text[sp.start..sp.end].to_string()
}

/// Extracts text for a span, truncating to `max` bytes with "..." suffix if needed.
///
/// Used for the 180-byte attempt-record preview (spec.md §4.F).
pub fn preview(text: &str, sp: Span, max: usize) -> String {
    let mut s = slice_to_string(text, sp);
    if s.len() > max {
        let mut cut = max;
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push_str("...");
    }
    s
}
