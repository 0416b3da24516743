//! Level-aware formatter for inserted/rewritten content (spec.md §4.F).
//!
//! Multi-line content is re-indented with leading `>` markers so the block
//! reads as nested at `targetLevel (+1 for insertions)` inside the
//! section's block-quote structure. Single-line content is left alone —
//! quoting a short inline phrase would misrepresent it as a new block.

/// Formats content being inserted as a new sibling one level below
/// `target_level`.
pub fn format_insertion(content: &str, target_level: usize) -> String {
    format_at_depth(content, target_level + 1)
}

/// Formats content replacing an existing node at `target_level`.
pub fn format_rewrite(content: &str, target_level: usize) -> String {
    format_at_depth(content, target_level)
}

fn format_at_depth(content: &str, depth: usize) -> String {
    if depth == 0 || !content.contains('\n') {
        return content.to_string();
    }
    let prefix = format!("{} ", ">".repeat(depth));
    content
        .lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_content_is_unaffected() {
        assert_eq!(format_insertion("new text", 3), "new text");
    }

    #[test]
    fn multiline_content_is_quoted_to_depth() {
        let formatted = format_insertion("first line\nsecond line", 1);
        assert_eq!(formatted, ">> first line\n>> second line");
    }
}
