//! Sentence-ordinal restriction (spec.md §4.F item 4).

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::CoreConfig;
use crate::rope::Span;

static SENTENCE_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+|[^.!?]+$").unwrap());

/// Restricts `range` to its `ordinal`-th sentence (1-based); `ordinal <= 0`
/// selects the last sentence. Falls back to `range` unchanged if no
/// sentence boundary is found at all.
pub fn restrict_to_sentence(config: &CoreConfig, text: &str, range: Span, ordinal: i64) -> Span {
    let slice = &text[range.start..range.end];

    let mut spans: Vec<Span> = Vec::new();
    if config.use_unicode_sentence_segmenter {
        for sentence in slice.split_sentence_bounds() {
            if sentence.trim().is_empty() {
                continue;
            }
            let offset = byte_offset_of(slice, sentence);
            spans.push(Span::new(range.start + offset, range.start + offset + sentence.len()));
        }
    }

    if spans.is_empty() {
        for m in SENTENCE_FALLBACK_RE.find_iter(slice) {
            spans.push(Span::new(range.start + m.start(), range.start + m.end()));
        }
    }

    if spans.is_empty() {
        return range;
    }

    let idx = if ordinal <= 0 {
        spans.len() - 1
    } else {
        ((ordinal as usize).saturating_sub(1)).min(spans.len() - 1)
    };
    spans[idx]
}

fn byte_offset_of(haystack: &str, needle: &str) -> usize {
    needle.as_ptr() as usize - haystack.as_ptr() as usize
}
