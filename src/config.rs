//! Typed, defaulted configuration (SPEC_FULL.md §3.2).
//!
//! Mirrors the shape of the teacher's sibling `markdown-neuraxis-config`
//! crate: a small `serde`-deserializable struct with a `Default` impl that
//! makes every documented scenario pass with no caller-supplied values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Use the Unicode sentence-break table (`unicode-segmentation`) to
    /// restrict a scope to the nth sentence (spec.md §4.F). Falls back to
    /// the `[^.!?]+[.!?]+|[^.!?]+$` regex when `false`, or when the Unicode
    /// segmenter finds no boundary at all.
    pub use_unicode_sentence_segmenter: bool,

    /// Upper bound on how many joined lines the instruction driver will
    /// scan from a paragraph stream (component I) before giving up on a
    /// candidate start line.
    pub max_instruction_lines: usize,

    /// Whether a "respectively" redesignation list is applied strictly in
    /// declared order (true) or resolved independently per mapping.
    pub redesignate_respects_declared_order: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            use_unicode_sentence_segmenter: true,
            max_instruction_lines: 40,
            redesignate_respects_declared_order: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let cfg = CoreConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: CoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: CoreConfig = serde_json::from_str(r#"{"max_instruction_lines": 10}"#).unwrap();
        assert_eq!(cfg.max_instruction_lines, 10);
        assert!(cfg.use_unicode_sentence_segmenter);
    }
}
