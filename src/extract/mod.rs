//! Component I: instruction extraction over a paragraph stream
//! (spec.md §2, §5; supplemented in SPEC_FULL.md §4.I).

pub mod citation;

use crate::config::CoreConfig;
use crate::cst::{parse_instruction_from_lines, ParsedInstruction};
use crate::grammar::RuleTable;

const ANCHOR_MARKERS: &[&str] = &[
    "Section ",
    "Subsection ",
    "Paragraph ",
    "Subparagraph ",
    "Clause ",
    "Subclause ",
    "Item ",
    "Subitem ",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedInstruction {
    pub paragraph_index: usize,
    pub parsed: ParsedInstruction,
}

/// Walks `paragraphs`, attempting the instruction driver at every
/// paragraph that contains an anchor marker, bounded by
/// `config.max_instruction_lines`. Paragraphs consumed by a match are
/// skipped on the next outer iteration.
pub fn find_instructions(
    table: &RuleTable,
    paragraphs: &[String],
    config: &CoreConfig,
) -> Vec<ExtractedInstruction> {
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < paragraphs.len() {
        let has_anchor = ANCHOR_MARKERS.iter().any(|marker| paragraphs[i].contains(marker));
        if !has_anchor {
            i += 1;
            continue;
        }

        let window_end = (i + config.max_instruction_lines).min(paragraphs.len());
        let window = &paragraphs[i..window_end];

        match parse_instruction_from_lines(table, window, 0, None) {
            Some(parsed) => {
                let consumed = parsed.end_line_index + 1;
                out.push(ExtractedInstruction {
                    paragraph_index: i,
                    parsed,
                });
                i += consumed.max(1);
            }
            None => i += 1,
        }
    }

    out
}
