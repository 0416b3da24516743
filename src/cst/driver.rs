//! CST parser public contract + the instruction driver (spec.md §4.B).

use crate::grammar::RuleTable;

use super::matcher::Matcher;
use super::reconstruct::Reconstructor;
use super::tree::CstNode;

/// Rule nodes the driver strips from the tree handed to downstream
/// consumers (spec.md §4.B).
const STRIPPED_RULE_NAMES: &[&str] = &["sep", "preceding"];

/// `parsePrefix(input, startRule) → sorted list of end positions`.
pub fn parse_prefix(table: &RuleTable, input: &str, start_rule: &str) -> Vec<usize> {
    let mut matcher = Matcher::new(table, input);
    matcher.match_rule(start_rule, 0).into_iter().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInstruction {
    pub start_line_index: usize,
    pub end_line_index: usize,
    pub end_column: usize,
    pub matched_text: String,
    pub parse_offset: usize,
    pub ast: CstNode,
    /// Paragraph-level provenance for the matched range, via the caller's
    /// `resolveRange` callback (identity `(start, end)` if none was given).
    pub resolved_range: (usize, usize),
}

/// Markers that anchor an instruction start inside the first line of a
/// candidate window (spec.md §4.B).
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

struct Candidate {
    parse_offset: usize,
    end: usize,
}

/// `parseInstructionFromLines(lines, startLineIndex, resolveRange?) →
/// ParsedInstruction | null`.
///
/// `resolve_range` translates matched byte ranges (within the joined
/// buffer) back into paragraph-level provenance; identity if `None`.
pub fn parse_instruction_from_lines(
    table: &RuleTable,
    lines: &[String],
    start_line_index: usize,
    resolve_range: Option<&dyn Fn(usize, usize) -> (usize, usize)>,
) -> Option<ParsedInstruction> {
    if start_line_index >= lines.len() {
        return None;
    }
    let source = lines[start_line_index..].join("\n");

    let mut candidates: Vec<Candidate> = parse_prefix(table, &source, "instruction")
        .into_iter()
        .map(|end| Candidate {
            parse_offset: 0,
            end,
        })
        .collect();

    if let Some(first_line) = lines.get(start_line_index) {
        for marker in ANCHOR_MARKERS {
            let mut search_from = 0usize;
            while let Some(rel) = first_line[search_from..].find(marker) {
                let anchor = search_from + rel;
                if anchor < source.len() {
                    for end in parse_prefix(table, &source[anchor..], "instruction") {
                        candidates.push(Candidate {
                            parse_offset: anchor,
                            end: anchor + end,
                        });
                    }
                }
                search_from = anchor + marker.len();
            }
        }
    }

    // Largest end wins; ties broken by smallest parse_offset.
    let best = candidates
        .into_iter()
        .max_by(|a, b| a.end.cmp(&b.end).then(b.parse_offset.cmp(&a.parse_offset)))?;

    if best.end <= best.parse_offset {
        return None;
    }

    let window = &source[best.parse_offset..best.end];
    let mut matcher = Matcher::new(table, window);
    let mut rec = Reconstructor::new(table, &mut matcher);
    let raw_ast = rec.build_rule("instruction", 0, window.len())?;
    let ast = strip_aux_rules(raw_ast);

    let matched_text = window.to_string();
    let (end_line_index, end_column) = line_and_column_of(&source, best.end);
    let resolved_range = resolve_range.map_or((best.parse_offset, best.end), |f| {
        f(best.parse_offset, best.end)
    });

    Some(ParsedInstruction {
        start_line_index,
        end_line_index: start_line_index + end_line_index,
        end_column,
        matched_text,
        parse_offset: best.parse_offset,
        ast,
        resolved_range,
    })
}

fn line_and_column_of(source: &str, byte_offset: usize) -> (usize, usize) {
    let prefix = &source[..byte_offset.min(source.len())];
    let mut newlines = 0usize;
    let mut last_newline = None;
    for (i, c) in prefix.char_indices() {
        if c == '\n' {
            newlines += 1;
            last_newline = Some(i);
        }
    }
    let column = match last_newline {
        Some(i) => byte_offset - (i + 1),
        None => byte_offset,
    };
    (newlines, column)
}

/// Strips `sep`/`preceding` rule nodes from the tree, recursively.
fn strip_aux_rules(node: CstNode) -> CstNode {
    match node {
        CstNode::Token { .. } => node,
        CstNode::Rule {
            name,
            span,
            children,
        } => {
            let children = children
                .into_iter()
                .filter(|c| !matches!(c.rule_name(), Some(n) if STRIPPED_RULE_NAMES.contains(&n)))
                .map(strip_aux_rules)
                .collect();
            CstNode::Rule {
                name,
                span,
                children,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    #[test]
    fn finds_instruction_at_anchor() {
        let table = grammar::load_default().unwrap();
        let lines = vec![
            "Section (a) is amended by striking 'old' and inserting 'new'.".to_string(),
        ];
        let parsed = parse_instruction_from_lines(&table, &lines, 0, None);
        assert!(parsed.is_some());
        let parsed = parsed.unwrap();
        assert!(parsed.matched_text.starts_with("Section"));
    }

    #[test]
    fn returns_none_for_non_instruction_text() {
        let table = grammar::load_default().unwrap();
        let lines = vec!["This paragraph is not an amendatory instruction at all.".to_string()];
        let parsed = parse_instruction_from_lines(&table, &lines, 0, None);
        assert!(parsed.is_none());
    }
}
