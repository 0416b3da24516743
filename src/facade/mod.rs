//! Component H: edit-tree apply facade (spec.md §4.H).
//!
//! Flattens a translated [`InstructionSemanticTree`] into [`plan::Operation`]
//! records, then drives resolve → plan → apply and assembles the public
//! [`AmendmentEffect`].

mod flatten;

use crate::apply::{self, Replacement};
use crate::config::CoreConfig;
use crate::cst::parse_instruction_from_lines;
use crate::document::{self, DocumentModel};
use crate::error::ApplyFailureKind;
use crate::grammar::RuleTable;
use crate::plan::{self, OperationAttempt};
use crate::semantic::{self, InstructionSemanticTree};

pub use flatten::flatten_operations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub operation_index: usize,
    pub kind: ApplyFailureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplySummary {
    pub partially_applied: bool,
    pub failed_items: Vec<FailedItem>,
}

#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub operation_attempts: Vec<OperationAttempt>,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AmendmentEffect {
    pub status: Status,
    pub section_path: Option<String>,
    pub post_text: String,
    pub changes: usize,
    pub deleted: Vec<String>,
    pub inserted: Vec<String>,
    pub replacements: Vec<Replacement>,
    pub apply_summary: ApplySummary,
    pub debug: DebugInfo,
}

/// Parses `instruction_text` against `grammar`, translates it, and applies
/// the resulting edit tree to `section_markdown`.
pub fn apply_amendment_instruction_to_section(
    config: &CoreConfig,
    grammar: &RuleTable,
    instruction_text: &str,
    section_markdown: &str,
    section_path: Option<String>,
) -> AmendmentEffect {
    let lines: Vec<String> = instruction_text.lines().map(str::to_string).collect();
    let lines = if lines.is_empty() {
        vec![instruction_text.to_string()]
    } else {
        lines
    };

    let Some(parsed) = parse_instruction_from_lines(grammar, &lines, 0, None) else {
        let model = document::build(section_markdown);
        return unsupported_effect(model, section_path, "instruction_unparsed".to_string());
    };

    let tree: InstructionSemanticTree = semantic::translate(&parsed.ast, &parsed.matched_text);
    let operations = flatten_operations(&tree.tree, &parsed.matched_text);

    if operations.is_empty() {
        let model = document::build(section_markdown);
        let reason = tree
            .issues
            .first()
            .cloned()
            .unwrap_or_else(|| "no_operations_produced".to_string());
        return unsupported_effect(model, section_path, reason);
    }

    apply_operations(config, operations, section_markdown, section_path)
}

fn apply_operations(
    config: &CoreConfig,
    operations: Vec<plan::Operation>,
    section_markdown: &str,
    section_path: Option<String>,
) -> AmendmentEffect {
    let model = document::build(section_markdown);

    let mut tentative_patches = Vec::new();
    let mut attempts = Vec::new();
    let mut failed_items = Vec::new();

    for op in &operations {
        let (patches, attempt, failure) = plan::plan_operation(config, &model, op);
        if let Some(kind) = failure {
            failed_items.push(FailedItem {
                operation_index: op.index,
                kind,
            });
        }
        tentative_patches.extend(patches);
        attempts.push(attempt);
    }

    let accepted = plan::resolve_overlaps(tentative_patches);
    let (post_text, replacements) = apply::apply_patches(&model.plain_text, &accepted);

    let deleted: Vec<String> = accepted.iter().map(|p| p.deleted.clone()).collect();
    let inserted: Vec<String> = accepted.iter().map(|p| p.inserted.clone()).collect();

    let status = if accepted.is_empty() { Status::Unsupported } else { Status::Ok };
    let partially_applied = status == Status::Ok && !failed_items.is_empty();

    let failure_reason = match status {
        Status::Unsupported => Some(
            failed_items
                .first()
                .map(|f| f.kind.to_string())
                .unwrap_or_else(|| "no_patches_applied".to_string()),
        ),
        Status::Ok => None,
    };

    AmendmentEffect {
        status,
        section_path,
        post_text,
        changes: accepted.len(),
        deleted,
        inserted,
        replacements,
        apply_summary: ApplySummary {
            partially_applied,
            failed_items,
        },
        debug: DebugInfo {
            operation_attempts: attempts,
            failure_reason,
        },
    }
}

fn unsupported_effect(model: DocumentModel, section_path: Option<String>, reason: String) -> AmendmentEffect {
    AmendmentEffect {
        status: Status::Unsupported,
        section_path,
        post_text: model.plain_text,
        changes: 0,
        deleted: Vec::new(),
        inserted: Vec::new(),
        replacements: Vec::new(),
        apply_summary: ApplySummary::default(),
        debug: DebugInfo {
            operation_attempts: Vec::new(),
            failure_reason: Some(reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn run(instruction: &str, section: &str) -> AmendmentEffect {
        let table = grammar::load_default().unwrap();
        let config = CoreConfig::default();
        apply_amendment_instruction_to_section(&config, &table, instruction, section, None)
    }

    #[test]
    fn strike_insert_literal_scenario() {
        let effect = run(
            "Section 2 is amended by striking 'old' and inserting 'new'.",
            "This is old text.",
        );
        assert_eq!(effect.status, Status::Ok);
        assert_eq!(effect.post_text, "This is new text.");
        assert_eq!(effect.deleted, vec!["old".to_string()]);
        assert_eq!(effect.inserted, vec!["new".to_string()]);
    }

    #[test]
    fn strike_literal_scenario() {
        let effect = run(
            "Section 2 is amended by striking 'old'.",
            "This is old text.",
        );
        assert_eq!(effect.status, Status::Ok);
        assert_eq!(effect.post_text, "This is  text.");
    }

    #[test]
    fn each_place_scenario_produces_two_replacements() {
        let effect = run(
            "Section 2 is amended by striking '2023' each place it appears and inserting '2031'.",
            "For 2023 and 2023 only.",
        );
        assert_eq!(effect.status, Status::Ok);
        assert_eq!(effect.post_text, "For 2031 and 2031 only.");
        assert_eq!(effect.replacements.len(), 2);
    }

    #[test]
    fn redesignate_scenario() {
        let effect = run(
            "Section 2 is amended by redesignating (a) as (b).",
            "(a) Original text.",
        );
        assert_eq!(effect.status, Status::Ok);
        assert_eq!(effect.post_text, "(b) Original text.");
    }

    #[test]
    fn unparsed_instruction_yields_unsupported_status() {
        let effect = run("Not an amendatory instruction at all.", "Some section text.");
        assert_eq!(effect.status, Status::Unsupported);
        assert_eq!(effect.debug.failure_reason.as_deref(), Some("instruction_unparsed"));
    }
}
