//! Flattening step of component H (spec.md §4.H item 1).

use crate::plan::{InsertMode, Operation};
use crate::semantic::{LocationRestrictionKind, ScopeKind, ScopeSegment, SemanticNode};

#[derive(Debug, Clone, Default)]
struct Ctx {
    target_path: Vec<ScopeSegment>,
    matter_preceding: Option<Vec<ScopeSegment>>,
    matter_following: Option<Vec<ScopeSegment>>,
    sentence_ordinal: Option<i64>,
}

/// Flattens a translated semantic tree into a list of operations, in
/// left-to-right tree order, assigning each a stable `index`.
pub fn flatten_operations(root: &SemanticNode, instruction_text: &str) -> Vec<Operation> {
    let mut out = Vec::new();
    walk(root, Ctx::default(), instruction_text, &mut out);
    out
}

fn walk(node: &SemanticNode, ctx: Ctx, instruction_text: &str, out: &mut Vec<Operation>) {
    match node {
        SemanticNode::InstructionRoot {
            target_scope_path,
            children,
            ..
        } => {
            let mut next = ctx;
            if let Some(reference) = target_scope_path {
                next.target_path = reference.path.clone();
            }
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        SemanticNode::Scope { scope, children } => {
            let mut next = ctx;
            if scope.kind == ScopeKind::Section {
                next.target_path = vec![ScopeSegment {
                    kind: scope.kind,
                    label: scope.label.clone(),
                }];
            } else {
                next.target_path.push(ScopeSegment {
                    kind: scope.kind,
                    label: scope.label.clone(),
                });
            }
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        SemanticNode::LocationRestriction {
            restriction,
            children,
        } => walk_restriction(restriction, children, ctx, instruction_text, out),
        SemanticNode::Edit { edit } => {
            let has_explicit_target_path = !ctx.target_path.is_empty();
            out.push(Operation {
                index: out.len(),
                edit: edit.clone(),
                target_path: has_explicit_target_path.then(|| ctx.target_path.clone()),
                has_explicit_target_path,
                matter_preceding_path: ctx.matter_preceding.clone(),
                matter_following_path: ctx.matter_following.clone(),
                sentence_ordinal: ctx.sentence_ordinal,
                unanchored_insert_mode: infer_insert_mode(edit, instruction_text),
            });
        }
    }
}

fn walk_restriction(
    restriction: &LocationRestrictionKind,
    children: &[SemanticNode],
    ctx: Ctx,
    instruction_text: &str,
    out: &mut Vec<Operation>,
) {
    match restriction {
        LocationRestrictionKind::SentenceOrdinal { ordinal } => {
            let mut next = ctx;
            next.sentence_ordinal = Some(*ordinal);
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        LocationRestrictionKind::SentenceLast => {
            let mut next = ctx;
            next.sentence_ordinal = Some(0);
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        LocationRestrictionKind::MatterPreceding { reference } => {
            let mut next = ctx;
            next.matter_preceding = Some(reference.path.clone());
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        LocationRestrictionKind::MatterFollowing { reference } => {
            let mut next = ctx;
            next.matter_following = Some(reference.path.clone());
            for child in children {
                walk(child, next.clone(), instruction_text, out);
            }
        }
        LocationRestrictionKind::In { refs, .. } => {
            // "In subparagraph (A) and (B)" expands into one operation per
            // ref: each ref narrows the target within the current section
            // prefix (the leading `section:X` segment, if any).
            let section_prefix: Vec<ScopeSegment> = ctx
                .target_path
                .first()
                .filter(|s| s.kind == ScopeKind::Section)
                .cloned()
                .into_iter()
                .collect();
            for reference in refs {
                let mut next = ctx.clone();
                let mut path = section_prefix.clone();
                path.extend(reference.path.clone());
                next.target_path = path;
                for child in children {
                    walk(child, next.clone(), instruction_text, out);
                }
            }
        }
        LocationRestrictionKind::AtEnd { .. }
        | LocationRestrictionKind::Before { .. }
        | LocationRestrictionKind::After { .. } => {
            // Not produced by the default grammar (these model a restriction
            // wrapping an edit target rather than a scope); pass through
            // unchanged so a host-supplied grammar using them still gets a
            // sane, if unrestricted, flattening.
            for child in children {
                walk(child, ctx.clone(), instruction_text, out);
            }
        }
    }
}

fn infer_insert_mode(edit: &crate::semantic::UltimateEdit, instruction_text: &str) -> InsertMode {
    use crate::semantic::UltimateEdit;
    match edit {
        UltimateEdit::Insert {
            before: None,
            after: None,
            ..
        } => {
            if instruction_text.to_ascii_lowercase().contains("adding at the end") {
                InsertMode::AddAtEnd
            } else {
                InsertMode::Insert
            }
        }
        _ => InsertMode::Insert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{EditTarget, StructuralReference, UltimateEdit};

    fn edit_node(text: &str) -> SemanticNode {
        SemanticNode::Edit {
            edit: UltimateEdit::Strike {
                target: EditTarget::Text {
                    text: text.to_string(),
                    each_place_it_appears: false,
                },
                through: None,
            },
        }
    }

    #[test]
    fn flattens_single_edit_with_target_path() {
        let tree = SemanticNode::InstructionRoot {
            target_section: Some("2".to_string()),
            target_scope_path: Some(StructuralReference {
                path: vec![ScopeSegment {
                    kind: ScopeKind::Section,
                    label: "2".to_string(),
                }],
            }),
            children: vec![edit_node("old")],
        };
        let ops = flatten_operations(&tree, "Section 2 is amended by striking 'old'.");
        assert_eq!(ops.len(), 1);
        assert!(ops[0].has_explicit_target_path);
    }

    #[test]
    fn location_restriction_carries_matter_preceding() {
        let tree = SemanticNode::InstructionRoot {
            target_section: None,
            target_scope_path: None,
            children: vec![SemanticNode::LocationRestriction {
                restriction: LocationRestrictionKind::MatterPreceding {
                    reference: StructuralReference {
                        path: vec![ScopeSegment {
                            kind: ScopeKind::Paragraph,
                            label: "1".to_string(),
                        }],
                    },
                },
                children: vec![edit_node("old")],
            }],
        };
        let ops = flatten_operations(&tree, "instruction text");
        assert_eq!(ops.len(), 1);
        assert!(ops[0].matter_preceding_path.is_some());
    }
}
