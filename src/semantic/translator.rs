//! Component C: rule-directed translation of a [`CstNode`] into an
//! [`InstructionSemanticTree`] (spec.md §4.C).
//!
//! Each function here is named after, and walks, exactly one grammar rule
//! from `grammar/assets/default.bnf`. Literal keyword text decides which
//! alternative of a choice rule was taken, since the reconstructed tree
//! doesn't tag which alternative a `Choice` resolved to.

use crate::cst::CstNode;

use super::tree::{
    EditTarget, InstructionSemanticTree, LocationRestrictionKind, Punctuation, RedesignateMapping,
    Scope, ScopeKind, ScopeSegment, SemanticNode, StructuralReference, UltimateEdit,
};
use super::scope_infer::infer_scope_kind;

struct Ctx<'a> {
    source: &'a str,
    issues: Vec<String>,
}

/// Translates a reconstructed `instruction` CST into the semantic tree
/// component H's facade flattens into operations.
pub fn translate(ast: &CstNode, source: &str) -> InstructionSemanticTree {
    let mut ctx = Ctx {
        source,
        issues: Vec::new(),
    };
    let tree = translate_instruction(&mut ctx, ast).unwrap_or_else(|| SemanticNode::InstructionRoot {
        target_section: None,
        target_scope_path: None,
        children: Vec::new(),
    });
    InstructionSemanticTree {
        tree,
        issues: ctx.issues,
    }
}

fn translate_instruction(ctx: &mut Ctx, node: &CstNode) -> Option<SemanticNode> {
    if node.rule_name() != Some("instruction") {
        ctx.issues.push("root node is not an instruction rule".into());
        return None;
    }
    let target_clause = child_rule(node, "target_clause")?;
    let amendment_body = child_rule(node, "amendment_body")?;

    let section_ref = child_rule(target_clause, "section_ref")?;
    let (target_section, path_segments) = translate_section_ref(ctx, section_ref)?;

    let amendment_tail = child_rule(amendment_body, "amendment_tail")?;
    let children = translate_amendment_tail(ctx, amendment_tail);

    Some(SemanticNode::InstructionRoot {
        target_section,
        target_scope_path: Some(StructuralReference {
            path: path_segments,
        }),
        children,
    })
}

fn translate_section_ref(
    ctx: &mut Ctx,
    node: &CstNode,
) -> Option<(Option<String>, Vec<ScopeSegment>)> {
    let keyword_text = node.children().first()?.text(ctx.source);
    let base_kind = ScopeKind::from_keyword(keyword_text.trim());
    let scope_path = child_rule(node, "scope_path")?;
    let segments = build_scope_path(ctx, scope_path, base_kind);
    let target_section = match base_kind {
        Some(ScopeKind::Section) => segments.first().map(|s| s.label.clone()),
        _ => None,
    };
    Some((target_section, segments))
}

fn build_scope_path(ctx: &mut Ctx, node: &CstNode, base_kind: Option<ScopeKind>) -> Vec<ScopeSegment> {
    let mut out = Vec::new();
    let mut segments = Vec::new();
    node.find_all_rules("scope_segment", &mut segments);
    for (i, seg) in segments.into_iter().enumerate() {
        let Some(label_node) = child_rule(seg, "label") else {
            ctx.issues.push("scope_segment missing label".into());
            continue;
        };
        let label = label_node.text(ctx.source).to_string();
        let kind = if i == 0 {
            base_kind.unwrap_or_else(|| infer_scope_kind(&label, i))
        } else {
            infer_scope_kind(&label, i)
        };
        out.push(ScopeSegment { kind, label });
    }
    out
}

fn translate_amendment_tail(ctx: &mut Ctx, node: &CstNode) -> Vec<SemanticNode> {
    if let Some(subscope) = child_rule(node, "subscope") {
        return translate_subscope(ctx, subscope);
    }

    let mut restrictions: Vec<LocationRestrictionKind> = Vec::new();
    let mut edit_nodes: Vec<SemanticNode> = Vec::new();

    for child in node.children() {
        match child.rule_name() {
            Some("location_restriction") => {
                if let Some(restriction) = translate_location_restriction(ctx, child) {
                    restrictions.push(restriction);
                }
            }
            Some("edit_list") => {
                edit_nodes = translate_edit_list(ctx, child);
            }
            _ => {}
        }
    }

    let mut acc = edit_nodes;
    for restriction in restrictions.into_iter().rev() {
        acc = vec![SemanticNode::LocationRestriction {
            restriction,
            children: acc,
        }];
    }
    acc
}

/// A `within <scope> -- <tail>` production (SPEC_FULL.md §4.C "scope
/// stacking"): wraps the nested tail's nodes in a `Scope` per path segment,
/// innermost first. A `section_ref` alternative whose keyword is "Section"
/// resets the enclosing path on flatten (the segment's kind is
/// `ScopeKind::Section`); any other keyword, or a bare `scope_path`,
/// concatenates onto it instead.
fn translate_subscope(ctx: &mut Ctx, node: &CstNode) -> Vec<SemanticNode> {
    let Some(nested_tail) = child_rule(node, "amendment_tail") else {
        ctx.issues.push("subscope missing nested amendment_tail".into());
        return Vec::new();
    };
    let children = translate_amendment_tail(ctx, nested_tail);

    let segments = if let Some(section_ref) = child_rule(node, "section_ref") {
        match translate_section_ref(ctx, section_ref) {
            Some((_, segments)) => segments,
            None => return children,
        }
    } else if let Some(scope_path) = child_rule(node, "scope_path") {
        build_scope_path(ctx, scope_path, None)
    } else {
        ctx.issues.push("subscope missing section_ref or scope_path".into());
        return children;
    };

    segments.into_iter().rev().fold(children, |acc, segment| {
        vec![SemanticNode::Scope {
            scope: Scope {
                kind: segment.kind,
                label: segment.label,
            },
            children: acc,
        }]
    })
}

fn translate_location_restriction(ctx: &mut Ctx, node: &CstNode) -> Option<LocationRestrictionKind> {
    let text = node.text(ctx.source);
    if text.contains("the first sentence") {
        return Some(LocationRestrictionKind::SentenceOrdinal { ordinal: 1 });
    }
    if text.contains("the last sentence") {
        return Some(LocationRestrictionKind::SentenceLast);
    }
    let scope_path = child_rule(node, "scope_path");
    if text.contains("the matter preceding") {
        let reference = StructuralReference {
            path: scope_path.map(|n| build_scope_path(ctx, n, None)).unwrap_or_default(),
        };
        return Some(LocationRestrictionKind::MatterPreceding { reference });
    }
    if text.contains("the matter following") {
        let reference = StructuralReference {
            path: scope_path.map(|n| build_scope_path(ctx, n, None)).unwrap_or_default(),
        };
        return Some(LocationRestrictionKind::MatterFollowing { reference });
    }
    let scope_path = scope_path?;
    let reference = StructuralReference {
        path: build_scope_path(ctx, scope_path, None),
    };
    Some(LocationRestrictionKind::In {
        refs: vec![reference],
        anchor: None,
    })
}

fn translate_edit_list(ctx: &mut Ctx, node: &CstNode) -> Vec<SemanticNode> {
    node.children()
        .iter()
        .filter(|c| c.rule_name() == Some("edit"))
        .filter_map(|edit| translate_edit(ctx, edit))
        .collect()
}

fn translate_edit(ctx: &mut Ctx, node: &CstNode) -> Option<SemanticNode> {
    let alt = node.children().first()?;
    let each_place = alt.text(ctx.source).to_ascii_lowercase().contains("each place it appears");
    let quoted = quoted_texts(ctx, alt);

    let edit = match alt.rule_name()? {
        "strike_insert_edit" | "rewrite_edit" => {
            let strike = quoted.first()?.clone();
            let insert = quoted.get(1)?.clone();
            UltimateEdit::StrikeInsert {
                strike: EditTarget::Text {
                    text: strike,
                    each_place_it_appears: each_place,
                },
                insert,
            }
        }
        "strike_edit" => {
            let text = quoted.first()?.clone();
            UltimateEdit::Strike {
                target: EditTarget::Text {
                    text,
                    each_place_it_appears: each_place,
                },
                through: None,
            }
        }
        "insert_edit" => {
            let alt_text = alt.text(ctx.source);
            if alt_text.contains("after") && quoted.len() >= 2 {
                UltimateEdit::Insert {
                    content: quoted[0].clone(),
                    before: None,
                    after: Some(EditTarget::Text {
                        text: quoted[1].clone(),
                        each_place_it_appears: false,
                    }),
                    at_end_of: None,
                }
            } else if alt_text.contains("before") && quoted.len() >= 2 {
                UltimateEdit::Insert {
                    content: quoted[0].clone(),
                    before: Some(EditTarget::Text {
                        text: quoted[1].clone(),
                        each_place_it_appears: false,
                    }),
                    after: None,
                    at_end_of: None,
                }
            } else {
                UltimateEdit::Insert {
                    content: quoted.first()?.clone(),
                    before: None,
                    after: None,
                    at_end_of: None,
                }
            }
        }
        "redesignate_edit" => {
            let mut paths = Vec::new();
            alt.find_all_rules("scope_path", &mut paths);
            if paths.len() < 2 {
                ctx.issues.push("redesignate edit missing from/to scope paths".into());
                return None;
            }
            let from = StructuralReference {
                path: build_scope_path(ctx, paths[0], None),
            };
            let to = StructuralReference {
                path: build_scope_path(ctx, paths[1], None),
            };
            let respectively = alt.text(ctx.source).to_ascii_lowercase().contains("respectively");
            UltimateEdit::Redesignate {
                mappings: vec![RedesignateMapping { from, to }],
                respectively,
            }
        }
        other => {
            ctx.issues.push(format!("unrecognized edit alternative: {other}"));
            return None;
        }
    };

    Some(SemanticNode::Edit { edit })
}

fn quoted_texts(ctx: &Ctx, node: &CstNode) -> Vec<String> {
    let mut bodies = Vec::new();
    node.find_all_rules("quoted_body", &mut bodies);
    bodies.into_iter().map(|n| n.text(ctx.source).to_string()).collect()
}

fn child_rule<'a>(node: &'a CstNode, name: &str) -> Option<&'a CstNode> {
    node.children().iter().find(|c| c.rule_name() == Some(name))
}

/// Unused by the default grammar (no production yields `Punctuation` edit
/// targets yet) but kept so the match in [`crate::plan`] stays exhaustive
/// against a host-supplied grammar that does.
#[allow(dead_code)]
fn punctuation_from_text(text: &str) -> Option<Punctuation> {
    match text.trim() {
        "." => Some(Punctuation::Period),
        "," => Some(Punctuation::Comma),
        ";" => Some(Punctuation::Semicolon),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_instruction_from_lines;
    use crate::grammar;

    fn translate_line(line: &str) -> InstructionSemanticTree {
        let table = grammar::load_default().unwrap();
        let lines = vec![line.to_string()];
        let parsed = parse_instruction_from_lines(&table, &lines, 0, None).expect("parses");
        translate(&parsed.ast, &parsed.matched_text)
    }

    #[test]
    fn strike_and_insert_becomes_strike_insert_edit() {
        let tree = translate_line("Section 2 is amended by striking 'old text' and inserting 'new text'.");
        let SemanticNode::InstructionRoot { children, target_scope_path, .. } = &tree.tree else {
            panic!("expected instruction root");
        };
        assert_eq!(target_scope_path.as_ref().unwrap().path[0].label, "2");
        let SemanticNode::Edit { edit } = &children[0] else {
            panic!("expected edit node, got {:?}", children[0]);
        };
        match edit {
            UltimateEdit::StrikeInsert { strike, insert } => {
                assert_eq!(insert, "new text");
                match strike {
                    EditTarget::Text { text, .. } => assert_eq!(text, "old text"),
                    _ => panic!("expected text target"),
                }
            }
            other => panic!("expected strike_insert, got {other:?}"),
        }
    }

    #[test]
    fn location_restriction_wraps_edits() {
        let tree = translate_line(
            "Subsection (a) is amended in the matter preceding (1) by striking 'foo' and inserting 'bar'.",
        );
        let SemanticNode::InstructionRoot { children, .. } = &tree.tree else {
            panic!("expected instruction root");
        };
        match &children[0] {
            SemanticNode::LocationRestriction { restriction, children } => {
                assert!(matches!(restriction, LocationRestrictionKind::MatterPreceding { .. }));
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected location restriction, got {other:?}"),
        }
    }

    #[test]
    fn subscope_wraps_nested_edit_in_scope_node() {
        let tree = translate_line(
            "Section 2 is amended within Subsection (a)--by striking 'old' and inserting 'new'.",
        );
        let SemanticNode::InstructionRoot { children, .. } = &tree.tree else {
            panic!("expected instruction root");
        };
        let SemanticNode::Scope { scope, children } = &children[0] else {
            panic!("expected scope node, got {:?}", children[0]);
        };
        assert_eq!(scope.kind, ScopeKind::Subsection);
        assert_eq!(scope.label, "a");
        assert!(matches!(children[0], SemanticNode::Edit { .. }));
    }

    #[test]
    fn subscope_with_section_ref_carries_section_kind_for_reset() {
        let tree = translate_line(
            "Section 2 is amended within Section 5--by striking 'old' and inserting 'new'.",
        );
        let SemanticNode::InstructionRoot { children, .. } = &tree.tree else {
            panic!("expected instruction root");
        };
        let SemanticNode::Scope { scope, .. } = &children[0] else {
            panic!("expected scope node, got {:?}", children[0]);
        };
        assert_eq!(scope.kind, ScopeKind::Section);
        assert_eq!(scope.label, "5");
    }

    #[test]
    fn redesignate_edit_captures_from_and_to() {
        let tree = translate_line("Section 5 is amended by redesignating (c) as (d).");
        let SemanticNode::InstructionRoot { children, .. } = &tree.tree else {
            panic!("expected instruction root");
        };
        let SemanticNode::Edit { edit } = &children[0] else {
            panic!("expected edit node");
        };
        match edit {
            UltimateEdit::Redesignate { mappings, .. } => {
                assert_eq!(mappings[0].from.path[0].label, "c");
                assert_eq!(mappings[0].to.path[0].label, "d");
            }
            other => panic!("expected redesignate, got {other:?}"),
        }
    }
}
