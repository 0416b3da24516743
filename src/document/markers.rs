//! Hierarchy-marker detection over a document's plain text (spec.md §4.D).
//!
//! Each paragraph span is tested for a leading `(label)` marker; markers are
//! organized into a tree by comparing [`ScopeKind::rank`] against an
//! open-node stack, the same way nested outline levels compare in the
//! source Markdown's indentation.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rope::Span;
use crate::semantic::{ScopeKind, ScopeSegment};

use super::hierarchy::infer_scope_kind;
use super::model::StructuralNode;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([A-Za-z0-9]+)\)").unwrap());

struct OpenNode {
    id: String,
    kind: ScopeKind,
    path: Vec<ScopeSegment>,
}

/// Builds the structural-node tree from paragraph-level plain text spans.
///
/// `paragraph_bounds` are `(plain_start, plain_end)` ranges in declaration
/// order, as produced by the block-event pass in [`super::builder`].
pub fn build_hierarchy(
    plain_text: &str,
    paragraph_bounds: &[(usize, usize)],
) -> (HashMap<String, StructuralNode>, Vec<String>) {
    let mut nodes: HashMap<String, StructuralNode> = HashMap::new();
    let mut root_ids: Vec<String> = Vec::new();
    let mut stack: Vec<OpenNode> = Vec::new();
    let mut id_counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut parent_of: HashMap<String, String> = HashMap::new();

    for &(start, end) in paragraph_bounds {
        let text = &plain_text[start..end];
        let trimmed = text.trim_start();
        let Some(caps) = MARKER_RE.captures(trimmed) else {
            continue;
        };
        let label = caps.get(1).unwrap().as_str().to_string();
        let leading_ws = text.len() - trimmed.len();
        let marker_start = start + leading_ws;

        let depth = stack.len();
        let kind = infer_scope_kind(&label, depth);
        let rank = kind.rank();

        while let Some(top) = stack.last() {
            if top.kind.rank() >= rank {
                stack.pop();
            } else {
                break;
            }
        }

        let parent = stack.last();
        let mut path: Vec<ScopeSegment> = parent.map(|p| p.path.clone()).unwrap_or_default();
        path.push(ScopeSegment {
            kind,
            label: label.clone(),
        });

        let id_prefix = match parent {
            Some(p) => format!("{}/{}:{}", p.id, kind_slug(kind), label.to_ascii_lowercase()),
            None => format!("{}:{}", kind_slug(kind), label.to_ascii_lowercase()),
        };
        let n = id_counts.entry(id_prefix.clone()).or_insert(0);
        *n += 1;
        let id = format!("{id_prefix}#{n}");

        let node = StructuralNode {
            id: id.clone(),
            kind,
            label: label.clone(),
            path: path.clone(),
            span: Span::new(marker_start, end),
            target_level: rank as usize,
            child_ids: Vec::new(),
        };
        nodes.insert(id.clone(), node);

        match parent {
            Some(p) => {
                let parent_id = p.id.clone();
                if let Some(parent_node) = nodes.get_mut(&parent_id) {
                    parent_node.child_ids.push(id.clone());
                }
                parent_of.insert(id.clone(), parent_id);
            }
            None => root_ids.push(id.clone()),
        }

        order.push(id.clone());
        stack.push(OpenNode { id, kind, path });
    }

    // A parent's span must cover every descendant (spec.md §8: `n.start ≤
    // c.start ∧ c.end ≤ n.end`). Paragraphs are discovered parent-before-
    // child, so walking `order` in reverse visits every node's children
    // before the node itself, letting one pass propagate extended ends all
    // the way up the stack.
    for id in order.iter().rev() {
        let Some(parent_id) = parent_of.get(id) else {
            continue;
        };
        let child_end = nodes[id].span.end;
        if let Some(parent_node) = nodes.get_mut(parent_id) {
            if child_end > parent_node.span.end {
                parent_node.span.end = child_end;
            }
        }
    }

    (nodes, root_ids)
}

fn kind_slug(kind: ScopeKind) -> &'static str {
    match kind {
        ScopeKind::Section => "section",
        ScopeKind::Subsection => "subsection",
        ScopeKind::Paragraph => "paragraph",
        ScopeKind::Subparagraph => "subparagraph",
        ScopeKind::Clause => "clause",
        ScopeKind::Subclause => "subclause",
        ScopeKind::Item => "item",
        ScopeKind::Subitem => "subitem",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_subsection_under_no_parent() {
        let text = "(a) Alpha.\n\n(b) Beta.";
        let bounds = vec![(0usize, 10usize), (12usize, 22usize)];
        let (nodes, roots) = build_hierarchy(text, &bounds);
        assert_eq!(roots.len(), 2);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.values().all(|n| n.kind == ScopeKind::Subsection));
    }

    #[test]
    fn nests_paragraph_under_subsection() {
        let text = "(a) Alpha.\n\n(1) One.\n\n(2) Two.\n\n(b) Beta.";
        let bounds = vec![(0, 10), (12, 20), (22, 30), (32, 41)];
        let (nodes, roots) = build_hierarchy(text, &bounds);
        assert_eq!(roots.len(), 2);
        let a = nodes.values().find(|n| n.label == "a").unwrap();
        assert_eq!(a.child_ids.len(), 2);
        let one = nodes.values().find(|n| n.label == "1").unwrap();
        assert_eq!(one.kind, ScopeKind::Paragraph);
        assert!(one.id.starts_with(&a.id));

        for child_id in &a.child_ids {
            let child = &nodes[child_id];
            assert!(a.span.start <= child.span.start && child.span.end <= a.span.end);
        }
        assert_eq!(a.span.end, nodes.values().find(|n| n.label == "2").unwrap().span.end);
    }

    #[test]
    fn duplicate_labels_under_same_parent_get_unique_ids() {
        let text = "(a) Alpha.\n\n(1) One.\n\n(b) Beta.\n\n(1) One again.";
        let bounds = vec![(0, 10), (12, 20), (22, 32), (34, 48)];
        let (nodes, _roots) = build_hierarchy(text, &bounds);
        let ones: Vec<_> = nodes.values().filter(|n| n.label == "1").collect();
        assert_eq!(ones.len(), 2);
        assert_ne!(ones[0].id, ones[1].id);
    }
}
