//! Component E: selector resolver (spec.md §4.E).
//!
//! Walks a hierarchy path segment by segment from the document's root
//! nodes, falling back first to label-only matching and then to a
//! transitive-descendant expansion before declaring a path unresolved or
//! ambiguous. Never mutates the model.

use crate::document::DocumentModel;
use crate::error::ResolutionIssueKind;
use crate::semantic::{ScopeKind, ScopeSegment};

/// `None` means the (possibly empty, after normalization) path designates
/// the document root itself rather than any specific structural node.
pub fn resolve_path(
    model: &DocumentModel,
    path: &[ScopeSegment],
) -> Option<Result<String, ResolutionIssueKind>> {
    let segments = normalize(path);
    if segments.is_empty() {
        return None;
    }

    let mut frontier: Vec<String> = model.root_node_ids.clone();
    let mut at_root = true;

    for seg in segments {
        let pool: Vec<String> = if at_root {
            frontier.clone()
        } else {
            frontier
                .iter()
                .flat_map(|id| model.node(id).map(|n| n.child_ids.clone()).unwrap_or_default())
                .collect()
        };
        at_root = false;

        let exact: Vec<String> = pool
            .iter()
            .filter(|id| matches_exact(model, id, seg))
            .cloned()
            .collect();

        let matched = if !exact.is_empty() {
            exact
        } else {
            let label_only: Vec<String> = pool
                .iter()
                .filter(|id| matches_label(model, id, seg))
                .cloned()
                .collect();
            if !label_only.is_empty() {
                label_only
            } else {
                let mut descendant_pool: Vec<String> = Vec::new();
                for id in &frontier {
                    descendant_pool.extend(model.descendants(id));
                }
                descendant_pool
                    .iter()
                    .filter(|id| matches_label(model, id, seg))
                    .cloned()
                    .collect()
            }
        };

        if matched.is_empty() {
            return Some(Err(ResolutionIssueKind::Unresolved));
        }
        frontier = matched;
    }

    match frontier.len() {
        0 => Some(Err(ResolutionIssueKind::Unresolved)),
        1 => Some(Ok(frontier.into_iter().next().unwrap())),
        _ => Some(Err(ResolutionIssueKind::Ambiguous {
            candidate_node_ids: frontier,
        })),
    }
}

/// Drops a leading `section:X` segment — section selection is the
/// caller's responsibility, not the resolver's.
fn normalize(path: &[ScopeSegment]) -> &[ScopeSegment] {
    match path.first() {
        Some(seg) if seg.kind == ScopeKind::Section => &path[1..],
        _ => path,
    }
}

fn matches_exact(model: &DocumentModel, id: &str, seg: &ScopeSegment) -> bool {
    model
        .node(id)
        .map(|n| n.kind == seg.kind && n.label.eq_ignore_ascii_case(&seg.label))
        .unwrap_or(false)
}

fn matches_label(model: &DocumentModel, id: &str, seg: &ScopeSegment) -> bool {
    model
        .node(id)
        .map(|n| n.label.eq_ignore_ascii_case(&seg.label))
        .unwrap_or(false)
}
