//! Component F: edit planner (spec.md §4.F).
//!
//! Turns one flattened [`Operation`] into zero or more [`PlannedPatch`]
//! records against a [`DocumentModel`]'s plain text, plus a debug
//! [`OperationAttempt`] and an optional [`ApplyFailureKind`] classification
//! for the facade's `applySummary`.

mod formatter;
mod sentence;

use crate::config::CoreConfig;
use crate::document::DocumentModel;
use crate::error::{ApplyFailureKind, ResolutionIssueKind};
use crate::resolve;
use crate::rope::{preview, Span};
use crate::semantic::{EditTarget, ScopeSegment, UltimateEdit};

const PREVIEW_MAX_BYTES: usize = 180;

/// One flattened instruction edit, produced by the facade (component H)
/// before resolution and planning.
#[derive(Debug, Clone)]
pub struct Operation {
    pub index: usize,
    pub edit: UltimateEdit,
    pub target_path: Option<Vec<ScopeSegment>>,
    pub has_explicit_target_path: bool,
    pub matter_preceding_path: Option<Vec<ScopeSegment>>,
    pub matter_following_path: Option<Vec<ScopeSegment>>,
    pub sentence_ordinal: Option<i64>,
    pub unanchored_insert_mode: InsertMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    Insert,
    AddAtEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPatch {
    pub operation_index: usize,
    pub start: usize,
    pub end: usize,
    pub deleted: String,
    pub inserted: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Applied,
    NoPatch,
    ScopeUnresolved,
}

#[derive(Debug, Clone)]
pub struct OperationAttempt {
    pub operation_index: usize,
    pub edit_kind: &'static str,
    pub has_explicit_target_path: bool,
    pub scoped_range: Option<Span>,
    pub preview: String,
    pub search_text: Option<String>,
    pub search_text_index: Option<usize>,
    pub outcome: AttemptOutcome,
}

enum PlanFailure {
    TargetUnresolved,
    TargetAmbiguous,
    ScopeUnresolved,
}

impl From<PlanFailure> for ApplyFailureKind {
    fn from(value: PlanFailure) -> Self {
        match value {
            PlanFailure::TargetUnresolved => ApplyFailureKind::TargetUnresolved,
            PlanFailure::TargetAmbiguous => ApplyFailureKind::TargetAmbiguous,
            PlanFailure::ScopeUnresolved => ApplyFailureKind::ScopeUnresolved,
        }
    }
}

/// Plans one operation. Returns the tentative patches (before overlap
/// resolution), its debug attempt record, and a failure classification if
/// nothing could be planned.
pub fn plan_operation(
    config: &CoreConfig,
    model: &DocumentModel,
    op: &Operation,
) -> (Vec<PlannedPatch>, OperationAttempt, Option<ApplyFailureKind>) {
    let edit_kind = edit_kind_name(&op.edit);

    let range = match derive_scoped_range(config, model, op) {
        Ok(range) => range,
        Err(failure) => {
            let attempt = OperationAttempt {
                operation_index: op.index,
                edit_kind,
                has_explicit_target_path: op.has_explicit_target_path,
                scoped_range: None,
                preview: String::new(),
                search_text: None,
                search_text_index: None,
                outcome: AttemptOutcome::ScopeUnresolved,
            };
            return (Vec::new(), attempt, Some(failure.into()));
        }
    };

    let preview_text = preview(&model.plain_text, range, PREVIEW_MAX_BYTES);

    let (patches, search_text, search_text_index, no_match) =
        plan_for_edit(config, model, range, op);

    let outcome = if !patches.is_empty() {
        AttemptOutcome::Applied
    } else {
        AttemptOutcome::NoPatch
    };

    let failure = if patches.is_empty() && no_match {
        Some(ApplyFailureKind::NoMatch)
    } else {
        None
    };

    let attempt = OperationAttempt {
        operation_index: op.index,
        edit_kind,
        has_explicit_target_path: op.has_explicit_target_path,
        scoped_range: Some(range),
        preview: preview_text,
        search_text,
        search_text_index,
        outcome,
    };

    (patches, attempt, failure)
}

fn derive_scoped_range(
    config: &CoreConfig,
    model: &DocumentModel,
    op: &Operation,
) -> Result<Span, PlanFailure> {
    let mut range = match &op.target_path {
        None => model.root_range(),
        Some(path) => match resolve::resolve_path(model, path) {
            None => model.root_range(),
            Some(Ok(id)) => model
                .node(&id)
                .map(|n| n.span)
                .ok_or(PlanFailure::TargetUnresolved)?,
            Some(Err(ResolutionIssueKind::Unresolved)) => return Err(PlanFailure::TargetUnresolved),
            Some(Err(ResolutionIssueKind::Ambiguous { .. })) => {
                return Err(PlanFailure::TargetAmbiguous)
            }
        },
    };

    if let Some(path) = &op.matter_preceding_path {
        match resolve::resolve_path(model, path) {
            Some(Ok(id)) => {
                if let Some(node) = model.node(&id) {
                    range = Span::new(range.start, range.end.min(node.span.start));
                }
            }
            _ => return Err(PlanFailure::ScopeUnresolved),
        }
    }

    if let Some(path) = &op.matter_following_path {
        match resolve::resolve_path(model, path) {
            Some(Ok(id)) => {
                if let Some(node) = model.node(&id) {
                    range = Span::new(range.start.max(node.span.end), range.end);
                }
            }
            _ => return Err(PlanFailure::ScopeUnresolved),
        }
    }

    if let Some(ordinal) = op.sentence_ordinal {
        range = sentence::restrict_to_sentence(config, &model.plain_text, range, ordinal);
    }

    Ok(range)
}

/// `(patches, search_text, search_text_index, no_match)`. `no_match` is
/// true only when planning legitimately found nothing to do because a
/// needle/anchor was absent — as opposed to producing zero patches for a
/// structurally valid but no-op reason.
fn plan_for_edit(
    config: &CoreConfig,
    model: &DocumentModel,
    range: Span,
    op: &Operation,
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    match &op.edit {
        UltimateEdit::StrikeInsert { strike, insert } => {
            plan_strike_insert(model, range, op.index, strike, insert)
        }
        UltimateEdit::Strike { target, through } => {
            plan_strike(model, range, op.index, target, through.as_ref())
        }
        UltimateEdit::Rewrite { target: _, content } => {
            let level = target_level(model, op);
            let formatted = formatter::format_rewrite(content, level);
            let deleted = model.plain_text[range.start..range.end].to_string();
            let patch = PlannedPatch {
                operation_index: op.index,
                start: range.start,
                end: range.end,
                deleted,
                inserted: formatted,
            };
            (vec![patch], None, None, false)
        }
        UltimateEdit::Insert {
            content,
            before,
            after,
            at_end_of: _,
        } => plan_insert(model, range, op, content, before.as_ref(), after.as_ref()),
        UltimateEdit::Redesignate { mappings, .. } => {
            plan_redesignate(config, model, range, op.index, mappings)
        }
        UltimateEdit::Move { from, before, after } => plan_move(model, op.index, from, before.as_ref(), after.as_ref()),
    }
}

fn target_level(model: &DocumentModel, op: &Operation) -> usize {
    match &op.target_path {
        Some(path) => resolve::resolve_path(model, path)
            .and_then(|r| r.ok())
            .and_then(|id| model.node(&id))
            .map(|n| n.target_level)
            .unwrap_or(0),
        None => 0,
    }
}

fn plan_strike_insert(
    model: &DocumentModel,
    range: Span,
    op_index: usize,
    strike: &EditTarget,
    insert: &str,
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    match strike {
        EditTarget::Text {
            text,
            each_place_it_appears,
        } => {
            let occurrences = find_occurrences(&model.plain_text, range, text);
            if occurrences.is_empty() {
                return (Vec::new(), Some(text.clone()), Some(0), true);
            }
            let selected: &[Span] = if *each_place_it_appears {
                &occurrences
            } else {
                &occurrences[..1]
            };
            let patches = selected
                .iter()
                .map(|span| PlannedPatch {
                    operation_index: op_index,
                    start: span.start,
                    end: span.end,
                    deleted: model.plain_text[span.start..span.end].to_string(),
                    inserted: insert.to_string(),
                })
                .collect();
            (patches, Some(text.clone()), Some(0), false)
        }
        _ => {
            // Pure structural strike-insert: the default grammar never
            // produces this, but the type still models it — replace the
            // whole scoped range.
            let deleted = model.plain_text[range.start..range.end].to_string();
            let patch = PlannedPatch {
                operation_index: op_index,
                start: range.start,
                end: range.end,
                deleted,
                inserted: insert.to_string(),
            };
            (vec![patch], None, None, false)
        }
    }
}

fn plan_strike(
    model: &DocumentModel,
    range: Span,
    op_index: usize,
    target: &EditTarget,
    through: Option<&EditTarget>,
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    let EditTarget::Text {
        text,
        each_place_it_appears,
    } = target
    else {
        let deleted = model.plain_text[range.start..range.end].to_string();
        let patch = PlannedPatch {
            operation_index: op_index,
            start: range.start,
            end: range.end,
            deleted,
            inserted: String::new(),
        };
        return (vec![patch], None, None, false);
    };

    let occurrences = find_occurrences(&model.plain_text, range, text);
    if occurrences.is_empty() {
        return (Vec::new(), Some(text.clone()), Some(0), true);
    }

    let selected: Vec<Span> = if *each_place_it_appears {
        occurrences.clone()
    } else {
        vec![occurrences[0]]
    };

    let patches = selected
        .into_iter()
        .enumerate()
        .map(|(i, span)| {
            let mut del_start = span.start;
            let mut del_end = span.end;
            let mut extended = false;

            if i == 0 {
                if let Some(through_target) = through {
                    if let Some(extended_end) = extend_through(model, range, del_end, through_target) {
                        del_end = extended_end;
                        extended = true;
                    }
                }
            }

            // Space absorption only follows a `through` extension (spec's
            // "after extension" clause) — a plain strike with no through
            // leaves the surrounding spacing untouched.
            if extended {
                let bytes = model.plain_text.as_bytes();
                if del_start > 0
                    && del_end < bytes.len()
                    && bytes[del_start - 1] == b' '
                    && bytes[del_end] == b' '
                {
                    del_start -= 1;
                } else if del_start == 0 && del_end < bytes.len() && bytes[del_end] == b' ' {
                    del_end += 1;
                }
            }

            PlannedPatch {
                operation_index: op_index,
                start: del_start,
                end: del_end,
                deleted: model.plain_text[del_start..del_end].to_string(),
                inserted: String::new(),
            }
        })
        .collect();

    (patches, Some(text.clone()), Some(0), false)
}

fn extend_through(model: &DocumentModel, range: Span, after: usize, through: &EditTarget) -> Option<usize> {
    match through {
        EditTarget::Text { text, .. } => {
            let search_range = Span::new(after, range.end);
            find_occurrences(&model.plain_text, search_range, text)
                .first()
                .map(|s| s.end)
        }
        EditTarget::Punctuation { punctuation } => {
            let ch = match punctuation {
                crate::semantic::Punctuation::Period => '.',
                crate::semantic::Punctuation::Comma => ',',
                crate::semantic::Punctuation::Semicolon => ';',
            };
            model.plain_text[after..range.end]
                .find(ch)
                .map(|rel| after + rel + 1)
        }
        _ => None,
    }
}

fn plan_insert(
    model: &DocumentModel,
    range: Span,
    op: &Operation,
    content: &str,
    before: Option<&EditTarget>,
    after: Option<&EditTarget>,
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    let level = target_level(model, op);

    if let Some(anchor) = before {
        let EditTarget::Text { text, .. } = anchor else {
            return (Vec::new(), None, None, true);
        };
        let Some(span) = find_occurrences(&model.plain_text, range, text).into_iter().next() else {
            return (Vec::new(), Some(text.clone()), Some(0), true);
        };
        let formatted = formatter::format_insertion(content, level);
        let sep = separator(model.plain_text.as_bytes(), span.start, &formatted, true);
        let inserted = if sep { format!("{formatted} ") } else { formatted };
        let patch = PlannedPatch {
            operation_index: op.index,
            start: span.start,
            end: span.start,
            deleted: String::new(),
            inserted,
        };
        return (vec![patch], Some(text.clone()), Some(0), false);
    }

    if let Some(anchor) = after {
        let EditTarget::Text { text, .. } = anchor else {
            return (Vec::new(), None, None, true);
        };
        let Some(span) = find_occurrences(&model.plain_text, range, text).into_iter().next() else {
            return (Vec::new(), Some(text.clone()), Some(0), true);
        };
        let formatted = formatter::format_insertion(content, level);
        let sep = separator(model.plain_text.as_bytes(), span.end, &formatted, false);
        let inserted = if sep { format!(" {formatted}") } else { formatted };
        let patch = PlannedPatch {
            operation_index: op.index,
            start: span.end,
            end: span.end,
            deleted: String::new(),
            inserted,
        };
        return (vec![patch], Some(text.clone()), Some(0), false);
    }

    // Unanchored: insert at the scoped range's end (covers both an
    // explicit `atEndOf` location and the textual "adding at the end"
    // mode — both resolve to the same patch shape).
    let _ = op.unanchored_insert_mode;
    let formatted = formatter::format_insertion(content, level);
    let bytes = model.plain_text.as_bytes();
    let needs_leading_newline = range.end > 0 && bytes.get(range.end - 1) != Some(&b'\n');
    let needs_trailing_break = bytes.get(range.end).map(|b| *b != b'\n').unwrap_or(false);

    let mut inserted = String::new();
    if needs_leading_newline {
        inserted.push('\n');
    }
    inserted.push_str(&formatted);
    if needs_trailing_break {
        inserted.push_str("\n\n");
    }

    let patch = PlannedPatch {
        operation_index: op.index,
        start: range.end,
        end: range.end,
        deleted: String::new(),
        inserted,
    };
    (vec![patch], None, None, false)
}

fn separator(bytes: &[u8], boundary: usize, content: &str, inserting_before_anchor: bool) -> bool {
    let content_last = content.as_bytes().last().copied();
    let content_first = content.as_bytes().first().copied();
    if inserting_before_anchor {
        let anchor_first = bytes.get(boundary).copied();
        is_word_ish(content_last) && anchor_first.map(is_anchor_open).unwrap_or(false)
    } else {
        let anchor_last = boundary.checked_sub(1).and_then(|i| bytes.get(i)).copied();
        anchor_last.map(is_word_ish_byte).unwrap_or(false) && content_first.map(is_anchor_open).unwrap_or(false)
    }
}

fn is_word_ish(b: Option<u8>) -> bool {
    b.map(is_word_ish_byte).unwrap_or(false)
}

fn is_word_ish_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b')'
}

fn is_anchor_open(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'('
}

fn plan_redesignate(
    config: &CoreConfig,
    model: &DocumentModel,
    range: Span,
    op_index: usize,
    mappings: &[crate::semantic::RedesignateMapping],
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    let mut order: Vec<usize> = (0..mappings.len()).collect();
    if !config.redesignate_respects_declared_order {
        // Resolve each mapping independently of declaration order: sort by
        // the claimed marker's document position, breaking ties (two
        // mappings naming the same "from" marker) in favor of the
        // last-declared mapping rather than the first, so the result
        // doesn't silently depend on list order the way the declared-order
        // mode does.
        order.sort_by(|&a, &b| {
            let pos_a = first_marker_position(model, range, &mappings[a]).unwrap_or(usize::MAX);
            let pos_b = first_marker_position(model, range, &mappings[b]).unwrap_or(usize::MAX);
            pos_a.cmp(&pos_b).then(b.cmp(&a))
        });
    }

    let mut patches = Vec::new();
    let mut any_missing = false;
    let mut claimed_starts: Vec<usize> = Vec::new();
    for i in order {
        let mapping = &mappings[i];
        let Some(from_label) = mapping.from.path.last().map(|s| s.label.clone()) else {
            continue;
        };
        let Some(to_label) = mapping.to.path.last().map(|s| s.label.clone()) else {
            continue;
        };
        let marker = format!("({from_label})");
        let found = find_occurrences(&model.plain_text, range, &marker)
            .into_iter()
            .find(|span| !claimed_starts.contains(&span.start));
        if let Some(span) = found {
            claimed_starts.push(span.start);
            patches.push(PlannedPatch {
                operation_index: op_index,
                start: span.start,
                end: span.end,
                deleted: marker,
                inserted: format!("({to_label})"),
            });
        } else {
            any_missing = true;
        }
    }
    let no_match = patches.is_empty() && any_missing;
    (patches, None, None, no_match)
}

fn first_marker_position(
    model: &DocumentModel,
    range: Span,
    mapping: &crate::semantic::RedesignateMapping,
) -> Option<usize> {
    let from_label = mapping.from.path.last()?.label.clone();
    let marker = format!("({from_label})");
    find_occurrences(&model.plain_text, range, &marker).first().map(|s| s.start)
}

fn plan_move(
    model: &DocumentModel,
    op_index: usize,
    from: &[crate::semantic::StructuralReference],
    before: Option<&crate::semantic::StructuralReference>,
    after: Option<&crate::semantic::StructuralReference>,
) -> (Vec<PlannedPatch>, Option<String>, Option<usize>, bool) {
    let mut from_spans: Vec<Span> = Vec::new();
    for reference in from {
        match resolve::resolve_path(model, &reference.path) {
            Some(Ok(id)) => {
                if let Some(node) = model.node(&id) {
                    from_spans.push(node.span);
                }
            }
            _ => return (Vec::new(), None, None, true),
        }
    }
    if from_spans.is_empty() {
        return (Vec::new(), None, None, true);
    }

    let anchor_ref = before.or(after);
    let Some(anchor_ref) = anchor_ref else {
        return (Vec::new(), None, None, true);
    };
    let anchor_span = match resolve::resolve_path(model, &anchor_ref.path) {
        Some(Ok(id)) => match model.node(&id) {
            Some(node) => node.span,
            None => return (Vec::new(), None, None, true),
        },
        _ => return (Vec::new(), None, None, true),
    };

    from_spans.sort_by_key(|s| s.start);
    let moved_text: Vec<&str> = from_spans
        .iter()
        .map(|s| model.plain_text[s.start..s.end].trim())
        .collect();
    let joined = moved_text.join("\n");

    let mut text = model.plain_text.clone();
    let mut anchor_start = anchor_span.start;
    let mut anchor_end = anchor_span.end;

    let mut sorted_desc = from_spans.clone();
    sorted_desc.sort_by(|a, b| b.start.cmp(&a.start));
    for span in &sorted_desc {
        text.replace_range(span.start..span.end, "");
        if span.end <= anchor_start {
            let removed = span.len();
            anchor_start -= removed;
            anchor_end -= removed;
        }
    }

    let insertion_point = if before.is_some() { anchor_start } else { anchor_end };
    let mut inserted_block = joined;
    if before.is_some() {
        inserted_block = format!("{inserted_block}\n");
    } else {
        inserted_block = format!("\n{inserted_block}");
    }

    let patch = PlannedPatch {
        operation_index: op_index,
        start: 0,
        end: model.plain_text.len(),
        deleted: model.plain_text.clone(),
        inserted: {
            let mut final_text = text;
            final_text.insert_str(insertion_point, &inserted_block);
            final_text
        },
    };
    (vec![patch], None, None, false)
}

fn find_occurrences(text: &str, range: Span, needle: &str) -> Vec<Span> {
    if needle.is_empty() || range.start >= range.end {
        return Vec::new();
    }
    let slice = &text[range.start..range.end];
    let mut out = Vec::new();
    let mut cursor = 0usize;
    while cursor <= slice.len() {
        let Some(rel) = slice[cursor..].find(needle) else {
            break;
        };
        let abs_start = range.start + cursor + rel;
        let abs_end = abs_start + needle.len();
        out.push(Span::new(abs_start, abs_end));
        cursor += rel + needle.len();
    }
    out
}

fn edit_kind_name(edit: &UltimateEdit) -> &'static str {
    match edit {
        UltimateEdit::Strike { .. } => "strike",
        UltimateEdit::Insert { .. } => "insert",
        UltimateEdit::StrikeInsert { .. } => "strike_insert",
        UltimateEdit::Rewrite { .. } => "rewrite",
        UltimateEdit::Redesignate { .. } => "redesignate",
        UltimateEdit::Move { .. } => "move",
    }
}

/// Overlap resolution (spec.md §4.F): sorts tentative patches by
/// `(operationIndex, start)` and keeps a patch only if it doesn't overlap
/// an already-accepted one. Two zero-width patches never overlap under
/// the half-open interval test used here.
pub fn resolve_overlaps(mut patches: Vec<PlannedPatch>) -> Vec<PlannedPatch> {
    patches.sort_by(|a, b| a.operation_index.cmp(&b.operation_index).then(a.start.cmp(&b.start)));
    let mut accepted: Vec<PlannedPatch> = Vec::new();
    for patch in patches {
        let conflicts = accepted
            .iter()
            .any(|a| patch.start < a.end && a.start < patch.end);
        if !conflicts {
            accepted.push(patch);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document;
    use crate::semantic::EditTarget;

    fn text_target(text: &str) -> EditTarget {
        EditTarget::Text {
            text: text.to_string(),
            each_place_it_appears: false,
        }
    }

    #[test]
    fn strike_insert_produces_one_patch_at_first_occurrence() {
        let model = document::build("This is old text.");
        let op = Operation {
            index: 0,
            edit: UltimateEdit::StrikeInsert {
                strike: text_target("old"),
                insert: "new".to_string(),
            },
            target_path: None,
            has_explicit_target_path: false,
            matter_preceding_path: None,
            matter_following_path: None,
            sentence_ordinal: None,
            unanchored_insert_mode: InsertMode::Insert,
        };
        let config = CoreConfig::default();
        let (patches, attempt, failure) = plan_operation(&config, &model, &op);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].deleted, "old");
        assert_eq!(patches[0].inserted, "new");
        assert!(matches!(attempt.outcome, AttemptOutcome::Applied));
        assert!(failure.is_none());
    }

    #[test]
    fn each_place_it_appears_produces_one_patch_per_occurrence() {
        let model = document::build("For 2023 and 2023 only.");
        let op = Operation {
            index: 0,
            edit: UltimateEdit::StrikeInsert {
                strike: EditTarget::Text {
                    text: "2023".to_string(),
                    each_place_it_appears: true,
                },
                insert: "2031".to_string(),
            },
            target_path: None,
            has_explicit_target_path: false,
            matter_preceding_path: None,
            matter_following_path: None,
            sentence_ordinal: None,
            unanchored_insert_mode: InsertMode::Insert,
        };
        let config = CoreConfig::default();
        let (patches, _, _) = plan_operation(&config, &model, &op);
        assert_eq!(patches.len(), 2);
    }

    #[test]
    fn missing_needle_reports_no_match_failure() {
        let model = document::build("This is old text.");
        let op = Operation {
            index: 0,
            edit: UltimateEdit::Strike {
                target: text_target("missing"),
                through: None,
            },
            target_path: None,
            has_explicit_target_path: false,
            matter_preceding_path: None,
            matter_following_path: None,
            sentence_ordinal: None,
            unanchored_insert_mode: InsertMode::Insert,
        };
        let config = CoreConfig::default();
        let (patches, attempt, failure) = plan_operation(&config, &model, &op);
        assert!(patches.is_empty());
        assert!(matches!(attempt.outcome, AttemptOutcome::NoPatch));
        assert_eq!(failure, Some(ApplyFailureKind::NoMatch));
    }

    #[test]
    fn redesignate_declared_order_flag_changes_collision_winner() {
        use crate::semantic::{RedesignateMapping, ScopeKind, ScopeSegment, StructuralReference};

        let model = document::build("(a) Alpha.");
        let reference = |label: &str| StructuralReference {
            path: vec![ScopeSegment {
                kind: ScopeKind::Subsection,
                label: label.to_string(),
            }],
        };
        // Two mappings both naming "(a)" as the from-marker; only one
        // occurrence exists, so exactly one can win.
        let mappings = vec![
            RedesignateMapping {
                from: reference("a"),
                to: reference("x"),
            },
            RedesignateMapping {
                from: reference("a"),
                to: reference("y"),
            },
        ];

        let mut config = CoreConfig::default();
        config.redesignate_respects_declared_order = true;
        let (patches, _, _, _) = plan_redesignate(&config, &model, model.root_range(), 0, &mappings);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].inserted, "(x)");

        config.redesignate_respects_declared_order = false;
        let (patches, _, _, _) = plan_redesignate(&config, &model, model.root_range(), 0, &mappings);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].inserted, "(y)");
    }

    #[test]
    fn overlap_resolution_keeps_first_by_operation_index() {
        let a = PlannedPatch {
            operation_index: 0,
            start: 5,
            end: 10,
            deleted: "aaaaa".into(),
            inserted: "".into(),
        };
        let b = PlannedPatch {
            operation_index: 1,
            start: 7,
            end: 12,
            deleted: "bbbbb".into(),
            inserted: "".into(),
        };
        let accepted = resolve_overlaps(vec![b, a]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].operation_index, 0);
    }

    #[test]
    fn zero_width_patches_at_same_position_both_survive() {
        let a = PlannedPatch {
            operation_index: 0,
            start: 3,
            end: 3,
            deleted: "".into(),
            inserted: "x".into(),
        };
        let b = PlannedPatch {
            operation_index: 1,
            start: 3,
            end: 3,
            deleted: "".into(),
            inserted: "y".into(),
        };
        let accepted = resolve_overlaps(vec![a, b]);
        assert_eq!(accepted.len(), 2);
    }
}
