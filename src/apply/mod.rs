//! Component G: patch applier (spec.md §4.G).
//!
//! Applies accepted patches in descending-by-start order so earlier
//! indices stay valid, then derives post-apply replacement ranges by
//! summing the net length deltas of earlier-in-text patches.

use crate::plan::PlannedPatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub operation_index: usize,
    pub start: usize,
    pub end: usize,
    pub deleted_text: String,
    pub inserted_text: String,
}

/// Applies `patches` to `source`, returning the new text and the
/// post-apply replacement ranges, ordered by operation index.
pub fn apply_patches(source: &str, patches: &[PlannedPatch]) -> (String, Vec<Replacement>) {
    let mut by_start_desc: Vec<&PlannedPatch> = patches.iter().collect();
    by_start_desc.sort_by(|a, b| b.start.cmp(&a.start));

    let mut text = source.to_string();
    for patch in &by_start_desc {
        text.replace_range(patch.start..patch.end, &patch.inserted);
    }

    let mut by_start_asc: Vec<&PlannedPatch> = patches.iter().collect();
    by_start_asc.sort_by_key(|p| p.start);

    let mut replacements = Vec::with_capacity(patches.len());
    let mut delta: i64 = 0;
    for patch in by_start_asc {
        let new_start = (patch.start as i64 + delta) as usize;
        let new_end = new_start + patch.inserted.len();
        replacements.push(Replacement {
            operation_index: patch.operation_index,
            start: new_start,
            end: new_end,
            deleted_text: patch.deleted.clone(),
            inserted_text: patch.inserted.clone(),
        });
        delta += patch.inserted.len() as i64 - patch.deleted.len() as i64;
    }

    replacements.sort_by_key(|r| r.operation_index);
    (text, replacements)
}
