//! Marker-to-[`ScopeKind`] inference (spec.md §4.D), shared by the document
//! model builder's hierarchy detection and the semantic translator's scope
//! inference for instruction targets (both need the same "what level is
//! `(iv)` at" heuristic).

use super::tree::ScopeKind;

/// Infers the scope kind for a single `(label)` marker token.
///
/// `depth` is the 0-based nesting depth at which this marker was
/// encountered (its position in an enclosing scope stack), used to
/// disambiguate roman numerals from letters at the same rank.
pub fn infer_scope_kind(label: &str, depth: usize) -> ScopeKind {
    if label.chars().all(|c| c.is_ascii_digit()) {
        return ScopeKind::Paragraph;
    }
    if is_lowercase_roman(label) && depth >= 2 {
        return ScopeKind::Clause;
    }
    if is_uppercase_roman(label) && depth >= 4 {
        return ScopeKind::Subclause;
    }
    if label.len() == 1 && label.chars().next().unwrap().is_ascii_lowercase() {
        return ScopeKind::Subsection;
    }
    if label.len() == 1 && label.chars().next().unwrap().is_ascii_uppercase() {
        return ScopeKind::Subparagraph;
    }
    // Double-letter or leftover: item/subitem, disambiguated by depth.
    if depth >= 6 {
        ScopeKind::Subitem
    } else {
        ScopeKind::Item
    }
}

const ROMAN_DIGITS_LOWER: &[char] = &['i', 'v', 'x', 'l', 'c', 'd', 'm'];
const ROMAN_DIGITS_UPPER: &[char] = &['I', 'V', 'X', 'L', 'C', 'D', 'M'];

fn is_lowercase_roman(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| ROMAN_DIGITS_LOWER.contains(&c))
}

fn is_uppercase_roman(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| ROMAN_DIGITS_UPPER.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_paragraph() {
        assert_eq!(infer_scope_kind("6", 1), ScopeKind::Paragraph);
    }

    #[test]
    fn single_lowercase_is_subsection() {
        assert_eq!(infer_scope_kind("e", 0), ScopeKind::Subsection);
    }

    #[test]
    fn single_uppercase_is_subparagraph() {
        assert_eq!(infer_scope_kind("C", 2), ScopeKind::Subparagraph);
    }

    #[test]
    fn lowercase_roman_deep_enough_is_clause() {
        assert_eq!(infer_scope_kind("iv", 3), ScopeKind::Clause);
    }

    #[test]
    fn uppercase_roman_deep_enough_is_subclause() {
        assert_eq!(infer_scope_kind("I", 4), ScopeKind::Subclause);
    }

    #[test]
    fn shallow_roman_like_letters_fall_back_to_subsection_or_subparagraph() {
        assert_eq!(infer_scope_kind("v", 0), ScopeKind::Subsection);
    }
}
