//! Section-citation parsing helper (SPEC_FULL.md §4.I).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::semantic::{infer_scope_kind, ScopeKind, ScopeSegment};

static CITATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<keyword>Section|Subsection|Paragraph|Subparagraph|Clause|Subclause|Item|Subitem)
        \s+(?P<head>[A-Za-z0-9]+)
        (?P<segs>(?:\([A-Za-z0-9]+\))*)
        (?:\s+of\s+(?:the\s+)?(?P<act>.+?))?\s*$
        ",
    )
    .unwrap()
});

static SEG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([A-Za-z0-9]+)\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCitation {
    pub act: Option<String>,
    pub path: Vec<ScopeSegment>,
}

/// Parses a citation like `"Section 5(e)(6)(C)(iv)(I) of the Food and
/// Nutrition Act"` into a structural path plus the cited act's name, if
/// any.
pub fn parse_section_citation(text: &str) -> Option<SectionCitation> {
    let caps = CITATION_RE.captures(text.trim())?;
    let keyword = caps.name("keyword")?.as_str();
    let base_kind = ScopeKind::from_keyword(keyword)?;
    let head = caps.name("head")?.as_str().to_string();

    let mut path = vec![ScopeSegment {
        kind: base_kind,
        label: head,
    }];

    if let Some(segs) = caps.name("segs") {
        for (i, m) in SEG_RE.captures_iter(segs.as_str()).enumerate() {
            let Some(label_match) = m.get(1) else {
                continue;
            };
            let label = label_match.as_str().to_string();
            let kind = infer_scope_kind(&label, i + 1);
            path.push(ScopeSegment { kind, label });
        }
    }

    let act = caps.name("act").map(|m| m.as_str().trim().to_string());
    Some(SectionCitation { act, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_section_number() {
        let citation = parse_section_citation("Section 5").unwrap();
        assert_eq!(citation.path, vec![ScopeSegment { kind: ScopeKind::Section, label: "5".into() }]);
        assert!(citation.act.is_none());
    }

    #[test]
    fn parses_nested_path_and_act_name() {
        let citation =
            parse_section_citation("Section 5(e)(6)(C)(iv)(I) of the Food and Nutrition Act").unwrap();
        assert_eq!(citation.path[0].label, "5");
        assert_eq!(citation.path[1].label, "e");
        assert_eq!(citation.path.len(), 6);
        assert_eq!(citation.act.as_deref(), Some("Food and Nutrition Act"));
    }

    #[test]
    fn returns_none_for_non_citation_text() {
        assert!(parse_section_citation("This is not a citation.").is_none());
    }
}
