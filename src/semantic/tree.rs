//! Semantic tree types (spec.md §3, §6 "canonical JSON shape").
//!
//! Closed sum types throughout (spec.md §9): the planner exhaustively
//! matches on `UltimateEdit`/`EditTarget`/`LocationRestrictionKind`, so an
//! unhandled variant is a compile error, not a silent no-op.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Section,
    Subsection,
    Paragraph,
    Subparagraph,
    Clause,
    Subclause,
    Item,
    Subitem,
}

impl ScopeKind {
    /// Hierarchy rank, 0..7 (spec.md §3).
    pub fn rank(self) -> u8 {
        match self {
            ScopeKind::Section => 0,
            ScopeKind::Subsection => 1,
            ScopeKind::Paragraph => 2,
            ScopeKind::Subparagraph => 3,
            ScopeKind::Clause => 4,
            ScopeKind::Subclause => 5,
            ScopeKind::Item => 6,
            ScopeKind::Subitem => 7,
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word.to_ascii_lowercase().as_str() {
            "section" => ScopeKind::Section,
            "subsection" => ScopeKind::Subsection,
            "paragraph" => ScopeKind::Paragraph,
            "subparagraph" => ScopeKind::Subparagraph,
            "clause" => ScopeKind::Clause,
            "subclause" => ScopeKind::Subclause,
            "item" => ScopeKind::Item,
            "subitem" => ScopeKind::Subitem,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSegment {
    pub kind: ScopeKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub label: String,
}

/// A hierarchy path reference, e.g. "(a)(1)(A)" from some anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReference {
    pub path: Vec<ScopeSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Punctuation {
    Period,
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "locator", rename_all = "snake_case")]
pub enum EditTarget {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        each_place_it_appears: bool,
    },
    Ref {
        #[serde(rename = "ref")]
        reference: StructuralReference,
    },
    Refs {
        refs: Vec<StructuralReference>,
    },
    Punctuation {
        punctuation: Punctuation,
    },
    InnerLocation {
        location: LocationRestrictionKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationRestrictionKind {
    Heading,
    SubsectionHeading,
    SubLocationHeading,
    SentenceOrdinal { ordinal: i64 },
    SentenceLast,
    MatterPreceding { reference: StructuralReference },
    MatterFollowing { reference: StructuralReference },
    In {
        refs: Vec<StructuralReference>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<StructuralReference>,
    },
    AtEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<StructuralReference>,
    },
    Before { target: Box<EditTarget> },
    After { target: Box<EditTarget> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedesignateMapping {
    pub from: StructuralReference,
    pub to: StructuralReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UltimateEdit {
    Strike {
        target: EditTarget,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        through: Option<EditTarget>,
    },
    Insert {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before: Option<EditTarget>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after: Option<EditTarget>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at_end_of: Option<StructuralReference>,
    },
    StrikeInsert {
        strike: EditTarget,
        insert: String,
    },
    Rewrite {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<StructuralReference>,
        content: String,
    },
    Redesignate {
        mappings: Vec<RedesignateMapping>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        respectively: bool,
    },
    Move {
        from: Vec<StructuralReference>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before: Option<StructuralReference>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after: Option<StructuralReference>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SemanticNode {
    InstructionRoot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_section: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_scope_path: Option<StructuralReference>,
        children: Vec<SemanticNode>,
    },
    Scope {
        scope: Scope,
        children: Vec<SemanticNode>,
    },
    LocationRestriction {
        restriction: LocationRestrictionKind,
        children: Vec<SemanticNode>,
    },
    Edit {
        edit: UltimateEdit,
    },
}

/// Result of component C (spec.md §4.C): "The translator returns
/// `{tree, issues[]}`."
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionSemanticTree {
    pub tree: SemanticNode,
    pub issues: Vec<String>,
}

impl InstructionSemanticTree {
    pub fn to_canonical_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.tree).unwrap_or(serde_json::Value::Null)
    }
}
