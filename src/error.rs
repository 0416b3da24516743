//! Error taxonomy (spec.md §7).
//!
//! The core never panics or returns `Err` across its public boundary for
//! malformed *instruction* or *section* input — those conditions are
//! reported inline in `AmendmentEffect` (see `facade`). `CoreError` is
//! reserved for the one fatal, load-time condition: a malformed grammar
//! source, which is an invariant the host controls.

use thiserror::Error;

/// Fatal errors, raised only while loading a grammar (component A).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("grammar parse error: {message} (near: {snippet:?})")]
    GrammarParse { message: String, snippet: String },
}

/// Why a hierarchy path failed to resolve to a unique structural node
/// (component E, spec.md §4.E).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionIssueKind {
    /// No candidate matched the path at any fallback stage.
    Unresolved,
    /// More than one candidate matched; carries the candidate node ids.
    Ambiguous { candidate_node_ids: Vec<String> },
}

/// Which hierarchy path on an operation a `ResolutionIssue` concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Primary,
    MatterPreceding,
    MatterFollowing,
    Through,
    Anchor,
    MoveFrom,
    MoveAnchor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionIssue {
    pub operation_index: usize,
    pub role: PathRole,
    pub path: Vec<String>,
    pub kind: ResolutionIssueKind,
}

/// Per-operation apply failure (spec.md §7 item 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyFailureKind {
    TargetUnresolved,
    TargetAmbiguous,
    ScopeUnresolved,
    NoMatch,
}

impl ApplyFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplyFailureKind::TargetUnresolved => "target_unresolved",
            ApplyFailureKind::TargetAmbiguous => "target_ambiguous",
            ApplyFailureKind::ScopeUnresolved => "scope_unresolved",
            ApplyFailureKind::NoMatch => "no_match",
        }
    }
}

impl std::fmt::Display for ApplyFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
