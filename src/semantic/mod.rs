//! Component C: rule-directed semantic translation (spec.md §4.C).
//!
//! Converts a concrete syntax tree produced by [`crate::cst`] into the
//! closed-sum-type [`InstructionSemanticTree`] the rest of the pipeline
//! operates on.

mod scope_infer;
mod tree;
mod translator;

pub use scope_infer::infer_scope_kind;
pub use tree::{
    EditTarget, LocationRestrictionKind, Punctuation, RedesignateMapping, Scope, ScopeKind,
    ScopeSegment, SemanticNode, StructuralReference, UltimateEdit,
};
pub use tree::InstructionSemanticTree;
pub use translator::translate;
