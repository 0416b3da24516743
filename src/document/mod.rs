//! Component D: GFM-aware Markdown parsing into a plain-text projection,
//! formatting spans, and a structural-node hierarchy (spec.md §4.D).

mod builder;
mod hierarchy;
mod markers;
mod model;

pub use builder::build;
pub use hierarchy::infer_scope_kind;
pub use model::{DocumentModel, OffsetMap, SpanRecord, SpanType, StructuralNode};
