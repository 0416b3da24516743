//! # Span Primitives
//!
//! Low-level utilities for working with plain text in a span-based manner.
//!
//! ## Modules
//!
//! - **`span`**: `Span` type representing byte ranges `[start, end)`
//! - **`slice`**: Helpers for extracting text from spans (`slice_to_string`, `preview`)
//!
//! ## Design Notes
//!
//! Plain text is the single canonical coordinate space (spec.md §3, §9); the
//! document model, resolver, planner, and applier all address it by `Span`
//! rather than re-deriving offsets from Markdown structure.

pub mod slice;
pub mod span;

pub use slice::{preview, slice_to_string};
pub use span::Span;
