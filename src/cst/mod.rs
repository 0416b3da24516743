//! Component B: CST parser (spec.md §4.B).
//!
//! Memoized nondeterministic match enumeration ([`matcher`]), greedy
//! top-down tree reconstruction ([`reconstruct`]), and the instruction
//! driver that joins a line sequence, tries anchored and unanchored
//! candidate parses, and picks the longest ([`driver`]).

mod matcher;
mod reconstruct;
mod tree;

pub mod driver;

pub use driver::{parse_instruction_from_lines, parse_prefix, ParsedInstruction};
pub use matcher::Matcher;
pub use reconstruct::Reconstructor;
pub use tree::CstNode;
