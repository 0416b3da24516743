//! Component A: grammar loader (spec.md §4.A).
//!
//! Parses a BNF-like grammar source into a [`RuleTable`] of typed
//! [`ExprNode`]s. The default grammar covers the instruction forms used by
//! U.S. federal amendment drafting (SPEC_FULL.md §4.A); hosts may load their
//! own grammar text through [`load`] instead.

mod expr;
mod loader;

pub use expr::{ExprNode, RepeatMode, RuleTable};
pub use loader::load;

/// The grammar this crate ships with, embedded at compile time.
pub const DEFAULT_GRAMMAR_SOURCE: &str = include_str!("assets/default.bnf");

/// Loads [`DEFAULT_GRAMMAR_SOURCE`]. Infallible in practice (covered by
/// `default_grammar_loads` below) but kept `Result`-returning so the
/// contract matches [`load`] for a caller-supplied grammar.
pub fn load_default() -> Result<RuleTable, crate::error::CoreError> {
    load(DEFAULT_GRAMMAR_SOURCE)
}
