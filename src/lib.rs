pub mod apply;
pub mod config;
pub mod cst;
pub mod document;
pub mod error;
pub mod extract;
pub mod facade;
pub mod grammar;
pub mod plan;
pub mod resolve;
pub mod rope;
pub mod semantic;

// Re-export key types for easier usage
pub use config::CoreConfig;
pub use error::CoreError;
pub use facade::{apply_amendment_instruction_to_section, AmendmentEffect, Status};
pub use grammar::RuleTable;
pub use semantic::InstructionSemanticTree;
