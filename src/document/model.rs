//! Document model types (component D, spec.md §3).

use std::collections::HashMap;

use crate::rope::Span;
use crate::semantic::{Scope, ScopeKind, ScopeSegment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanType {
    Paragraph,
    Blockquote { depth: u8 },
    Heading { depth: u8 },
    Strong,
    Emphasis,
    InlineCode,
    Link,
    Delete,
    Insertion,
    Deletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    pub span: Span,
    pub ty: SpanType,
}

/// One level of the document's hierarchy (spec.md §3 `StructuralNode`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralNode {
    pub id: String,
    pub kind: ScopeKind,
    pub label: String,
    pub path: Vec<ScopeSegment>,
    pub span: Span,
    pub target_level: usize,
    pub child_ids: Vec<String>,
}

impl StructuralNode {
    pub fn scope(&self) -> Scope {
        Scope {
            kind: self.kind,
            label: self.label.clone(),
        }
    }
}

/// A mapping from source byte offset to plain-text byte offset (spec.md §3
/// `sourceToPlainOffsets`), monotone non-decreasing, length
/// `|sourceText| + 1`.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    table: Vec<usize>,
}

impl OffsetMap {
    pub fn new(table: Vec<usize>) -> Self {
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, source_offset: usize) -> usize {
        self.table[source_offset.min(self.table.len() - 1)]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.table
    }
}

/// Component D's output (spec.md §3).
#[derive(Debug, Clone)]
pub struct DocumentModel {
    pub plain_text: String,
    pub spans: Vec<SpanRecord>,
    pub source_to_plain_offsets: OffsetMap,
    pub nodes_by_id: HashMap<String, StructuralNode>,
    pub root_node_ids: Vec<String>,
}

impl DocumentModel {
    pub fn node(&self, id: &str) -> Option<&StructuralNode> {
        self.nodes_by_id.get(id)
    }

    pub fn root_range(&self) -> Span {
        Span::new(0, self.plain_text.len())
    }

    /// All descendant node ids of `id`, not including `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<String> = self
            .nodes_by_id
            .get(id)
            .map(|n| n.child_ids.clone())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes_by_id.get(&next) {
                stack.extend(node.child_ids.iter().cloned());
            }
            out.push(next);
        }
        out
    }
}
