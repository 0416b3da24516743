//! CST node types (spec.md §4.B): "two node kinds: `token {start,end,text}`
//! and `rule {name,start,end,children}`".

use crate::rope::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CstNode {
    Token {
        span: Span,
        text: String,
    },
    Rule {
        name: String,
        span: Span,
        children: Vec<CstNode>,
    },
}

impl CstNode {
    pub fn span(&self) -> Span {
        match self {
            CstNode::Token { span, .. } => *span,
            CstNode::Rule { span, .. } => *span,
        }
    }

    pub fn rule_name(&self) -> Option<&str> {
        match self {
            CstNode::Rule { name, .. } => Some(name),
            CstNode::Token { .. } => None,
        }
    }

    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Rule { children, .. } => children,
            CstNode::Token { .. } => &[],
        }
    }

    /// Depth-first search for the first descendant (including self) rule
    /// node with the given name.
    pub fn find_rule(&self, name: &str) -> Option<&CstNode> {
        if self.rule_name() == Some(name) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_rule(name))
    }

    /// All descendant (including self) rule nodes with the given name, in
    /// document order, not descending into matches (siblings under the
    /// same parent only — used for repeated productions like `edit_list`).
    pub fn find_all_rules<'a>(&'a self, name: &str, out: &mut Vec<&'a CstNode>) {
        if self.rule_name() == Some(name) {
            out.push(self);
            return;
        }
        for c in self.children() {
            c.find_all_rules(name, out);
        }
    }

    /// The verbatim source text this node covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let sp = self.span();
        &source[sp.start..sp.end]
    }
}
