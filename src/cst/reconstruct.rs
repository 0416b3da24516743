//! Tree reconstruction (spec.md §4.B): greedy top-down rebuild of a single
//! concrete parse tree toward a chosen end position.

use crate::grammar::{ExprNode, RepeatMode, RuleTable};
use crate::rope::Span;

use super::matcher::Matcher;
use super::tree::CstNode;

pub struct Reconstructor<'a> {
    table: &'a RuleTable,
    matcher: &'a mut Matcher<'a>,
}

impl<'a> Reconstructor<'a> {
    pub fn new(table: &'a RuleTable, matcher: &'a mut Matcher<'a>) -> Self {
        Self { table, matcher }
    }

    pub fn build_rule(&mut self, name: &str, pos: usize, target_end: usize) -> Option<CstNode> {
        let expr = self.table.get(name)?.clone();
        let children = self.build_expr(&expr, pos, target_end)?;
        Some(CstNode::Rule {
            name: name.to_string(),
            span: Span::new(pos, target_end),
            children,
        })
    }

    fn build_expr(&mut self, expr: &ExprNode, pos: usize, target_end: usize) -> Option<Vec<CstNode>> {
        match expr {
            ExprNode::Literal(lit) => {
                if pos + lit.len() == target_end {
                    Some(vec![CstNode::Token {
                        span: Span::new(pos, target_end),
                        text: lit.clone(),
                    }])
                } else {
                    None
                }
            }
            ExprNode::CharClass(_) => {
                // A char-class consumes exactly one reachable end from pos.
                if self.matcher.match_node(expr, pos).contains(&target_end) {
                    Some(vec![CstNode::Token {
                        span: Span::new(pos, target_end),
                        text: self.matcher.input()[pos..target_end].to_string(),
                    }])
                } else {
                    None
                }
            }
            ExprNode::Ref(name) => {
                let node = self.build_rule(name, pos, target_end)?;
                Some(vec![node])
            }
            ExprNode::Sequence(items) => self.build_sequence(items, pos, target_end),
            ExprNode::Choice(alts) => self.build_choice(alts, pos, target_end),
            ExprNode::Repeat(inner, RepeatMode::Question) => {
                self.build_optional(inner, pos, target_end)
            }
            ExprNode::Repeat(inner, RepeatMode::Star | RepeatMode::Plus) => {
                self.build_repeat(inner, pos, target_end)
            }
        }
    }

    fn build_sequence(
        &mut self,
        items: &[ExprNode],
        pos: usize,
        target_end: usize,
    ) -> Option<Vec<CstNode>> {
        self.build_sequence_from(items, 0, pos, target_end)
    }

    fn build_sequence_from(
        &mut self,
        items: &[ExprNode],
        idx: usize,
        pos: usize,
        target_end: usize,
    ) -> Option<Vec<CstNode>> {
        if idx == items.len() {
            return if pos == target_end { Some(vec![]) } else { None };
        }
        let item = &items[idx];
        let mut candidates: Vec<usize> = self
            .matcher
            .match_node(item, pos)
            .into_iter()
            .filter(|e| *e <= target_end)
            .collect();
        if is_act_ref(item) {
            candidates.sort_unstable(); // ascending: shortest match first
        } else {
            candidates.sort_unstable_by(|a, b| b.cmp(a)); // descending: longest first
        }
        for end in candidates {
            let Some(head) = self.build_expr(item, pos, end) else {
                continue;
            };
            if let Some(mut tail) = self.build_sequence_from(items, idx + 1, end, target_end) {
                let mut combined = head;
                combined.append(&mut tail);
                return Some(combined);
            }
        }
        None
    }

    fn build_choice(
        &mut self,
        alts: &[ExprNode],
        pos: usize,
        target_end: usize,
    ) -> Option<Vec<CstNode>> {
        let mut ordered: Vec<(usize, usize)> = alts
            .iter()
            .enumerate()
            .filter(|(_, a)| self.matcher.match_node(a, pos).contains(&target_end))
            .map(|(i, a)| {
                let max_end = self.matcher.match_node(a, pos).into_iter().max().unwrap_or(pos);
                (i, max_end)
            })
            .collect();
        // Greedy longest, then declaration order (stable sort preserves it).
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (i, _) in ordered {
            if let Some(children) = self.build_expr(&alts[i], pos, target_end) {
                return Some(children);
            }
        }
        None
    }

    fn build_optional(
        &mut self,
        inner: &ExprNode,
        pos: usize,
        target_end: usize,
    ) -> Option<Vec<CstNode>> {
        if target_end != pos && self.matcher.match_node(inner, pos).contains(&target_end) {
            if let Some(children) = self.build_expr(inner, pos, target_end) {
                return Some(children);
            }
        }
        if pos == target_end {
            return Some(vec![]);
        }
        None
    }

    fn build_repeat(
        &mut self,
        inner: &ExprNode,
        pos: usize,
        target_end: usize,
    ) -> Option<Vec<CstNode>> {
        if pos == target_end {
            return Some(vec![]);
        }
        let mut candidates: Vec<usize> = self
            .matcher
            .match_node(inner, pos)
            .into_iter()
            .filter(|e| *e <= target_end && *e != pos)
            .collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a)); // prefer one more iteration before tail
        for end in candidates {
            let Some(head) = self.build_expr(inner, pos, end) else {
                continue;
            };
            if let Some(mut rest) = self.build_repeat(inner, end, target_end) {
                let mut combined = head;
                combined.append(&mut rest);
                return Some(combined);
            }
        }
        None
    }
}

fn is_act_ref(expr: &ExprNode) -> bool {
    matches!(expr, ExprNode::Ref(name) if name == "act")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    #[test]
    fn reconstructs_literal_sequence() {
        let table = grammar::load(r#"r ::= "ab" "cd""#).unwrap();
        let mut matcher = Matcher::new(&table, "abcd");
        let mut rec = Reconstructor::new(&table, &mut matcher);
        let tree = rec.build_rule("r", 0, 4).unwrap();
        assert_eq!(tree.span(), Span::new(0, 4));
        assert_eq!(tree.children().len(), 2);
    }

    #[test]
    fn reconstructs_choice_longest() {
        let table = grammar::load(r#"r ::= "a" | "ab""#).unwrap();
        let mut matcher = Matcher::new(&table, "ab");
        let mut rec = Reconstructor::new(&table, &mut matcher);
        let tree = rec.build_rule("r", 0, 2).unwrap();
        assert_eq!(tree.span(), Span::new(0, 2));
    }
}
