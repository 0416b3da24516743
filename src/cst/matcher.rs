//! Match enumeration (spec.md §4.B): for each `(rule, start)` / `(node,
//! start)`, compute the set of reachable end positions, memoized.

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grammar::{ExprNode, RepeatMode, RuleTable};

type EndSet = BTreeSet<usize>;

static CLASS_CACHE: Lazy<std::sync::Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| std::sync::Mutex::new(HashMap::new()));

fn class_regex(body: &str) -> Regex {
    let mut cache = CLASS_CACHE.lock().unwrap();
    if let Some(re) = cache.get(body) {
        return re.clone();
    }
    // One Unicode scalar value, anchored at the start of the remaining input.
    let pattern = format!("^[{body}]");
    let re = Regex::new(&pattern).unwrap_or_else(|_| Regex::new("^(?!)").unwrap());
    cache.insert(body.to_string(), re.clone());
    re
}

/// Per-parse-call memoization tables (spec.md §5: "scoped to a single parse
/// call and discarded on return").
pub struct Matcher<'a> {
    table: &'a RuleTable,
    input: &'a str,
    rule_cache: HashMap<(String, usize), EndSet>,
    node_cache: HashMap<(usize, usize), EndSet>,
    in_flight: HashSet<(String, usize)>,
}

impl<'a> Matcher<'a> {
    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn new(table: &'a RuleTable, input: &'a str) -> Self {
        Self {
            table,
            input,
            rule_cache: HashMap::new(),
            node_cache: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn match_rule(&mut self, name: &str, pos: usize) -> EndSet {
        let key = (name.to_string(), pos);
        if let Some(cached) = self.rule_cache.get(&key) {
            return cached.clone();
        }
        if self.in_flight.contains(&key) {
            // Left-recursive re-entrancy: safe-net empty set (spec.md §4.B).
            return EndSet::new();
        }
        let Some(expr) = self.table.get(name) else {
            return EndSet::new();
        };
        self.in_flight.insert(key.clone());
        let result = self.match_node(expr, pos);
        self.in_flight.remove(&key);
        self.rule_cache.insert(key, result.clone());
        result
    }

    pub fn match_node(&mut self, expr: &ExprNode, pos: usize) -> EndSet {
        let node_key = (expr as *const ExprNode as usize, pos);
        if let Some(cached) = self.node_cache.get(&node_key) {
            return cached.clone();
        }
        let result = match expr {
            ExprNode::Literal(lit) => {
                if self.input[pos..].starts_with(lit.as_str()) {
                    let mut set = EndSet::new();
                    set.insert(pos + lit.len());
                    set
                } else {
                    EndSet::new()
                }
            }
            ExprNode::CharClass(body) => {
                let re = class_regex(body);
                match re.find(&self.input[pos..]) {
                    Some(m) if m.start() == 0 => {
                        let mut set = EndSet::new();
                        set.insert(pos + m.end());
                        set
                    }
                    _ => EndSet::new(),
                }
            }
            ExprNode::Ref(name) => self.match_rule(name, pos),
            ExprNode::Sequence(items) => self.match_sequence(items, pos),
            ExprNode::Choice(alts) => {
                let mut set = EndSet::new();
                for alt in alts {
                    set.extend(self.match_node(alt, pos));
                }
                set
            }
            ExprNode::Repeat(inner, RepeatMode::Question) => {
                let mut set = EndSet::new();
                set.insert(pos);
                set.extend(self.match_node(inner, pos));
                set
            }
            ExprNode::Repeat(inner, RepeatMode::Star) => self.star_closure(inner, pos),
            ExprNode::Repeat(inner, RepeatMode::Plus) => {
                let mut closure = self.star_closure(inner, pos);
                closure.remove(&pos);
                closure
            }
        };
        self.node_cache.insert(node_key, result.clone());
        result
    }

    fn match_sequence(&mut self, items: &[ExprNode], pos: usize) -> EndSet {
        let mut frontier: EndSet = [pos].into_iter().collect();
        for item in items {
            if frontier.is_empty() {
                break;
            }
            let mut next = EndSet::new();
            for p in &frontier {
                next.extend(self.match_node(item, *p));
            }
            frontier = next;
        }
        frontier
    }

    /// Breadth-first closure over repeated application of `inner`, seeded
    /// with `{pos}` (spec.md §4.B).
    fn star_closure(&mut self, inner: &ExprNode, pos: usize) -> EndSet {
        let mut visited: EndSet = [pos].into_iter().collect();
        let mut frontier: EndSet = [pos].into_iter().collect();
        loop {
            let mut next_frontier = EndSet::new();
            for p in &frontier {
                for e in self.match_node(inner, *p) {
                    if !visited.contains(&e) {
                        visited.insert(e);
                        next_frontier.insert(e);
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    #[test]
    fn matches_literal_prefix() {
        let table = grammar::load(r#"r ::= "abc""#).unwrap();
        let mut m = Matcher::new(&table, "abcdef");
        let ends = m.match_rule("r", 0);
        assert_eq!(ends, [3].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn matches_star_repeat_all_lengths() {
        let table = grammar::load(r#"r ::= "a"*"#).unwrap();
        let mut m = Matcher::new(&table, "aaab");
        let ends = m.match_rule("r", 0);
        assert_eq!(ends, [0, 1, 2, 3].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn plus_excludes_zero_length() {
        let table = grammar::load(r#"r ::= "a"+"#).unwrap();
        let mut m = Matcher::new(&table, "aaab");
        let ends = m.match_rule("r", 0);
        assert_eq!(ends, [1, 2, 3].into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn choice_unions_alternatives() {
        let table = grammar::load(r#"r ::= "cat" | "car""#).unwrap();
        let mut m = Matcher::new(&table, "car");
        let ends = m.match_rule("r", 0);
        assert_eq!(ends, [3].into_iter().collect::<BTreeSet<_>>());
    }
}
