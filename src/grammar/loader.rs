//! Grammar loader (component A, spec.md §4.A).
//!
//! Two phases: split the source into logical `name ::= expression` chunks
//! (joining continuation lines), then tokenize + parse each chunk's
//! expression text with a small Pratt-style mini-parser.

use std::collections::HashMap;

use crate::error::CoreError;

use super::expr::{ExprNode, RepeatMode, RuleTable};

/// Loads a BNF-like grammar source into a `RuleTable`.
///
/// Fails with `CoreError::GrammarParse` on: unterminated literal/class,
/// empty sequence, unknown postfix, missing expression for a continuation,
/// or a `ref` naming a rule that is never defined.
pub fn load(source: &str) -> Result<RuleTable, CoreError> {
    let chunks = split_into_rule_chunks(source)?;
    let mut rules = HashMap::new();
    for (name, expr_text) in &chunks {
        let tokens = tokenize(expr_text)?;
        let mut parser = TokenParser {
            tokens: &tokens,
            pos: 0,
        };
        let expr = parser.parse_choice()?;
        if parser.pos != tokens.len() {
            return Err(fail(
                "trailing tokens after expression",
                &tokens[parser.pos..],
            ));
        }
        rules.insert(name.clone(), expr);
    }
    let table = RuleTable { rules };
    validate_refs(&table)?;
    Ok(table)
}

fn validate_refs(table: &RuleTable) -> Result<(), CoreError> {
    fn walk(expr: &ExprNode, table: &RuleTable) -> Result<(), CoreError> {
        match expr {
            ExprNode::Literal(_) | ExprNode::CharClass(_) => Ok(()),
            ExprNode::Ref(name) => {
                if table.contains(name) {
                    Ok(())
                } else {
                    Err(CoreError::GrammarParse {
                        message: format!("undefined rule referenced: {name}"),
                        snippet: name.clone(),
                    })
                }
            }
            ExprNode::Sequence(items) | ExprNode::Choice(items) => {
                for item in items {
                    walk(item, table)?;
                }
                Ok(())
            }
            ExprNode::Repeat(inner, _) => walk(inner, table),
        }
    }
    for expr in table.rules.values() {
        walk(expr, table)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Phase 1: split source into `name ::= expression` chunks
// ---------------------------------------------------------------------

fn split_into_rule_chunks(source: &str) -> Result<Vec<(String, String)>, CoreError> {
    let mut chunks: Vec<(String, String)> = Vec::new();
    for raw_line in source.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if let Some((name, rest)) = split_rule_header(line) {
            chunks.push((name.to_string(), rest.to_string()));
        } else if let Some((_, expr_text)) = chunks.last_mut() {
            expr_text.push(' ');
            expr_text.push_str(line.trim());
        } else {
            return Err(CoreError::GrammarParse {
                message: "continuation line before any rule header".to_string(),
                snippet: line.to_string(),
            });
        }
    }
    if chunks.is_empty() {
        return Err(CoreError::GrammarParse {
            message: "grammar source defines no rules".to_string(),
            snippet: String::new(),
        });
    }
    for (name, expr_text) in &chunks {
        if expr_text.trim().is_empty() {
            return Err(CoreError::GrammarParse {
                message: format!("rule {name} has an empty expression"),
                snippet: name.clone(),
            });
        }
    }
    Ok(chunks)
}

/// Recognizes a line starting a new rule: `identifier ::= rest`.
fn split_rule_header(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    if indent > 0 {
        // Continuation lines are conventionally indented; a header is not.
        return None;
    }
    let ident_end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    let name = &trimmed[..ident_end];
    if name.is_empty() || !name.chars().next().unwrap().is_alphabetic() {
        return None;
    }
    let after_name = trimmed[ident_end..].trim_start();
    let rest = after_name.strip_prefix("::=")?;
    Some((name, rest.trim_start()))
}

// ---------------------------------------------------------------------
// Phase 2: tokenizer
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Literal(String),
    CharClass(String),
    LParen,
    RParen,
    Star,
    Plus,
    Question,
    Pipe,
}

fn tokenize(text: &str) -> Result<Vec<Token>, CoreError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => {
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '?' => {
                tokens.push(Token::Question);
                i += 1;
            }
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            '"' => {
                let (lit, next) = scan_quoted(&chars, i)?;
                tokens.push(Token::Literal(lit));
                i = next;
            }
            '[' => {
                let (class, next) = scan_class(&chars, i)?;
                tokens.push(Token::CharClass(class));
                i = next;
            }
            _ if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => {
                return Err(CoreError::GrammarParse {
                    message: format!("unexpected character {c:?}"),
                    snippet: chars[i..].iter().collect(),
                });
            }
        }
    }
    Ok(tokens)
}

fn scan_quoted(chars: &[char], start: usize) -> Result<(String, usize), CoreError> {
    let mut i = start + 1;
    let mut out = String::new();
    loop {
        if i >= chars.len() {
            return Err(CoreError::GrammarParse {
                message: "unterminated literal".to_string(),
                snippet: chars[start..].iter().collect(),
            });
        }
        match chars[i] {
            '"' => {
                i += 1;
                break;
            }
            '\\' => {
                i += 1;
                if i >= chars.len() {
                    return Err(CoreError::GrammarParse {
                        message: "unterminated escape in literal".to_string(),
                        snippet: chars[start..].iter().collect(),
                    });
                }
                out.push(match chars[i] {
                    'n' => '\n',
                    't' => '\t',
                    '"' => '"',
                    '\\' => '\\',
                    other => other,
                });
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    Ok((out, i))
}

fn scan_class(chars: &[char], start: usize) -> Result<(String, usize), CoreError> {
    let mut i = start + 1;
    let class_start = i;
    loop {
        if i >= chars.len() {
            return Err(CoreError::GrammarParse {
                message: "unterminated character class".to_string(),
                snippet: chars[start..].iter().collect(),
            });
        }
        if chars[i] == ']' {
            let body: String = chars[class_start..i].iter().collect();
            return Ok((body, i + 1));
        }
        i += 1;
    }
}

// ---------------------------------------------------------------------
// Phase 2b: token parser (choice > sequence > postfix > atom)
// ---------------------------------------------------------------------

struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

fn fail(message: &str, remaining: &[Token]) -> CoreError {
    CoreError::GrammarParse {
        message: message.to_string(),
        snippet: format!("{remaining:?}"),
    }
}

impl<'a> TokenParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_choice(&mut self) -> Result<ExprNode, CoreError> {
        let mut alts = vec![self.parse_sequence()?];
        while matches!(self.peek(), Some(Token::Pipe)) {
            self.pos += 1;
            alts.push(self.parse_sequence()?);
        }
        if alts.len() == 1 {
            Ok(alts.pop().unwrap())
        } else {
            Ok(ExprNode::Choice(alts))
        }
    }

    fn parse_sequence(&mut self) -> Result<ExprNode, CoreError> {
        let mut items = Vec::new();
        while self.at_atom_start() {
            items.push(self.parse_postfix()?);
        }
        if items.is_empty() {
            return Err(fail("empty sequence", &self.tokens[self.pos..]));
        }
        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(ExprNode::Sequence(items))
        }
    }

    fn at_atom_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Ident(_))
                | Some(Token::Literal(_))
                | Some(Token::CharClass(_))
                | Some(Token::LParen)
        )
    }

    fn parse_postfix(&mut self) -> Result<ExprNode, CoreError> {
        let atom = self.parse_atom()?;
        match self.peek() {
            Some(Token::Star) => {
                self.pos += 1;
                Ok(ExprNode::Repeat(Box::new(atom), RepeatMode::Star))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                Ok(ExprNode::Repeat(Box::new(atom), RepeatMode::Plus))
            }
            Some(Token::Question) => {
                self.pos += 1;
                Ok(ExprNode::Repeat(Box::new(atom), RepeatMode::Question))
            }
            _ => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> Result<ExprNode, CoreError> {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(ExprNode::Ref(name))
            }
            Some(Token::Literal(lit)) => {
                self.pos += 1;
                Ok(ExprNode::Literal(lit))
            }
            Some(Token::CharClass(class)) => {
                self.pos += 1;
                Ok(ExprNode::CharClass(class))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_choice()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(fail("unclosed parenthesis", &self.tokens[self.pos..])),
                }
            }
            Some(other) => Err(fail(
                &format!("unknown postfix or unexpected token {other:?}"),
                &self.tokens[self.pos..],
            )),
            None => Err(fail("unexpected end of expression", &[])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_simple_rule() {
        let table = load(r#"greeting ::= "hi" | "hello""#).unwrap();
        assert!(table.contains("greeting"));
        match table.get("greeting").unwrap() {
            ExprNode::Choice(alts) => assert_eq!(alts.len(), 2),
            other => panic!("expected choice, got {other:?}"),
        }
    }

    #[test]
    fn continuation_lines_join() {
        let src = "instruction ::= \"Section\"\n    sep act";
        let table = load(src).unwrap();
        match table.get("instruction").unwrap() {
            ExprNode::Sequence(items) => assert_eq!(items.len(), 3),
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn undefined_ref_fails() {
        let err = load("a ::= b").unwrap_err();
        assert!(matches!(err, CoreError::GrammarParse { .. }));
    }

    #[test]
    fn unterminated_literal_fails() {
        let err = load("a ::= \"oops").unwrap_err();
        assert!(matches!(err, CoreError::GrammarParse { .. }));
    }

    #[test]
    fn repeat_postfixes_parse() {
        let table = load(r#"r ::= "a"* "b"+ "c"?"#).unwrap();
        match table.get("r").unwrap() {
            ExprNode::Sequence(items) => assert_eq!(items.len(), 3),
            other => panic!("expected sequence, got {other:?}"),
        }
    }
}
