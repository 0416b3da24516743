//! Document model builder (component D, spec.md §4.D).
//!
//! Two passes: (1) walk `pulldown-cmark`'s offset-tagged event stream to
//! assemble plain text, formatting spans, and source↔plain segments; (2)
//! detect hierarchy markers in each paragraph/heading block's plain text
//! and build the structural-node tree.

use std::collections::HashMap;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::rope::Span;
use crate::semantic::{ScopeKind, ScopeSegment};

use super::hierarchy::infer_scope_kind;
use super::model::{DocumentModel, OffsetMap, SpanRecord, SpanType, StructuralNode};

struct Segment {
    source_start: usize,
    source_end: usize,
    plain_start: usize,
    plain_end: usize,
}

/// Builds a [`DocumentModel`] from a section's Markdown body.
pub fn build(markdown: &str) -> DocumentModel {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut plain_text = String::new();
    let mut spans: Vec<SpanRecord> = Vec::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut paragraph_bounds: Vec<(usize, usize)> = Vec::new();

    // Open tag stack: (plain_start, kind tag for building span on close).
    let mut open_inline: Vec<(usize, OpenKind)> = Vec::new();
    let mut current_block_start: Option<usize> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph | Tag::Item | Tag::TableCell => {
                    start_block(&mut plain_text, &mut current_block_start);
                }
                Tag::Heading { level, .. } => {
                    start_block(&mut plain_text, &mut current_block_start);
                    open_inline.push((
                        plain_text.len(),
                        OpenKind::Heading(heading_depth(level)),
                    ));
                }
                Tag::BlockQuote(_) => {
                    blockquote_depth += 1;
                }
                Tag::Strong => open_inline.push((plain_text.len(), OpenKind::Strong)),
                Tag::Emphasis => open_inline.push((plain_text.len(), OpenKind::Emphasis)),
                Tag::Strikethrough => open_inline.push((plain_text.len(), OpenKind::Delete)),
                Tag::Link { .. } => open_inline.push((plain_text.len(), OpenKind::Link)),
                Tag::CodeBlock(_) => {
                    start_block(&mut plain_text, &mut current_block_start);
                }
                Tag::TableRow | Tag::TableHead => {}
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph | TagEnd::Item | TagEnd::TableCell => {
                    end_block(&mut plain_text, &mut current_block_start, &mut paragraph_bounds);
                }
                TagEnd::Heading(_) => {
                    end_block(&mut plain_text, &mut current_block_start, &mut paragraph_bounds);
                    close_inline(&mut open_inline, &mut spans, plain_text.len());
                }
                TagEnd::BlockQuote(_) => {
                    blockquote_depth = blockquote_depth.saturating_sub(1);
                }
                TagEnd::Strong
                | TagEnd::Emphasis
                | TagEnd::Strikethrough
                | TagEnd::Link => {
                    close_inline(&mut open_inline, &mut spans, plain_text.len());
                }
                TagEnd::CodeBlock => {
                    end_block(&mut plain_text, &mut current_block_start, &mut paragraph_bounds);
                }
                _ => {}
            },
            Event::Text(text) => {
                push_text_segment(
                    &mut plain_text,
                    &mut segments,
                    &mut current_block_start,
                    range,
                    text.as_ref(),
                );
            }
            Event::Code(text) => {
                let start = plain_text.len();
                push_text_segment(
                    &mut plain_text,
                    &mut segments,
                    &mut current_block_start,
                    range,
                    text.as_ref(),
                );
                spans.push(SpanRecord {
                    span: Span::new(start, plain_text.len()),
                    ty: SpanType::InlineCode,
                });
            }
            Event::SoftBreak => {
                push_text_segment(&mut plain_text, &mut segments, &mut current_block_start, range, " ");
            }
            Event::HardBreak => {
                push_text_segment(&mut plain_text, &mut segments, &mut current_block_start, range, "\n");
            }
            Event::Rule | Event::TaskListMarker(_) | Event::Html(_) | Event::InlineHtml(_) => {}
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }

    }

    // Blockquote depth is attached via a second pass over the raw source
    // rather than mid-stream, since nesting depth at block-open time doesn't
    // map cleanly onto pulldown-cmark's event order.
    let blockquote_spans = detect_blockquote_spans(markdown, &segments, plain_text.len());
    spans.extend(blockquote_spans);

    for (start, end) in &paragraph_bounds {
        spans.push(SpanRecord {
            span: Span::new(*start, *end),
            ty: SpanType::Paragraph,
        });
    }
    spans.sort_by_key(|s| (s.span.start, s.span.end));

    let source_to_plain_offsets = build_offset_map(markdown.len(), plain_text.len(), &segments);

    let (nodes_by_id, root_node_ids) =
        super::markers::build_hierarchy(&plain_text, &paragraph_bounds);

    DocumentModel {
        plain_text,
        spans,
        source_to_plain_offsets,
        nodes_by_id,
        root_node_ids,
    }
}

enum OpenKind {
    Strong,
    Emphasis,
    Delete,
    Link,
    Heading(u8),
}

fn start_block(plain_text: &mut String, current_block_start: &mut Option<usize>) {
    if current_block_start.is_some() {
        return;
    }
    if !plain_text.is_empty() && !plain_text.ends_with("\n\n") {
        plain_text.push_str("\n\n");
    }
    *current_block_start = Some(plain_text.len());
}

fn end_block(
    plain_text: &mut String,
    current_block_start: &mut Option<usize>,
    paragraph_bounds: &mut Vec<(usize, usize)>,
) {
    if let Some(start) = current_block_start.take() {
        paragraph_bounds.push((start, plain_text.len()));
    }
}

fn close_inline(open_inline: &mut Vec<(usize, OpenKind)>, spans: &mut Vec<SpanRecord>, end: usize) {
    if let Some((start, kind)) = open_inline.pop() {
        let ty = match kind {
            OpenKind::Strong => SpanType::Strong,
            OpenKind::Emphasis => SpanType::Emphasis,
            OpenKind::Delete => SpanType::Delete,
            OpenKind::Link => SpanType::Link,
            OpenKind::Heading(depth) => SpanType::Heading { depth },
        };
        spans.push(SpanRecord {
            span: Span::new(start, end),
            ty,
        });
    }
}

fn push_text_segment(
    plain_text: &mut String,
    segments: &mut Vec<Segment>,
    current_block_start: &mut Option<usize>,
    source_range: std::ops::Range<usize>,
    text: &str,
) {
    if current_block_start.is_none() {
        // Loose text outside any tracked block (rare with ENABLE_TABLES
        // off edge cases); treat as its own block.
        start_block(plain_text, current_block_start);
    }
    let plain_start = plain_text.len();
    plain_text.push_str(text);
    segments.push(Segment {
        source_start: source_range.start,
        source_end: source_range.end,
        plain_start,
        plain_end: plain_text.len(),
    });
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Blockquote depth is re-derived from the raw source rather than tracked
/// live, since the first pass only needs block/inline/text bookkeeping.
/// Any source line starting with one or more `>` markers contributes a
/// blockquote span at the corresponding plain-text range, depth = number
/// of `>` markers.
fn detect_blockquote_spans(source: &str, segments: &[Segment], plain_len: usize) -> Vec<SpanRecord> {
    let mut spans = Vec::new();
    let mut offset = 0usize;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let depth = trimmed.chars().take_while(|c| *c == '>').count();
        if depth > 0 {
            let line_start = offset;
            let line_end = offset + line.len();
            let plain_start = source_to_plain_via_segments(segments, line_start, plain_len);
            let plain_end = source_to_plain_via_segments(segments, line_end, plain_len);
            if plain_end > plain_start {
                spans.push(SpanRecord {
                    span: Span::new(plain_start, plain_end),
                    ty: SpanType::Blockquote { depth: depth as u8 },
                });
            }
        }
        offset += line.len();
    }
    spans
}

fn source_to_plain_via_segments(segments: &[Segment], source_offset: usize, plain_len: usize) -> usize {
    for seg in segments {
        if seg.source_start <= source_offset && source_offset <= seg.source_end {
            let span_len = (seg.source_end - seg.source_start).max(1);
            let frac = (source_offset - seg.source_start) as f64 / span_len as f64;
            let mapped = seg.plain_start as f64 + frac * (seg.plain_end - seg.plain_start) as f64;
            return (mapped as usize).min(seg.plain_end).min(plain_len);
        }
    }
    // Fall back to nearest preceding segment's plain_end, else 0.
    segments
        .iter()
        .filter(|s| s.source_end <= source_offset)
        .map(|s| s.plain_end)
        .max()
        .unwrap_or(0)
        .min(plain_len)
}

fn build_offset_map(source_len: usize, plain_len: usize, segments: &[Segment]) -> OffsetMap {
    let mut table = vec![0usize; source_len + 1];
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    sorted.sort_by_key(|s| s.source_start);

    let mut last_plain_end = 0usize;
    let mut seg_iter = sorted.iter().peekable();
    let mut current: Option<&&Segment> = seg_iter.next();

    for offset in 0..=source_len {
        while let Some(seg) = current {
            if offset > seg.source_end {
                last_plain_end = seg.plain_end;
                current = seg_iter.next();
            } else {
                break;
            }
        }
        let value = match current {
            Some(seg) if seg.source_start <= offset && offset <= seg.source_end => {
                let span_len = (seg.source_end - seg.source_start).max(1);
                let frac = (offset - seg.source_start) as f64 / span_len as f64;
                let mapped =
                    seg.plain_start as f64 + frac * (seg.plain_end - seg.plain_start) as f64;
                (mapped as usize).min(seg.plain_end)
            }
            _ => last_plain_end,
        };
        table[offset] = value.min(plain_len);
    }
    if let Some(last) = table.last_mut() {
        *last = plain_len;
    }
    OffsetMap::new(table)
}

#[allow(dead_code)]
fn scope_segment(kind: ScopeKind, label: &str) -> ScopeSegment {
    ScopeSegment {
        kind,
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_covers_simple_paragraph() {
        let model = build("Hello world.");
        assert_eq!(model.plain_text, "Hello world.");
    }

    #[test]
    fn offset_map_is_monotone_and_ends_at_plain_len() {
        let source = "(a) Alpha beta gamma.";
        let model = build(source);
        let table = model.source_to_plain_offsets.as_slice();
        assert_eq!(table.len(), source.len() + 1);
        assert_eq!(*table.last().unwrap(), model.plain_text.len());
        for w in table.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn every_byte_covered_by_exactly_one_paragraph_span() {
        let model = build("(a) First.\n\n(b) Second.");
        let mut covered = vec![0u32; model.plain_text.len()];
        for s in model.spans.iter().filter(|s| s.ty == SpanType::Paragraph) {
            for b in &mut covered[s.span.start..s.span.end] {
                *b += 1;
            }
        }
        assert!(covered.iter().all(|c| *c == 1), "{covered:?}");
    }

    #[test]
    fn strong_emphasis_and_code_spans_are_recorded() {
        let model = build("This is **bold** and *italic* and `code`.");
        assert!(model.spans.iter().any(|s| s.ty == SpanType::Strong));
        assert!(model.spans.iter().any(|s| s.ty == SpanType::Emphasis));
        assert!(model.spans.iter().any(|s| s.ty == SpanType::InlineCode));
    }
}
