use pretty_assertions::assert_eq;
use rstest::rstest;

use statute_amend_core::{apply_amendment_instruction_to_section, document, grammar, CoreConfig, Status};

fn run(instruction: &str, section: &str) -> statute_amend_core::AmendmentEffect {
    let table = grammar::load_default().expect("default grammar loads");
    let config = CoreConfig::default();
    apply_amendment_instruction_to_section(&config, &table, instruction, section, None)
}

#[test]
fn scenario_1_strike_insert_literal() {
    let effect = run(
        "Section 2 is amended by striking 'old' and inserting 'new'.",
        "This is old text.",
    );
    assert_eq!(effect.status, Status::Ok);
    assert_eq!(effect.post_text, "This is new text.");
    assert_eq!(effect.deleted, vec!["old".to_string()]);
    assert_eq!(effect.inserted, vec!["new".to_string()]);
}

#[test]
fn scenario_2_strike_literal() {
    let effect = run(
        "Section 2 is amended by striking 'old'.",
        "This is old text.",
    );
    assert_eq!(effect.status, Status::Ok);
    assert_eq!(effect.post_text, "This is  text.");
    assert_eq!(effect.deleted, vec!["old".to_string()]);
}

#[test]
fn scenario_6_redesignate() {
    let effect = run(
        "Section 2 is amended by redesignating (a) as (b).",
        "(a) Original text.",
    );
    assert_eq!(effect.status, Status::Ok);
    assert_eq!(effect.post_text, "(b) Original text.");
}

#[test]
fn scenario_4_scoped_insert_after_structural() {
    let effect = run(
        "Subsection (a) is amended by inserting 'new' after 'old'.",
        "(a) old",
    );
    assert_eq!(effect.status, Status::Ok);
    assert!(effect.post_text.contains("(a) old new"));
}

#[test]
fn scenario_5_add_at_end_with_scope() {
    let effect = run(
        "Subsection (a) is amended by adding at the end '(1) New item.'",
        "(a) Alpha.",
    );
    assert_eq!(effect.status, Status::Ok);
    let last_line = effect.post_text.lines().last().unwrap_or("");
    assert!(last_line.contains("(1) New item."));
    assert!(effect.debug.operation_attempts[0].has_explicit_target_path);
}

#[test]
fn unresolved_target_reports_failure() {
    let effect = run(
        "Section 2 is amended by striking 'nonexistent text' and inserting 'new'.",
        "This is old text.",
    );
    assert_eq!(effect.status, Status::Unsupported);
    assert!(!effect.apply_summary.failed_items.is_empty());
}

#[test]
fn applying_no_accepted_patches_is_the_identity() {
    // An instruction that fails to parse entirely yields a document model
    // whose plain text is the input text unchanged.
    let effect = run("Not an amendatory instruction at all.", "Some section text.");
    assert_eq!(effect.status, Status::Unsupported);
    assert_eq!(effect.post_text, "Some section text.");
    assert!(effect.replacements.is_empty());
}

#[rstest]
#[case("This is old text.")]
#[case("(a) In general.--A thing happens.\n\n(b) Exception.--Another thing.")]
#[case("")]
fn document_model_offsets_are_monotone_and_cover_every_byte(#[case] body: &str) {
    use statute_amend_core::document::SpanType;

    let model = document::build(body);
    assert_eq!(
        model.source_to_plain_offsets.get(body.len()),
        model.plain_text.len()
    );

    let mut covered = vec![false; model.plain_text.len()];
    for record in model.spans.iter().filter(|s| s.ty == SpanType::Paragraph) {
        for slot in covered.iter_mut().take(record.span.end).skip(record.span.start) {
            assert!(!*slot, "byte covered by more than one paragraph span");
            *slot = true;
        }
    }
    if !model.plain_text.is_empty() {
        assert!(covered.iter().all(|c| *c), "every byte covered by exactly one paragraph span");
    }

    let mut last = 0usize;
    for i in 0..=body.len() {
        let mapped = model.source_to_plain_offsets.get(i);
        assert!(mapped >= last, "source_to_plain_offsets must be monotone");
        last = mapped;
    }
}

#[test]
fn subscope_narrows_edit_to_nested_structural_node() {
    let effect = run(
        "Subsection (a) is amended within Paragraph (1)--by striking 'old' and inserting 'new'.",
        "(a) Intro old.\n\n(1) old item.\n\n(2) old other.",
    );
    assert_eq!(effect.status, Status::Ok);
    assert_eq!(
        effect.post_text,
        "(a) Intro old.\n\n(1) new item.\n\n(2) old other."
    );
}

#[test]
fn scenario_3_each_place_it_appears_replaces_every_occurrence() {
    let effect = run(
        "Section 2 is amended by striking '2023' each place it appears and inserting '2031'.",
        "For 2023 and 2023 only.",
    );
    assert_eq!(effect.status, Status::Ok);
    assert_eq!(effect.post_text, "For 2031 and 2031 only.");
    assert_eq!(effect.replacements.len(), 2);
}
