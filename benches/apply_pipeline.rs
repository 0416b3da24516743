use criterion::{black_box, criterion_group, criterion_main, Criterion};
use statute_amend_core::{apply_amendment_instruction_to_section, grammar, CoreConfig};

fn section_text() -> String {
    "(a) In general.--A person who violates this section shall be fined under this title \
     or imprisoned not more than 1 year, or both.\n\n\
     (b) Exception.--Subsection (a) does not apply to a person acting under color of law."
        .to_string()
}

fn bench_document_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_build");
    group.sample_size(30);

    let content = section_text();
    group.bench_function("build", |b| {
        b.iter(|| {
            let model = statute_amend_core::document::build(black_box(&content));
            black_box(model);
        });
    });

    group.finish();
}

fn bench_apply_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_pipeline");
    group.sample_size(30);

    let table = grammar::load_default().unwrap();
    let config = CoreConfig::default();
    let instruction = "Subsection (a) is amended by striking 'fined under this title' \
                        and inserting 'fined not more than $10,000'.";
    let content = section_text();

    group.bench_function("strike_insert_end_to_end", |b| {
        b.iter(|| {
            let effect = apply_amendment_instruction_to_section(
                black_box(&config),
                black_box(&table),
                black_box(instruction),
                black_box(&content),
                None,
            );
            black_box(effect);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_document_build, bench_apply_pipeline);
criterion_main!(benches);
