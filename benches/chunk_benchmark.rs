//! Benchmarks for lexchunk chunking performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the pipeline over synthetic layout documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lexchunk::{Document, LayoutBlock, Page, Pipeline, SourceInfo};

/// Creates a synthetic publication with Roman sections and lettered subsections.
fn create_publication(page_count: u32) -> Document {
    let mut doc = Document::new();
    for number in 1..=page_count {
        let mut page = Page::new(number)
            .with_block(LayoutBlock::title(format!("Part {}", number)))
            .with_block(LayoutBlock::text(format!("I. Section {}", number)));
        for sub in ["A", "B", "C"] {
            page = page
                .with_block(LayoutBlock::section_header(format!("{}. Subsection {}", sub, number)))
                .with_block(LayoutBlock::text(
                    "The assessor shall value each parcel at full value. \
                     Exempt property is listed separately.\n"
                        .repeat(8),
                ));
        }
        doc.add_page(page);
    }
    doc
}

/// Creates a synthetic administrative code chapter with one rule per page.
fn create_statute(page_count: u32) -> Document {
    let mut doc = Document::new();
    for number in 1..=page_count {
        let text = format!(
            "Tax 16.{:02} Rule {}.\n{}",
            number,
            number,
            "(1) The department may require any filer to provide records.\n".repeat(12)
        );
        doc.add_page(Page::from_text(number, &text));
    }
    doc
}

/// Benchmark the generic strategy at various sizes.
fn bench_generic(c: &mut Criterion) {
    let mut group = c.benchmark_group("generic_pipeline");
    let pipeline = Pipeline::new();
    let source = SourceInfo::new("guide.pdf");

    for page_count in [1, 10, 50].iter() {
        let doc = create_publication(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| pipeline.process(black_box(&doc), &source).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the statute strategy.
fn bench_statute(c: &mut Criterion) {
    let pipeline = Pipeline::new();
    let source = SourceInfo::new("wi-admin-tax-16.pdf");
    let doc = create_statute(50);

    c.bench_function("statute_50_pages", |b| {
        b.iter(|| pipeline.process(black_box(&doc), &source).unwrap());
    });
}

criterion_group!(benches, bench_generic, bench_statute);
criterion_main!(benches);
