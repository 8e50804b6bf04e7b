//! Conversion benchmarks
//!
//! Target: convert a 1000-paragraph clipboard document in <10ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scribe_html::{BlockRenderRules, HtmlConverter};
use scribe_model::KeyGenerator;

fn generate_document(paragraphs: usize) -> String {
    let mut html = String::from("<meta charset=\"utf-8\"><style>p { margin: 0 }</style>");

    for i in 0..paragraphs {
        match i % 4 {
            0 => html.push_str(&format!("<h2>Section {}</h2>", i)),
            1 => html.push_str(&format!(
                "<p>Paragraph {} with <b>bold</b>, <i>italic</i> and a <a href=\"https://example.com/{}\">link</a>.</p>",
                i, i
            )),
            2 => html.push_str(&format!(
                "<ul><li>Item {}</li><li>Nested<ul><li>Deeper {}</li></ul></li></ul>",
                i, i
            )),
            _ => html.push_str(&format!(
                "<p><span style=\"font-weight:700\">Styled</span> text&nbsp;{} &amp; more</p>",
                i
            )),
        }
    }

    html
}

fn bench_convert_small(c: &mut Criterion) {
    let html = generate_document(10);
    let converter = HtmlConverter::new(BlockRenderRules::default());

    c.bench_function("convert_small", |b| {
        b.iter(|| {
            let mut keys = KeyGenerator::new("bench");
            converter.convert(black_box(&html), &mut keys)
        })
    });
}

fn bench_convert_large(c: &mut Criterion) {
    let html = generate_document(1000);
    let converter = HtmlConverter::new(BlockRenderRules::default());

    c.bench_function("convert_large", |b| {
        b.iter(|| {
            let mut keys = KeyGenerator::new("bench");
            converter.convert(black_box(&html), &mut keys)
        })
    });
}

criterion_group!(benches, bench_convert_small, bench_convert_large);
criterion_main!(benches);
