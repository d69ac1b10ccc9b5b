//! Benchmarks for the pagination core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paged_editor::{
    render::print_html, split_into_pages, CapacityModel, CaretHost, CursorPosition, PagedEditor,
};

/// A view without a caret
struct Headless;

impl CaretHost for Headless {
    fn caret(&self) -> Option<CursorPosition> {
        None
    }

    fn place_caret(&mut self, _position: CursorPosition) -> anyhow::Result<()> {
        Ok(())
    }

    fn focus_page(&mut self, _page_index: usize) {}
}

/// Roughly `pages` A4 pages of mixed prose
fn document(pages: usize) -> String {
    let paragraph = "The quick brown fox jumps over the lazy dog while the page keeps \
                     filling up with words. \u{0627}\u{0644}\u{0633}\u{0644}\u{0627}\u{0645} \
                     \u{0639}\u{0644}\u{064A}\u{0643}\u{0645}.\n";
    let per_page = CapacityModel::default().chars_per_page();
    let mut text = String::new();
    while text.chars().count() < per_page * pages {
        text.push_str(paragraph);
    }
    text
}

fn bench_split_small(c: &mut Criterion) {
    let capacity = CapacityModel::default();
    let text = document(1);
    c.bench_function("split_one_page", |b| {
        b.iter(|| black_box(split_into_pages(black_box(&text), &capacity)));
    });
}

fn bench_split_large(c: &mut Criterion) {
    let capacity = CapacityModel::default();
    let text = document(50);
    c.bench_function("split_fifty_pages", |b| {
        b.iter(|| black_box(split_into_pages(black_box(&text), &capacity)));
    });
}

fn bench_keystroke_reflow(c: &mut Criterion) {
    c.bench_function("keystroke_reflow_ten_pages", |b| {
        let mut editor = PagedEditor::with_text(&document(10), CapacityModel::default());
        let first = editor.pages()[0].content.clone();
        let mut toggle = false;

        b.iter(|| {
            // Alternate so every iteration changes the document
            toggle = !toggle;
            let raw = if toggle {
                format!("x{first}")
            } else {
                first.clone()
            };
            black_box(editor.edit_page(&Headless, 0, raw, 0));
        });
    });
}

fn bench_print_html(c: &mut Criterion) {
    let capacity = CapacityModel::default();
    let pages = split_into_pages(&document(20), &capacity);
    c.bench_function("print_html_twenty_pages", |b| {
        b.iter(|| black_box(print_html(black_box(&pages), "Document", &capacity)));
    });
}

criterion_group!(
    benches,
    bench_split_small,
    bench_split_large,
    bench_keystroke_reflow,
    bench_print_html,
);

criterion_main!(benches);
