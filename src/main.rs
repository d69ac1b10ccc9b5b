//! Paged-Editor CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Reads text from the file given as the first argument (or stdin) and
//! prints how it paginates onto A4 sheets.

use std::io::Read;

use anyhow::Context;
use paged_editor::{split_into_pages, word_count, CapacityModel};

fn main() -> anyhow::Result<()> {
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let capacity = CapacityModel::default();
    let pages = split_into_pages(&text, &capacity);

    println!("Paged-Editor Core");
    println!("=================");
    println!(
        "{} lines x {} chars = {} chars per page",
        capacity.lines_per_page(),
        capacity.chars_per_line,
        capacity.chars_per_page()
    );
    println!("{} pages, {} words", pages.len(), word_count(&text));
    for page in &pages {
        println!("  page {:>3}: {:>5} chars", page.id.0, page.char_len());
    }
    Ok(())
}
