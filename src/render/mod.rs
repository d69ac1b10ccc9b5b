//! Render output: page patches for the view and print/export text

mod diff;
mod print;

pub use diff::{PagePatch, RenderDiff};
pub use print::{escape_html, plain_text, print_html, PAGE_BREAK};
