//! Print and plain-text export

use crate::document::Page;
use crate::layout::CapacityModel;
use std::fmt::Write;

/// Page break in plain-text exports (form feed)
pub const PAGE_BREAK: char = '\u{000C}';

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A standalone HTML document for the browser's print dialog.
///
/// Each page is one section followed by a CSS page break, except the last,
/// so the printer breaks exactly where the editor does.
pub fn print_html(pages: &[Page], title: &str, capacity: &CapacityModel) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n",
        escape_html(title)
    );
    let _ = write!(
        html,
        "<style>\n\
         @page {{ size: A4; margin: 0; }}\n\
         body {{ margin: 0; }}\n\
         .page {{ box-sizing: border-box; padding: {margin}px; line-height: {line}px; \
         white-space: pre-wrap; page-break-after: always; }}\n\
         .page:last-child {{ page-break-after: auto; }}\n\
         </style>\n</head>\n<body>\n",
        margin = capacity.margin,
        line = capacity.line_height,
    );
    for page in pages {
        let _ = writeln!(
            html,
            "<section class=\"page\" data-page-id=\"{}\">{}</section>",
            page.id,
            escape_html(&page.content)
        );
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Pages joined with form feeds, for text exports that keep page breaks
pub fn plain_text(pages: &[Page]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_BREAK);
        }
        out.push_str(&page.content);
    }
    out
}
