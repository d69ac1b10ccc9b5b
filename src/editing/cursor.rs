//! Caret capture and restore across a page-list replacement

use crate::document::Page;
use serde::{Deserialize, Serialize};

/// Caret location: char offset into the plain text of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub page_index: usize,
    pub offset: usize,
}

impl CursorPosition {
    pub fn new(page_index: usize, offset: usize) -> Self {
        Self { page_index, offset }
    }
}

/// The view the caret lives in (the DOM in a browser).
pub trait CaretHost {
    /// Current caret, if it is inside one page's editable region
    fn caret(&self) -> Option<CursorPosition>;

    /// Put the caret at `position`; the page is known to exist
    fn place_caret(&mut self, position: CursorPosition) -> anyhow::Result<()>;

    /// Give a page input focus without moving the caret
    fn focus_page(&mut self, page_index: usize);
}

/// What happened to a pending restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Caret placed at the remembered offset
    Placed,
    /// Remembered offset was past the end; caret placed at the end of the page
    Clamped,
    /// Placement failed; the page was focused instead
    FocusedOnly,
    /// Page no longer exists; nothing done
    PageMissing,
    /// A newer reflow owns the caret; this confirmation was ignored
    Superseded,
    /// No restore was pending
    NothingPending,
}

#[derive(Debug, Clone, Copy)]
struct PendingRestore {
    generation: u64,
    position: CursorPosition,
}

/// Holds at most one pending caret restore.
///
/// A restore is tied to the reflow generation it waits for. It runs once,
/// when the host confirms that generation is rendered. Capturing again
/// replaces (cancels) the previous restore.
#[derive(Debug, Default)]
pub struct CursorTranslator {
    pending: Option<PendingRestore>,
}

impl CursorTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the host caret for the reflow `generation`.
    ///
    /// Returns the captured position, or `None` when the caret is outside the
    /// pages (in which case any older pending restore is dropped too).
    pub fn save<H: CaretHost + ?Sized>(
        &mut self,
        host: &H,
        generation: u64,
    ) -> Option<CursorPosition> {
        match host.caret() {
            Some(position) => {
                self.save_position(position, generation);
                Some(position)
            }
            None => {
                self.pending = None;
                None
            }
        }
    }

    /// Remember an explicit position for the reflow `generation`
    pub fn save_position(&mut self, position: CursorPosition, generation: u64) {
        self.pending = Some(PendingRestore {
            generation,
            position,
        });
    }

    pub fn pending(&self) -> Option<CursorPosition> {
        self.pending.map(|p| p.position)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Run the pending restore now that `generation` is on screen.
    pub fn confirm_rendered<H: CaretHost + ?Sized>(
        &mut self,
        host: &mut H,
        pages: &[Page],
        generation: u64,
    ) -> RestoreOutcome {
        let Some(pending) = self.pending else {
            return RestoreOutcome::NothingPending;
        };

        if pending.generation > generation {
            // Render of an older list; keep waiting for ours
            return RestoreOutcome::Superseded;
        }
        self.pending = None;
        if pending.generation < generation {
            tracing::debug!(
                pending = pending.generation,
                rendered = generation,
                "dropping cursor restore for an outdated reflow"
            );
            return RestoreOutcome::Superseded;
        }

        let CursorPosition { page_index, offset } = pending.position;
        let Some(page) = pages.get(page_index) else {
            tracing::debug!(page_index, "cursor restore target page is gone");
            return RestoreOutcome::PageMissing;
        };

        let len = page.char_len();
        let (target, outcome) = if offset > len {
            (CursorPosition::new(page_index, len), RestoreOutcome::Clamped)
        } else {
            (pending.position, RestoreOutcome::Placed)
        };

        match host.place_caret(target) {
            Ok(()) => outcome,
            Err(err) => {
                tracing::warn!(page_index, offset = target.offset, "cursor restoration failed: {err:#}");
                host.focus_page(page_index);
                RestoreOutcome::FocusedOnly
            }
        }
    }
}

/// Find the text node holding char `offset`, given the char lengths of a
/// page's text nodes in document order.
///
/// Returns `(node_index, offset_in_node)`. An offset on a node boundary
/// resolves to the end of the earlier node. Offsets past the end clamp to the
/// end of the last node; `None` only when there are no nodes.
pub fn locate_text_node(node_lengths: &[usize], offset: usize) -> Option<(usize, usize)> {
    let last = node_lengths.len().checked_sub(1)?;
    let mut remaining = offset;
    for (i, &len) in node_lengths.iter().enumerate() {
        if remaining <= len {
            return Some((i, remaining));
        }
        remaining -= len;
    }
    Some((last, node_lengths[last]))
}
