//! Page-level diff protocol for incremental view updates

use crate::document::{Page, PageId};
use crate::editing::ReflowResult;
use serde::Serialize;

/// A single patch operation for the view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PagePatch {
    /// Replace the text of an existing page
    #[serde(rename_all = "camelCase")]
    Update {
        page_index: usize,
        id: PageId,
        content: String,
    },
    /// Append a new page at the end
    #[serde(rename_all = "camelCase")]
    Insert {
        page_index: usize,
        id: PageId,
        content: String,
    },
    /// Remove a trailing page
    #[serde(rename_all = "camelCase")]
    Remove { page_index: usize },
}

/// Complete diff to send to the view after a reflow
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDiff {
    /// Page-list generation the view must confirm once rendered
    pub generation: u64,
    pub word_count: usize,
    pub patches: Vec<PagePatch>,
}

impl RenderDiff {
    /// Build patches from a reflow and the page list it produced
    pub fn from_reflow(result: &ReflowResult, pages: &[Page]) -> Self {
        let mut patches = Vec::with_capacity(result.changed_pages.len());

        for &index in &result.changed_pages {
            let Some(page) = pages.get(index) else {
                continue;
            };
            let (page_index, id, content) = (index, page.id, page.content.clone());
            patches.push(if index < result.page_count_before {
                PagePatch::Update {
                    page_index,
                    id,
                    content,
                }
            } else {
                PagePatch::Insert {
                    page_index,
                    id,
                    content,
                }
            });
        }

        // Highest index first so the view can remove without reindexing
        for page_index in (result.page_count_after..result.page_count_before).rev() {
            patches.push(PagePatch::Remove { page_index });
        }

        Self {
            generation: result.generation,
            word_count: result.word_count,
            patches,
        }
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}
