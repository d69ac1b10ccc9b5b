//! Content change pipeline: edit -> merge -> re-split -> replace

use crate::document::{word_count, PageStore};
use crate::layout::{split_into_pages, CapacityModel};
use smallvec::SmallVec;

/// Whether a re-split is owed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflowState {
    #[default]
    Idle,
    Reflowing,
}

/// User input that can change the page list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEvent {
    /// Keystroke in a page; `raw` is that page's full new text
    PageEdit { page_index: usize, raw: String },
    /// Paste into a page; same shape as a keystroke
    Paste { page_index: usize, raw: String },
    /// The "add page" button
    AddPage,
}

/// Result of one applied reflow
#[derive(Debug, Clone, Default)]
pub struct ReflowResult {
    /// Generation of the page list produced by this reflow
    pub generation: u64,
    pub page_count_before: usize,
    pub page_count_after: usize,
    /// Pages (by new index) whose content changed or that are new
    pub changed_pages: SmallVec<[usize; 4]>,
    /// Words in the new document buffer
    pub word_count: usize,
    /// The new document buffer
    pub content: String,
}

impl ReflowResult {
    /// True when the page list gained or lost pages
    pub fn page_count_changed(&self) -> bool {
        self.page_count_before != self.page_count_after
    }
}

/// Turns input events into page-list replacements.
///
/// With a zero delay every event reflows the whole document at once. With a
/// non-zero delay, edits arriving within the window are coalesced and the
/// reflow runs on the first [`flush`](Self::flush) after the window closes.
#[derive(Debug)]
pub struct ContentPipeline {
    state: ReflowState,
    /// Coalescing window in milliseconds
    reflow_delay_ms: u64,
    /// Newest raw text per edited page, oldest first
    pending_edits: Vec<(usize, String)>,
    pending_add_page: bool,
    last_event_ms: u64,
    generation: u64,
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ContentPipeline {
    pub fn new(reflow_delay_ms: u64) -> Self {
        Self {
            state: ReflowState::Idle,
            reflow_delay_ms,
            pending_edits: Vec::new(),
            pending_add_page: false,
            last_event_ms: 0,
            generation: 0,
        }
    }

    pub fn state(&self) -> ReflowState {
        self.state
    }

    /// Generation of the page list currently in the store
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation the next reflow will produce
    pub fn next_generation(&self) -> u64 {
        self.generation + 1
    }

    pub fn reflow_delay_ms(&self) -> u64 {
        self.reflow_delay_ms
    }

    pub fn set_reflow_delay_ms(&mut self, reflow_delay_ms: u64) {
        self.reflow_delay_ms = reflow_delay_ms;
    }

    /// Record an event; moves Idle -> Reflowing
    pub fn submit(&mut self, event: ContentEvent, now_ms: u64) {
        match event {
            ContentEvent::PageEdit { page_index, raw } | ContentEvent::Paste { page_index, raw } => {
                self.pending_edits.retain(|(index, _)| *index != page_index);
                self.pending_edits.push((page_index, raw));
            }
            ContentEvent::AddPage => self.pending_add_page = true,
        }
        self.state = ReflowState::Reflowing;
        self.last_event_ms = now_ms;
    }

    /// Whether a pending reflow is allowed to run at `now_ms`
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.state == ReflowState::Reflowing
            && (self.reflow_delay_ms == 0
                || self.pending_add_page
                || now_ms.saturating_sub(self.last_event_ms) >= self.reflow_delay_ms)
    }

    /// Run the pending reflow if it is due; moves Reflowing -> Idle
    pub fn flush(
        &mut self,
        store: &mut PageStore,
        capacity: &CapacityModel,
        now_ms: u64,
    ) -> Option<ReflowResult> {
        if !self.is_due(now_ms) {
            return None;
        }

        let page_count_before = store.len();
        let edits = std::mem::take(&mut self.pending_edits);
        let add_page = std::mem::take(&mut self.pending_add_page);

        let in_range = edits.iter().filter(|(index, _)| *index < page_count_before).count();
        if in_range < edits.len() {
            tracing::warn!(
                dropped = edits.len() - in_range,
                page_count = page_count_before,
                "ignoring edits for pages that no longer exist"
            );
        }

        let mut changed = SmallVec::new();
        if in_range > 0 {
            let merged = store.merged_with(edits.as_slice());
            // An unchanged buffer keeps its pages; re-splitting a joined
            // buffer can move boundaries that were cut at whitespace runs.
            if merged != store.document() {
                changed = store.replace(split_into_pages(&merged, capacity));
            }
        }
        if add_page {
            changed.push(store.push_blank());
        }

        self.state = ReflowState::Idle;
        Some(self.finish(store, page_count_before, changed))
    }

    /// Re-split `text` into `store` now, dropping anything pending
    pub fn reset(
        &mut self,
        store: &mut PageStore,
        capacity: &CapacityModel,
        text: &str,
    ) -> ReflowResult {
        self.pending_edits.clear();
        self.pending_add_page = false;
        self.state = ReflowState::Idle;

        let page_count_before = store.len();
        let changed = store.replace(split_into_pages(text, capacity));
        self.finish(store, page_count_before, changed)
    }

    fn finish(
        &mut self,
        store: &PageStore,
        page_count_before: usize,
        changed_pages: SmallVec<[usize; 4]>,
    ) -> ReflowResult {
        self.generation += 1;
        let content = store.document();
        let result = ReflowResult {
            generation: self.generation,
            page_count_before,
            page_count_after: store.len(),
            changed_pages,
            word_count: word_count(&content),
            content,
        };
        tracing::debug!(
            generation = result.generation,
            pages = result.page_count_after,
            changed = result.changed_pages.len(),
            "reflow applied"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_capacity() -> CapacityModel {
        // 10 lines of 10 chars
        CapacityModel::new(240.0, 20.0, 20.0, 10)
    }

    fn edit(page_index: usize, raw: &str) -> ContentEvent {
        ContentEvent::PageEdit {
            page_index,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_small_capacity() {
        assert_eq!(small_capacity().chars_per_page(), 100);
    }

    #[test]
    fn test_immediate_reflow() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();

        pipeline.submit(edit(0, "hello"), 0);
        assert_eq!(pipeline.state(), ReflowState::Reflowing);

        let result = pipeline.flush(&mut store, &capacity, 0).unwrap();
        assert_eq!(pipeline.state(), ReflowState::Idle);
        assert_eq!(result.generation, 1);
        assert_eq!(result.content, "hello");
        assert_eq!(result.word_count, 1);
        assert_eq!(result.changed_pages.as_slice(), &[0]);
    }

    #[test]
    fn test_flush_when_idle_does_nothing() {
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();
        assert!(pipeline.flush(&mut store, &small_capacity(), 0).is_none());
        assert_eq!(pipeline.generation(), 0);
    }

    #[test]
    fn test_typing_past_capacity_adds_page() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();

        let mut text = String::new();
        for i in 0..=100 {
            text.push('k');
            pipeline.submit(edit(0, &text), i);
            let result = pipeline.flush(&mut store, &capacity, i).unwrap();
            if i < 100 {
                assert_eq!(result.page_count_after, 1);
            } else {
                assert!(result.page_count_changed());
                assert_eq!(result.page_count_after, 2);
            }
        }
        assert_eq!(store.page(1).unwrap().content, "k");
    }

    #[test]
    fn test_edit_in_middle_page_reflows_following_pages() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();
        pipeline.reset(&mut store, &capacity, &"word ".repeat(60));
        assert_eq!(store.len(), 3);

        let first = store.page(0).unwrap().content.clone();
        pipeline.submit(edit(0, &format!("extra {first}")), 0);
        let result = pipeline.flush(&mut store, &capacity, 0).unwrap();

        assert!(store.page(0).unwrap().content.starts_with("extra word"));
        assert!(result.changed_pages.contains(&1));
    }

    #[test]
    fn test_delay_coalesces_edits() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::new(50);

        pipeline.submit(edit(0, "a"), 0);
        pipeline.submit(edit(0, "ab"), 10);
        assert!(pipeline.flush(&mut store, &capacity, 40).is_none());
        assert_eq!(pipeline.state(), ReflowState::Reflowing);

        let result = pipeline.flush(&mut store, &capacity, 60).unwrap();
        assert_eq!(result.content, "ab");
        assert_eq!(result.generation, 1);
    }

    #[test]
    fn test_add_page_forces_flush() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::new(1_000);

        pipeline.submit(edit(0, "text"), 0);
        pipeline.submit(ContentEvent::AddPage, 1);
        let result = pipeline.flush(&mut store, &capacity, 1).unwrap();

        assert_eq!(result.page_count_after, 2);
        assert_eq!(store.page(0).unwrap().content, "text");
        assert_eq!(store.focused(), 1);
        assert_eq!(result.changed_pages.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_blank_page_folds_back_on_next_edit() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();
        pipeline.reset(&mut store, &capacity, "short");

        pipeline.submit(ContentEvent::AddPage, 0);
        pipeline.flush(&mut store, &capacity, 0);
        assert_eq!(store.len(), 2);

        pipeline.submit(edit(1, "more"), 1);
        pipeline.flush(&mut store, &capacity, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.page(0).unwrap().content, "short\n\nmore");
    }

    #[test]
    fn test_stale_page_index_is_ignored() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();

        pipeline.submit(edit(5, "ghost"), 0);
        let result = pipeline.flush(&mut store, &capacity, 0).unwrap();
        assert_eq!(result.content, "");
        assert!(result.changed_pages.is_empty());
        assert_eq!(pipeline.state(), ReflowState::Idle);
    }

    #[test]
    fn test_unchanged_page_keeps_boundaries() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::default();

        // Page 0 is cut at a newline preceded by a run of spaces
        let text = format!(
            "{}{}\n{}\n{}",
            "a".repeat(80),
            " ".repeat(12),
            "b".repeat(10),
            "c".repeat(200)
        );
        pipeline.reset(&mut store, &capacity, &text);
        let before = store.pages().to_vec();
        assert_eq!(before[0].content, "a".repeat(80));

        let unchanged = before[1].content.clone();
        pipeline.submit(edit(1, &unchanged), 0);
        let result = pipeline.flush(&mut store, &capacity, 0).unwrap();

        assert!(result.changed_pages.is_empty());
        assert!(!result.page_count_changed());
        assert_eq!(store.pages(), before.as_slice());
    }

    #[test]
    fn test_reset_drops_pending_edits() {
        let capacity = small_capacity();
        let mut store = PageStore::new();
        let mut pipeline = ContentPipeline::new(100);

        pipeline.submit(edit(0, "old"), 0);
        let result = pipeline.reset(&mut store, &capacity, "new");
        assert_eq!(result.content, "new");
        assert_eq!(pipeline.state(), ReflowState::Idle);
        assert!(pipeline.flush(&mut store, &capacity, 500).is_none());
    }
}
