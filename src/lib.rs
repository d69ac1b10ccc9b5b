//! Paged-Editor: plain-text A4 pagination core
//!
//! This crate provides the engine behind a paged text editor:
//! - A capacity model turning sheet geometry into a per-page character budget
//! - A word-boundary-aware splitter that cuts a document into pages
//! - Caret capture/restore across full page-list replacements
//! - A content change pipeline (merge -> re-split -> replace), optionally coalesced
//! - A host shim with save, auto-save and print output, plus WASM bindings

pub mod config;
pub mod document;
pub mod editing;
pub mod host;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPagedEditor;

// Re-export primary types
pub use config::EditorConfig;
pub use document::{join_pages, word_count, Page, PageId, PageStore, PAGE_SEPARATOR};
pub use editing::{
    CaretHost, ContentEvent, CursorPosition, CursorTranslator, ReflowResult, ReflowState,
    RestoreOutcome,
};
pub use host::{EditorHost, Notice, NoticeKind, SaveHandler, SaveOutcome};
pub use layout::{split_into_pages, CapacityModel};

use editing::ContentPipeline;

/// The editor state: pages, pending caret restore and reflow pipeline
#[derive(Debug)]
pub struct PagedEditor {
    store: PageStore,
    capacity: CapacityModel,
    cursor: CursorTranslator,
    pipeline: ContentPipeline,
    word_count: usize,
}

impl PagedEditor {
    /// Create an editor holding one empty page
    pub fn new(capacity: CapacityModel) -> Self {
        Self {
            store: PageStore::new(),
            capacity,
            cursor: CursorTranslator::new(),
            pipeline: ContentPipeline::default(),
            word_count: 0,
        }
    }

    /// Create an editor with initial text content
    pub fn with_text(text: &str, capacity: CapacityModel) -> Self {
        let mut editor = Self::new(capacity);
        editor.set_content(text);
        editor
    }

    /// Create an editor from a full config
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut editor = Self::new(config.capacity);
        editor.pipeline.set_reflow_delay_ms(config.reflow_delay_ms);
        editor
    }

    /// Replace the whole document, dropping pending edits and caret restores
    pub fn set_content(&mut self, text: &str) -> ReflowResult {
        self.cursor.cancel();
        let result = self.pipeline.reset(&mut self.store, &self.capacity, text);
        self.word_count = result.word_count;
        result
    }

    /// Get the document buffer
    pub fn content(&self) -> String {
        self.store.document()
    }

    pub fn pages(&self) -> &[Page] {
        self.store.pages()
    }

    pub fn page_count(&self) -> usize {
        self.store.len()
    }

    pub fn focused_page(&self) -> usize {
        self.store.focused()
    }

    pub fn set_focused_page(&mut self, index: usize) {
        self.store.set_focused(index);
    }

    /// Word count as of the last applied reflow
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn state(&self) -> ReflowState {
        self.pipeline.state()
    }

    /// Generation of the page list currently held
    pub fn generation(&self) -> u64 {
        self.pipeline.generation()
    }

    pub fn capacity(&self) -> &CapacityModel {
        &self.capacity
    }

    /// Caret position waiting to be restored, if any
    pub fn pending_cursor(&self) -> Option<CursorPosition> {
        self.cursor.pending()
    }

    /// Drop a caret restore that has not run yet
    pub fn cancel_pending_cursor(&mut self) {
        self.cursor.cancel();
    }

    /// Feed one input event through the pipeline.
    ///
    /// The caret is captured from `host` before anything changes. Returns the
    /// reflow result when the page list was replaced on this call.
    pub fn handle_event<H: CaretHost + ?Sized>(
        &mut self,
        host: &H,
        event: ContentEvent,
        now_ms: u64,
    ) -> Option<ReflowResult> {
        let add_page = event == ContentEvent::AddPage;
        self.cursor.save(host, self.pipeline.next_generation());
        self.pipeline.submit(event, now_ms);

        let result = self.tick(now_ms)?;
        if add_page {
            // Caret goes to the start of the new blank page
            self.cursor
                .save_position(CursorPosition::new(self.store.focused(), 0), result.generation);
        }
        Some(result)
    }

    /// A keystroke changed `page_index` to `raw`
    pub fn edit_page<H: CaretHost + ?Sized>(
        &mut self,
        host: &H,
        page_index: usize,
        raw: impl Into<String>,
        now_ms: u64,
    ) -> Option<ReflowResult> {
        let raw = raw.into();
        self.handle_event(host, ContentEvent::PageEdit { page_index, raw }, now_ms)
    }

    /// A paste changed `page_index` to `raw`
    pub fn paste<H: CaretHost + ?Sized>(
        &mut self,
        host: &H,
        page_index: usize,
        raw: impl Into<String>,
        now_ms: u64,
    ) -> Option<ReflowResult> {
        let raw = raw.into();
        self.handle_event(host, ContentEvent::Paste { page_index, raw }, now_ms)
    }

    /// Append a blank page and move focus to it
    pub fn add_page<H: CaretHost + ?Sized>(&mut self, host: &H, now_ms: u64) -> Option<ReflowResult> {
        self.handle_event(host, ContentEvent::AddPage, now_ms)
    }

    /// Run a coalesced reflow whose window has elapsed
    pub fn tick(&mut self, now_ms: u64) -> Option<ReflowResult> {
        let result = self.pipeline.flush(&mut self.store, &self.capacity, now_ms)?;
        self.word_count = result.word_count;
        Some(result)
    }

    /// The host has rendered page-list `generation`; restore the caret
    pub fn confirm_rendered<H: CaretHost + ?Sized>(
        &mut self,
        host: &mut H,
        generation: u64,
    ) -> RestoreOutcome {
        self.cursor
            .confirm_rendered(host, self.store.pages(), generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Caret that sits wherever the last placement put it
    #[derive(Default)]
    struct TestView {
        caret: Option<CursorPosition>,
    }

    impl CaretHost for TestView {
        fn caret(&self) -> Option<CursorPosition> {
            self.caret
        }

        fn place_caret(&mut self, position: CursorPosition) -> anyhow::Result<()> {
            self.caret = Some(position);
            Ok(())
        }

        fn focus_page(&mut self, _page_index: usize) {}
    }

    fn small_capacity() -> CapacityModel {
        CapacityModel::new(240.0, 20.0, 20.0, 10)
    }

    #[test]
    fn test_create_editor() {
        let editor = PagedEditor::new(CapacityModel::default());
        assert_eq!(editor.content(), "");
        assert_eq!(editor.page_count(), 1);
        assert_eq!(editor.word_count(), 0);
    }

    #[test]
    fn test_empty_initial_content() {
        let editor = PagedEditor::with_text("", CapacityModel::default());
        assert_eq!(editor.page_count(), 1);
        assert_eq!(editor.word_count(), 0);
        assert_eq!(editor.state(), ReflowState::Idle);
    }

    #[test]
    fn test_exact_overflow() {
        let capacity = small_capacity();
        let text = "q".repeat(capacity.chars_per_page() + 1);
        let editor = PagedEditor::with_text(&text, capacity);
        assert_eq!(editor.page_count(), 2);
        assert_eq!(editor.pages()[1].content, "q");
    }

    #[test]
    fn test_typing_triggers_reflow_and_restores_caret() {
        let capacity = small_capacity();
        let budget = capacity.chars_per_page();
        let mut editor = PagedEditor::new(capacity);
        let mut view = TestView::default();

        let mut text = String::new();
        for i in 0..budget {
            text.push('m');
            view.caret = Some(CursorPosition::new(0, i + 1));
            let result = editor.edit_page(&view, 0, text.clone(), 0).unwrap();
            assert_eq!(result.page_count_after, 1);
            editor.confirm_rendered(&mut view, result.generation);
        }

        // The overflowing keystroke
        text.push('m');
        view.caret = Some(CursorPosition::new(0, budget + 1));
        let result = editor.edit_page(&view, 0, text, 0).unwrap();
        assert_eq!(editor.page_count(), 2);
        // Page 0 already held a full budget of the same text
        assert_eq!(result.changed_pages.as_slice(), &[1]);

        let outcome = editor.confirm_rendered(&mut view, result.generation);
        assert_eq!(outcome, RestoreOutcome::Clamped);
        assert_eq!(view.caret, Some(CursorPosition::new(0, budget)));
    }

    #[test]
    fn test_add_page_moves_caret_to_new_page() {
        let mut editor = PagedEditor::with_text("first", small_capacity());
        let mut view = TestView {
            caret: Some(CursorPosition::new(0, 5)),
        };

        let result = editor.add_page(&view, 0).unwrap();
        assert_eq!(editor.page_count(), 2);
        assert_eq!(editor.focused_page(), 1);

        editor.confirm_rendered(&mut view, result.generation);
        assert_eq!(view.caret, Some(CursorPosition::new(1, 0)));
    }

    #[test]
    fn test_set_content_cancels_pending_restore() {
        let mut editor = PagedEditor::new(small_capacity());
        let view = TestView {
            caret: Some(CursorPosition::new(0, 1)),
        };
        editor.edit_page(&view, 0, "a", 0);
        assert!(editor.pending_cursor().is_some());

        editor.set_content("fresh");
        assert!(editor.pending_cursor().is_none());
        assert_eq!(editor.content(), "fresh");
    }

    #[test]
    fn test_coalesced_reflow_from_config() {
        let config = EditorConfig {
            capacity: small_capacity(),
            reflow_delay_ms: 100,
            ..EditorConfig::default()
        };
        let mut editor = PagedEditor::from_config(&config);
        let view = TestView::default();

        assert!(editor.edit_page(&view, 0, "a", 0).is_none());
        assert!(editor.edit_page(&view, 0, "ab", 50).is_none());
        assert_eq!(editor.state(), ReflowState::Reflowing);
        assert_eq!(editor.content(), "");

        let result = editor.tick(150).unwrap();
        assert_eq!(result.content, "ab");
        assert_eq!(editor.word_count(), 1);
    }
}
