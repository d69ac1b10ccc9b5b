//! Host integration: the surface the embedding application talks to

mod autosave;
mod notice;
mod save;

pub use autosave::AutoSave;
pub use notice::{Notice, NoticeKind, SAVED_MESSAGE, SAVE_FAILED_MESSAGE};
pub use save::{LocalBoxFuture, PendingSave, SaveCompletion, SaveHandler, SaveOutcome, SaveTracker};

use crate::config::EditorConfig;
use crate::editing::{CaretHost, ContentEvent, RestoreOutcome};
use crate::render::{plain_text, print_html, RenderDiff};
use crate::{Page, PagedEditor};

/// Called with the new document buffer after every applied change
pub type ContentListener = Box<dyn FnMut(&str)>;

/// Wraps a [`PagedEditor`] with the operations the application uses:
/// content get/set, focus, save with notices, auto-save and printing.
///
/// Nothing here returns an error to the caller. Save failures become
/// notices; caret failures are logged.
pub struct EditorHost {
    editor: PagedEditor,
    save_handler: Option<Box<dyn SaveHandler>>,
    on_content_change: Option<ContentListener>,
    read_only: bool,
    auto_save: AutoSave,
    saves: SaveTracker,
    notices: Vec<Notice>,
}

impl EditorHost {
    /// Create a host and load `initial_content`
    pub fn new(config: &EditorConfig, initial_content: &str) -> Self {
        let mut host = Self {
            editor: PagedEditor::from_config(config),
            save_handler: None,
            on_content_change: None,
            read_only: config.read_only,
            auto_save: AutoSave::new(config.auto_save, config.auto_save_interval_ms),
            saves: SaveTracker::new(),
            notices: Vec::new(),
        };
        host.set_content(initial_content);
        host
    }

    pub fn with_save_handler(mut self, handler: impl SaveHandler + 'static) -> Self {
        self.save_handler = Some(Box::new(handler));
        self
    }

    pub fn with_content_listener(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.on_content_change = Some(Box::new(listener));
        self
    }

    pub fn set_save_handler(&mut self, handler: Option<Box<dyn SaveHandler>>) {
        self.save_handler = handler;
    }

    pub fn set_content_listener(&mut self, listener: Option<ContentListener>) {
        self.on_content_change = listener;
    }

    pub fn editor(&self) -> &PagedEditor {
        &self.editor
    }

    pub fn pages(&self) -> &[Page] {
        self.editor.pages()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Current document buffer
    pub fn get_content(&self) -> String {
        self.editor.content()
    }

    /// Replace the whole document (initial load); the result counts as saved
    pub fn set_content(&mut self, text: &str) -> RenderDiff {
        let result = self.editor.set_content(text);
        self.saves.mark_clean();
        RenderDiff::from_reflow(&result, self.editor.pages())
    }

    /// Move input focus to the first page
    pub fn focus<H: CaretHost + ?Sized>(&mut self, view: &mut H) {
        self.editor.set_focused_page(0);
        view.focus_page(0);
    }

    /// Content changed since the last committed save
    pub fn is_dirty(&self) -> bool {
        self.saves.is_dirty()
    }

    /// Feed an input event; returns view patches when pages were replaced
    pub fn handle_event<H: CaretHost + ?Sized>(
        &mut self,
        view: &H,
        event: ContentEvent,
        now_ms: u64,
    ) -> Option<RenderDiff> {
        if self.read_only {
            tracing::debug!(?event, "ignoring edit in read-only mode");
            return None;
        }
        let result = self.editor.handle_event(view, event, now_ms)?;
        Some(self.applied(result))
    }

    pub fn edit_page<H: CaretHost + ?Sized>(
        &mut self,
        view: &H,
        page_index: usize,
        raw: impl Into<String>,
        now_ms: u64,
    ) -> Option<RenderDiff> {
        let raw = raw.into();
        self.handle_event(view, ContentEvent::PageEdit { page_index, raw }, now_ms)
    }

    pub fn paste<H: CaretHost + ?Sized>(
        &mut self,
        view: &H,
        page_index: usize,
        raw: impl Into<String>,
        now_ms: u64,
    ) -> Option<RenderDiff> {
        let raw = raw.into();
        self.handle_event(view, ContentEvent::Paste { page_index, raw }, now_ms)
    }

    pub fn add_page<H: CaretHost + ?Sized>(&mut self, view: &H, now_ms: u64) -> Option<RenderDiff> {
        self.handle_event(view, ContentEvent::AddPage, now_ms)
    }

    /// Run a coalesced reflow if its window has elapsed
    pub fn tick(&mut self, now_ms: u64) -> Option<RenderDiff> {
        let result = self.editor.tick(now_ms)?;
        Some(self.applied(result))
    }

    /// The view has rendered `generation`; restore the caret
    pub fn confirm_rendered<H: CaretHost + ?Sized>(
        &mut self,
        view: &mut H,
        generation: u64,
    ) -> RestoreOutcome {
        self.editor.confirm_rendered(view, generation)
    }

    fn applied(&mut self, result: crate::ReflowResult) -> RenderDiff {
        let unchanged = result.changed_pages.is_empty() && !result.page_count_changed();
        if !unchanged {
            self.saves.mark_edited();
            if let Some(listener) = self.on_content_change.as_mut() {
                listener(&result.content);
            }
        }
        RenderDiff::from_reflow(&result, self.editor.pages())
    }

    /// Snapshot the buffer and start a save.
    ///
    /// Pair with [`finish_save`](Self::finish_save). Splitting the two lets
    /// edits (and other saves) happen while the handler is still running.
    pub fn begin_save(&mut self) -> PendingSave {
        let version = self.saves.begin();
        let content = self.editor.content();
        tracing::debug!(version, len = content.len(), "save started");

        let future: LocalBoxFuture<'static, anyhow::Result<()>> = match &self.save_handler {
            Some(handler) => handler.save(content.clone()),
            None => Box::pin(async { Err::<(), _>(anyhow::anyhow!("no save handler configured")) }),
        };
        PendingSave::new(version, content, future)
    }

    /// Apply a finished save and post the matching notice
    pub fn finish_save(&mut self, completion: SaveCompletion) -> SaveOutcome {
        let SaveCompletion { version, result } = completion;
        if let Err(err) = &result {
            tracing::warn!(version, "save failed: {err:#}");
        }

        let outcome = self.saves.finish(version, result.is_ok());
        match outcome {
            SaveOutcome::Saved { .. } => self.notices.push(Notice::saved()),
            SaveOutcome::Failed { .. } => self.notices.push(Notice::save_failed()),
            SaveOutcome::Superseded { .. } => {
                tracing::debug!(version, "save finished after a newer one; ignored")
            }
        }
        outcome
    }

    /// Save the current buffer through the handler
    pub async fn save(&mut self) -> SaveOutcome {
        let completion = self.begin_save().resolve().await;
        self.finish_save(completion)
    }

    /// Whether the auto-save timer wants a save now
    pub fn auto_save_due(&mut self, now_ms: u64) -> bool {
        self.auto_save.poll(now_ms)
    }

    /// Save if the auto-save timer has elapsed
    pub async fn auto_save_tick(&mut self, now_ms: u64) -> Option<SaveOutcome> {
        if !self.auto_save_due(now_ms) {
            return None;
        }
        Some(self.save().await)
    }

    pub fn configure_auto_save(&mut self, enabled: bool, interval_ms: u64) {
        self.auto_save.reconfigure(enabled, interval_ms);
    }

    pub fn auto_save(&self) -> &AutoSave {
        &self.auto_save
    }

    /// Drain notices for display
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// HTML for the print dialog
    pub fn print_html(&self, title: &str) -> String {
        print_html(self.editor.pages(), title, self.editor.capacity())
    }

    /// Plain text with form-feed page breaks
    pub fn export_text(&self) -> String {
        plain_text(self.editor.pages())
    }

    /// Stop timers and drop pending caret work
    pub fn unmount(&mut self) {
        self.auto_save.stop();
        self.editor.cancel_pending_cursor();
    }
}

/// Milliseconds since the Unix epoch, for timers and coalescing windows
pub fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
