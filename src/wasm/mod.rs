//! WASM bindings for the paged editor

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use crate::editing::{locate_text_node, CaretHost, CursorPosition, RestoreOutcome};
use crate::host::{now_ms, EditorHost, LocalBoxFuture, SaveHandler, SaveOutcome};
use crate::render::RenderDiff;
use crate::EditorConfig;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Serialize through JSON into a plain JS object
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value)?;
    js_sys::JSON::parse(&json).map_err(|_| JsError::new("failed to build JS value"))
}

fn outcome_name(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Saved { .. } => "saved",
        SaveOutcome::Failed { .. } => "failed",
        SaveOutcome::Superseded { .. } => "superseded",
    }
}

fn restore_name(outcome: RestoreOutcome) -> &'static str {
    match outcome {
        RestoreOutcome::Placed => "placed",
        RestoreOutcome::Clamped => "clamped",
        RestoreOutcome::FocusedOnly => "focusedOnly",
        RestoreOutcome::PageMissing => "pageMissing",
        RestoreOutcome::Superseded => "superseded",
        RestoreOutcome::NothingPending => "nothingPending",
    }
}

/// The page view as seen from JS.
///
/// Expects an object with `readCaret()`, `placeCaret(pageIndex, offset)` and
/// `focusPage(pageIndex)`. `readCaret` returns `{ pageIndex, offset }` or null.
struct JsCaretView {
    view: JsValue,
}

impl JsCaretView {
    fn new(view: JsValue) -> Self {
        Self { view }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.view, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn number(value: &JsValue, key: &str) -> Option<usize> {
        let n = Reflect::get(value, &JsValue::from_str(key)).ok()?.as_f64()?;
        (n.is_finite() && n >= 0.0).then_some(n as usize)
    }
}

impl CaretHost for JsCaretView {
    fn caret(&self) -> Option<CursorPosition> {
        let value = self.method("readCaret")?.call0(&self.view).ok()?;
        if value.is_null() || value.is_undefined() {
            return None;
        }
        Some(CursorPosition::new(
            Self::number(&value, "pageIndex")?,
            Self::number(&value, "offset")?,
        ))
    }

    fn place_caret(&mut self, position: CursorPosition) -> anyhow::Result<()> {
        let place = self
            .method("placeCaret")
            .ok_or_else(|| anyhow!("view has no placeCaret method"))?;
        place
            .call2(
                &self.view,
                &JsValue::from(position.page_index as u32),
                &JsValue::from(position.offset as u32),
            )
            .map_err(|err| anyhow!("placeCaret threw: {err:?}"))?;
        Ok(())
    }

    fn focus_page(&mut self, page_index: usize) {
        let Some(focus) = self.method("focusPage") else {
            return;
        };
        if let Err(err) = focus.call1(&self.view, &JsValue::from(page_index as u32)) {
            tracing::warn!(page_index, "focusPage threw: {err:?}");
        }
    }
}

/// `onSave(content)` supplied from JS; may return a Promise
struct JsSaveHandler {
    callback: Function,
}

impl SaveHandler for JsSaveHandler {
    fn save(&self, content: String) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        let callback = self.callback.clone();
        // The callback runs when the future is first polled, after the
        // editor borrow has been released.
        Box::pin(async move {
            let returned = callback
                .call1(&JsValue::NULL, &JsValue::from_str(&content))
                .map_err(|err| anyhow!("onSave threw: {err:?}"))?;
            JsFuture::from(Promise::resolve(&returned))
                .await
                .map_err(|err| anyhow!("onSave rejected: {err:?}"))?;
            Ok(())
        })
    }
}

/// WASM-exposed editor wrapper
#[wasm_bindgen]
pub struct WasmPagedEditor {
    host: Rc<RefCell<EditorHost>>,
    on_content_change: Option<Function>,
}

#[wasm_bindgen]
impl WasmPagedEditor {
    /// Create an editor from initial content and an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(initial_content: &str, config_json: Option<String>) -> Result<WasmPagedEditor, JsError> {
        let config = match config_json {
            Some(json) => {
                EditorConfig::from_json(&json).map_err(|err| JsError::new(&format!("{err:#}")))?
            }
            None => EditorConfig::default(),
        };
        Ok(Self {
            host: Rc::new(RefCell::new(EditorHost::new(&config, initial_content))),
            on_content_change: None,
        })
    }

    /// Set (or clear) the function called by `save`
    #[wasm_bindgen(js_name = setSaveHandler)]
    pub fn set_save_handler(&mut self, callback: Option<Function>) {
        let handler = callback.map(|callback| Box::new(JsSaveHandler { callback }) as Box<dyn SaveHandler>);
        self.host.borrow_mut().set_save_handler(handler);
    }

    /// Set (or clear) the function called with the new buffer after each change
    #[wasm_bindgen(js_name = setContentListener)]
    pub fn set_content_listener(&mut self, callback: Option<Function>) {
        self.on_content_change = callback;
    }

    #[wasm_bindgen(js_name = getContent)]
    pub fn get_content(&self) -> String {
        self.host.borrow().get_content()
    }

    /// Replace the whole document; returns the render diff
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&self, text: &str) -> Result<JsValue, JsError> {
        let diff = self.host.borrow_mut().set_content(text);
        to_js(&diff)
    }

    /// Current pages as `[{ id, content }]`
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> Result<JsValue, JsError> {
        to_js(&self.host.borrow().pages())
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.host.borrow().editor().page_count()
    }

    #[wasm_bindgen(js_name = getFocusedPage)]
    pub fn get_focused_page(&self) -> usize {
        self.host.borrow().editor().focused_page()
    }

    #[wasm_bindgen(js_name = getWordCount)]
    pub fn get_word_count(&self) -> usize {
        self.host.borrow().editor().word_count()
    }

    #[wasm_bindgen(js_name = isReflowing)]
    pub fn is_reflowing(&self) -> bool {
        self.host.borrow().editor().state() == crate::ReflowState::Reflowing
    }

    #[wasm_bindgen(js_name = isReadOnly)]
    pub fn is_read_only(&self) -> bool {
        self.host.borrow().is_read_only()
    }

    #[wasm_bindgen(js_name = setReadOnly)]
    pub fn set_read_only(&self, read_only: bool) {
        self.host.borrow_mut().set_read_only(read_only);
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.host.borrow().is_dirty()
    }

    /// Focus the first page and make it the focused page
    pub fn focus(&self, view: JsValue) {
        let mut view = JsCaretView::new(view);
        self.host.borrow_mut().focus(&mut view);
    }

    /// A keystroke replaced page `page_index` with `raw`.
    ///
    /// Returns the render diff, or null when nothing was applied yet.
    #[wasm_bindgen(js_name = editPage)]
    pub fn edit_page(&self, view: JsValue, page_index: usize, raw: String) -> Result<JsValue, JsError> {
        let view = JsCaretView::new(view);
        let diff = self
            .host
            .borrow_mut()
            .edit_page(&view, page_index, raw, now_ms());
        self.emit(diff)
    }

    pub fn paste(&self, view: JsValue, page_index: usize, raw: String) -> Result<JsValue, JsError> {
        let view = JsCaretView::new(view);
        let diff = self.host.borrow_mut().paste(&view, page_index, raw, now_ms());
        self.emit(diff)
    }

    #[wasm_bindgen(js_name = addPage)]
    pub fn add_page(&self, view: JsValue) -> Result<JsValue, JsError> {
        let view = JsCaretView::new(view);
        let diff = self.host.borrow_mut().add_page(&view, now_ms());
        self.emit(diff)
    }

    /// Run a coalesced reflow whose window has elapsed
    pub fn tick(&self) -> Result<JsValue, JsError> {
        let diff = self.host.borrow_mut().tick(now_ms());
        self.emit(diff)
    }

    /// Report that `generation` is rendered; restores the caret
    #[wasm_bindgen(js_name = confirmRendered)]
    pub fn confirm_rendered(&self, view: JsValue, generation: f64) -> String {
        let mut view = JsCaretView::new(view);
        let outcome = self
            .host
            .borrow_mut()
            .confirm_rendered(&mut view, generation as u64);
        restore_name(outcome).to_string()
    }

    /// Save through the handler; resolves to "saved", "failed" or "superseded"
    pub fn save(&self) -> Promise {
        let host = Rc::clone(&self.host);
        let pending = host.borrow_mut().begin_save();
        future_to_promise(async move {
            let completion = pending.resolve().await;
            let outcome = host.borrow_mut().finish_save(completion);
            Ok(JsValue::from_str(outcome_name(outcome)))
        })
    }

    /// Start a save if the auto-save timer has elapsed
    #[wasm_bindgen(js_name = autoSaveTick)]
    pub fn auto_save_tick(&self) -> Option<Promise> {
        let due = self.host.borrow_mut().auto_save_due(now_ms());
        due.then(|| self.save())
    }

    #[wasm_bindgen(js_name = configureAutoSave)]
    pub fn configure_auto_save(&self, enabled: bool, interval_ms: f64) {
        self.host
            .borrow_mut()
            .configure_auto_save(enabled, interval_ms.max(0.0) as u64);
    }

    /// Drain pending notices as `[{ kind, message }]`
    #[wasm_bindgen(js_name = takeNotices)]
    pub fn take_notices(&self) -> Result<JsValue, JsError> {
        let notices = self.host.borrow_mut().take_notices();
        to_js(&notices)
    }

    #[wasm_bindgen(js_name = printHtml)]
    pub fn print_html(&self, title: &str) -> String {
        self.host.borrow().print_html(title)
    }

    #[wasm_bindgen(js_name = exportText)]
    pub fn export_text(&self) -> String {
        self.host.borrow().export_text()
    }

    /// Stop timers, drop the caret restore and listeners
    pub fn dispose(&mut self) {
        self.host.borrow_mut().unmount();
        self.on_content_change = None;
    }

    /// Notify the listener after the host borrow is released
    fn emit(&self, diff: Option<RenderDiff>) -> Result<JsValue, JsError> {
        let Some(diff) = diff else {
            return Ok(JsValue::NULL);
        };
        if let Some(listener) = &self.on_content_change {
            let content = self.host.borrow().get_content();
            if let Err(err) = listener.call1(&JsValue::NULL, &JsValue::from_str(&content)) {
                tracing::warn!("content listener threw: {err:?}");
            }
        }
        to_js(&diff)
    }
}

/// Map a caret offset onto a page's text nodes.
///
/// Returns `[nodeIndex, offsetInNode]`, or an empty array when the page has
/// no text nodes.
#[wasm_bindgen(js_name = locateTextNode)]
pub fn locate_text_node_js(node_lengths: Vec<u32>, offset: u32) -> Vec<u32> {
    let lengths: Vec<usize> = node_lengths.iter().map(|&len| len as usize).collect();
    match locate_text_node(&lengths, offset as usize) {
        Some((node, within)) => vec![node as u32, within as u32],
        None => Vec::new(),
    }
}
