//! Editing model: caret translation and the content change pipeline

mod cursor;
mod pipeline;

pub use cursor::{locate_text_node, CaretHost, CursorPosition, CursorTranslator, RestoreOutcome};
pub use pipeline::{ContentEvent, ContentPipeline, ReflowResult, ReflowState};
