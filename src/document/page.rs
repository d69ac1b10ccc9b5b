//! Pages: emulated sheets of the document

use serde::{Deserialize, Serialize};

/// Page identifier.
///
/// Ids coming straight out of the splitter are positional. Once a page list
/// is adopted by a [`PageStore`](super::PageStore) the ids become stable:
/// they survive re-splits and are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PageId(pub u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One emulated sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    /// Text assigned to this page by the most recent split
    pub content: String,
}

impl Page {
    pub fn new(id: PageId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Length in chars, the unit cursor offsets are measured in
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
