//! Document model: an ordered list of derived pages

mod page;
mod stats;

pub use page::{Page, PageId};
pub use stats::word_count;

use smallvec::SmallVec;

/// Separator placed between pages when they are merged into one buffer
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Join page contents into the logical document buffer
pub fn join_pages(pages: &[Page]) -> String {
    let mut out = String::with_capacity(
        pages.iter().map(|p| p.content.len() + PAGE_SEPARATOR.len()).sum(),
    );
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push_str(PAGE_SEPARATOR);
        }
        out.push_str(&page.content);
    }
    out
}

/// The page list plus the focused page.
///
/// Pages are never edited in place: every change goes through
/// [`PageStore::replace`], which swaps the whole list at once.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages: Vec<Page>,
    focused: usize,
    /// Monotonic id source; ids are never handed out twice
    next_id: u64,
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PageStore {
    /// A store holding the single initial empty page
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(PageId(1), String::new())],
            focused: 0,
            next_id: 2,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; a document has at least one page
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn set_focused(&mut self, index: usize) {
        self.focused = index.min(self.pages.len().saturating_sub(1));
    }

    /// The full document buffer, built on demand
    pub fn document(&self) -> String {
        join_pages(&self.pages)
    }

    /// Document buffer with one page's content swapped for `raw`.
    ///
    /// Returns `None` if `index` is not a page.
    pub fn with_page_content(&self, index: usize, raw: &str) -> Option<String> {
        if index >= self.pages.len() {
            return None;
        }
        Some(self.merged_with(&[(index, raw)]))
    }

    /// Document buffer with several pages' contents swapped.
    ///
    /// Later entries for the same page win; out-of-range indices are ignored.
    pub fn merged_with<S: AsRef<str>>(&self, edits: &[(usize, S)]) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(PAGE_SEPARATOR);
            }
            let content = edits
                .iter()
                .rev()
                .find(|(index, _)| *index == i)
                .map(|(_, raw)| raw.as_ref())
                .unwrap_or(page.content.as_str());
            out.push_str(content);
        }
        out
    }

    /// Atomically replace the page list with freshly split pages.
    ///
    /// Pages at indices that already existed keep their id; extra pages get
    /// fresh ids. Returns the indices whose content changed or that are new.
    pub fn replace(&mut self, pages: Vec<Page>) -> SmallVec<[usize; 4]> {
        let mut pages = if pages.is_empty() {
            vec![Page::default()]
        } else {
            pages
        };

        let mut changed = SmallVec::new();
        for (i, page) in pages.iter_mut().enumerate() {
            match self.pages.get(i) {
                Some(old) => {
                    page.id = old.id;
                    if old.content != page.content {
                        changed.push(i);
                    }
                }
                None => {
                    page.id = self.allocate_id();
                    changed.push(i);
                }
            }
        }

        self.pages = pages;
        self.set_focused(self.focused);
        changed
    }

    /// Append one blank page and focus it
    pub fn push_blank(&mut self) -> usize {
        let id = self.allocate_id();
        let mut pages = self.pages.clone();
        pages.push(Page::new(id, String::new()));
        self.pages = pages;
        self.focused = self.pages.len() - 1;
        self.focused
    }

    fn allocate_id(&mut self) -> PageId {
        let id = PageId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(contents: &[&str]) -> Vec<Page> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| Page::new(PageId(i as u64 + 1), *c))
            .collect()
    }

    #[test]
    fn test_new_store_has_one_empty_page() {
        let store = PageStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.document(), "");
    }

    #[test]
    fn test_document_joins_with_separator() {
        let mut store = PageStore::new();
        store.replace(pages(&["one", "two", "three"]));
        assert_eq!(store.document(), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_with_page_content() {
        let mut store = PageStore::new();
        store.replace(pages(&["one", "two"]));
        assert_eq!(store.with_page_content(1, "2").as_deref(), Some("one\n\n2"));
        assert_eq!(store.with_page_content(2, "x"), None);
    }

    #[test]
    fn test_merged_with_latest_edit_wins() {
        let mut store = PageStore::new();
        store.replace(pages(&["one", "two", "three"]));
        let merged = store.merged_with(&[(0, "1"), (2, "x"), (2, "3"), (9, "ignored")]);
        assert_eq!(merged, "1\n\ntwo\n\n3");
    }

    #[test]
    fn test_replace_keeps_ids_and_reports_changes() {
        let mut store = PageStore::new();
        let first = store.page(0).unwrap().id;

        let changed = store.replace(pages(&["a", "b"]));
        assert_eq!(changed.as_slice(), &[0, 1]);
        assert_eq!(store.page(0).unwrap().id, first);
        let second = store.page(1).unwrap().id;
        assert_ne!(second, first);

        let changed = store.replace(pages(&["a", "bb"]));
        assert_eq!(changed.as_slice(), &[1]);
        assert_eq!(store.page(1).unwrap().id, second);
    }

    #[test]
    fn test_ids_are_not_reused_after_shrink() {
        let mut store = PageStore::new();
        store.replace(pages(&["a", "b", "c"]));
        let third = store.page(2).unwrap().id;

        store.replace(pages(&["a"]));
        store.replace(pages(&["a", "b", "c"]));
        assert_ne!(store.page(2).unwrap().id, third);
    }

    #[test]
    fn test_focus_is_clamped_on_shrink() {
        let mut store = PageStore::new();
        store.replace(pages(&["a", "b", "c"]));
        store.set_focused(2);
        store.replace(pages(&["a"]));
        assert_eq!(store.focused(), 0);
    }

    #[test]
    fn test_replace_with_nothing_keeps_one_page() {
        let mut store = PageStore::new();
        store.replace(Vec::new());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_push_blank_focuses_new_page() {
        let mut store = PageStore::new();
        store.replace(pages(&["a"]));
        assert_eq!(store.push_blank(), 1);
        assert_eq!(store.focused(), 1);
        assert!(store.page(1).unwrap().is_empty());
        assert_eq!(store.document(), "a\n\n");
    }
}
