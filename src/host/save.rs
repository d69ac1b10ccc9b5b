//! Save callbacks and version guarding

use std::future::Future;
use std::pin::Pin;

/// A boxed future that is not `Send`, as on a browser event loop
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persists a document snapshot. Supplied by the embedding application.
pub trait SaveHandler {
    fn save(&self, content: String) -> LocalBoxFuture<'static, anyhow::Result<()>>;
}

impl<F, Fut> SaveHandler for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    fn save(&self, content: String) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        Box::pin(self(content))
    }
}

/// How a save attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Persisted and recorded as the latest committed save
    Saved { version: u64 },
    /// The handler failed; the in-memory document is untouched
    Failed { version: u64 },
    /// Finished after a newer save had already committed; ignored
    Superseded { version: u64 },
}

impl SaveOutcome {
    pub fn version(&self) -> u64 {
        match *self {
            SaveOutcome::Saved { version }
            | SaveOutcome::Failed { version }
            | SaveOutcome::Superseded { version } => version,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// A save that has started but not finished
pub struct PendingSave {
    pub version: u64,
    /// Snapshot handed to the handler
    pub content: String,
    future: LocalBoxFuture<'static, anyhow::Result<()>>,
}

impl PendingSave {
    pub(crate) fn new(
        version: u64,
        content: String,
        future: LocalBoxFuture<'static, anyhow::Result<()>>,
    ) -> Self {
        Self {
            version,
            content,
            future,
        }
    }

    /// Wait for the handler
    pub async fn resolve(self) -> SaveCompletion {
        SaveCompletion {
            version: self.version,
            result: self.future.await,
        }
    }
}

impl std::fmt::Debug for PendingSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSave")
            .field("version", &self.version)
            .field("content_len", &self.content.len())
            .finish_non_exhaustive()
    }
}

/// A finished save, ready to be applied with `EditorHost::finish_save`
#[derive(Debug)]
pub struct SaveCompletion {
    pub version: u64,
    pub result: anyhow::Result<()>,
}

/// Monotonic versions for saves and edits.
///
/// Every save gets a version when it starts. A save that completes after a
/// newer one has committed cannot move the committed state backward.
#[derive(Debug, Default)]
pub struct SaveTracker {
    next_version: u64,
    committed_version: u64,
    /// Bumped on every applied edit
    edit_version: u64,
    /// Edit version captured by the last committed save
    saved_edit_version: u64,
    /// (save version, edit version at snapshot) for saves in flight
    in_flight: Vec<(u64, u64)>,
}

impl SaveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_edited(&mut self) {
        self.edit_version += 1;
    }

    /// Treat the current content as persisted (initial load)
    pub fn mark_clean(&mut self) {
        self.saved_edit_version = self.edit_version;
    }

    pub fn is_dirty(&self) -> bool {
        self.edit_version != self.saved_edit_version
    }

    pub fn committed_version(&self) -> u64 {
        self.committed_version
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Allocate a version for a save of the current content
    pub fn begin(&mut self) -> u64 {
        self.next_version += 1;
        self.in_flight.push((self.next_version, self.edit_version));
        self.next_version
    }

    /// Record how save `version` ended
    pub fn finish(&mut self, version: u64, succeeded: bool) -> SaveOutcome {
        let snapshot = self
            .in_flight
            .iter()
            .position(|(v, _)| *v == version)
            .map(|i| self.in_flight.remove(i).1);

        if version <= self.committed_version || snapshot.is_none() {
            return SaveOutcome::Superseded { version };
        }
        if !succeeded {
            return SaveOutcome::Failed { version };
        }

        self.committed_version = version;
        if let Some(edit_version) = snapshot {
            self.saved_edit_version = self.saved_edit_version.max(edit_version);
        }
        // Older saves can only be superseded now, including ones never finished
        self.in_flight.retain(|(v, _)| *v > version);
        SaveOutcome::Saved { version }
    }
}
