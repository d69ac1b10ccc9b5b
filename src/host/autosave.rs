//! Fixed-interval auto-save timer

/// Polled timer: the host calls [`AutoSave::poll`] from its event loop and
/// saves whenever it returns true. Saves are unconditional; there is no
/// diffing against the last saved content.
#[derive(Debug, Clone)]
pub struct AutoSave {
    enabled: bool,
    interval_ms: u64,
    /// `None` until the first poll after (re)configuration
    next_due_ms: Option<u64>,
}

impl AutoSave {
    pub fn new(enabled: bool, interval_ms: u64) -> Self {
        Self {
            enabled,
            interval_ms,
            next_due_ms: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// True once per elapsed interval.
    ///
    /// The first poll arms the timer. A late poll fires once and re-arms
    /// from `now_ms`; missed ticks are not replayed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.enabled || self.interval_ms == 0 {
            return false;
        }
        match self.next_due_ms {
            None => {
                self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
                false
            }
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
                true
            }
            Some(_) => false,
        }
    }

    /// Change settings; the timer restarts on the next poll
    pub fn reconfigure(&mut self, enabled: bool, interval_ms: u64) {
        self.enabled = enabled;
        self.interval_ms = interval_ms;
        self.next_due_ms = None;
    }

    /// Clear the timer for good (unmount)
    pub fn stop(&mut self) {
        self.enabled = false;
        self.next_due_ms = None;
    }
}
