//! Transient user-facing notices

use serde::Serialize;

pub const SAVED_MESSAGE: &str = "Saved";
pub const SAVE_FAILED_MESSAGE: &str = "Save failed, please retry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A short message the host shows briefly (toast style)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn saved() -> Self {
        Self {
            kind: NoticeKind::Success,
            message: SAVED_MESSAGE.to_string(),
        }
    }

    pub fn save_failed() -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: SAVE_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}
