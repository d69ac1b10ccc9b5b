//! Editor configuration

use crate::layout::CapacityModel;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Default auto-save period
pub const DEFAULT_AUTO_SAVE_INTERVAL_MS: u64 = 30_000;

/// Everything the embedding application can tune.
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub capacity: CapacityModel,
    pub read_only: bool,
    pub auto_save: bool,
    pub auto_save_interval_ms: u64,
    /// Coalescing window for reflows; 0 reflows on every keystroke
    pub reflow_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capacity: CapacityModel::default(),
            read_only: false,
            auto_save: false,
            auto_save_interval_ms: DEFAULT_AUTO_SAVE_INTERVAL_MS,
            reflow_delay_ms: 0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid editor config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.auto_save || self.auto_save_interval_ms > 0,
            "autoSaveIntervalMs must be positive when autoSave is on"
        );
        ensure!(
            self.capacity.chars_per_line > 0,
            "capacity.charsPerLine must be positive"
        );
        ensure!(
            self.capacity.line_height.is_finite() && self.capacity.line_height > 0.0,
            "capacity.lineHeight must be a positive number"
        );
        Ok(())
    }
}
