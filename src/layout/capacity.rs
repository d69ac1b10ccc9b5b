//! Sheet geometry to character budget

use serde::{Deserialize, Serialize};

/// A4 width at 96 DPI
pub const A4_WIDTH: f32 = 794.0;

/// A4 height at 96 DPI
pub const A4_HEIGHT: f32 = 1123.0;

/// Characters per line tuned for right-to-left Arabic body text
pub const DEFAULT_CHARS_PER_LINE: usize = 70;

/// Converts physical page geometry into a "characters per page" budget.
///
/// This is a heuristic: glyph widths in Arabic vary a lot, so the budget
/// over- or under-fills a real sheet instead of shaping text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityModel {
    pub sheet_width: f32,
    pub sheet_height: f32,
    /// Margin applied on every side
    pub margin: f32,
    pub line_height: f32,
    pub chars_per_line: usize,
}

impl Default for CapacityModel {
    fn default() -> Self {
        Self {
            sheet_width: A4_WIDTH,
            sheet_height: A4_HEIGHT,
            margin: 96.0, // 1 inch
            line_height: 24.0,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
        }
    }
}

impl CapacityModel {
    pub fn new(sheet_height: f32, margin: f32, line_height: f32, chars_per_line: usize) -> Self {
        Self {
            sheet_height,
            margin,
            line_height,
            chars_per_line,
            ..Self::default()
        }
    }

    /// Usable content height per sheet
    pub fn content_height(&self) -> f32 {
        (self.sheet_height - 2.0 * self.margin).max(0.0)
    }

    /// Whole lines that fit on one sheet
    pub fn lines_per_page(&self) -> usize {
        if !(self.line_height > 0.0) {
            return 0;
        }
        (self.content_height() / self.line_height).floor() as usize
    }

    /// Character budget for one page; at least 1 so splitting always advances
    pub fn chars_per_page(&self) -> usize {
        self.chars_per_line
            .saturating_mul(self.lines_per_page())
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_a4_budget() {
        let model = CapacityModel::default();
        // (1123 - 192) / 24 = 38.79
        assert_eq!(model.lines_per_page(), 38);
        assert_eq!(model.chars_per_page(), 38 * 70);
    }

    #[test]
    fn test_custom_geometry() {
        let model = CapacityModel::new(1000.0, 100.0, 20.0, 50);
        assert_eq!(model.lines_per_page(), 40);
        assert_eq!(model.chars_per_page(), 2000);
    }

    #[test]
    fn test_degenerate_geometry_keeps_minimum_budget() {
        let margins_too_big = CapacityModel::new(100.0, 80.0, 20.0, 50);
        assert_eq!(margins_too_big.lines_per_page(), 0);
        assert_eq!(margins_too_big.chars_per_page(), 1);

        let zero_line_height = CapacityModel::new(1000.0, 10.0, 0.0, 50);
        assert_eq!(zero_line_height.lines_per_page(), 0);
        assert_eq!(zero_line_height.chars_per_page(), 1);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let model: CapacityModel =
            serde_json::from_str(r#"{ "lineHeight": 20.0, "charsPerLine": 10 }"#).unwrap();
        assert_eq!(model.sheet_height, A4_HEIGHT);
        assert_eq!(model.chars_per_page(), 10 * 46);
    }
}
