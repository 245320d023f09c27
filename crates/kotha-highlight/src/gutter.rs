#![forbid(unsafe_code)]

//! Line-number gutter and cursor position status.

use serde::{Deserialize, Serialize};

/// Line-number column shown beside the editable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGutter {
    text: String,
    lines: usize,
    scroll_top: f64,
}

impl Default for LineGutter {
    fn default() -> Self {
        Self {
            text: "1".to_string(),
            lines: 1,
            scroll_top: 0.0,
        }
    }
}

impl LineGutter {
    /// Recompute the numbers for `source`. Returns `true` if the line count
    /// changed.
    pub fn update(&mut self, source: &str) -> bool {
        let lines = source.split('\n').count();
        if lines == self.lines {
            return false;
        }
        self.lines = lines;
        self.text = (1..=lines)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        true
    }

    /// Mirror the editable surface's vertical scroll.
    pub fn sync_scroll(&mut self, top: f64) {
        self.scroll_top = top;
    }

    /// Gutter text (`1\n2\n...`).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines shown.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }
}

/// 1-based caret position for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl CursorPosition {
    /// Position of a caret given as a UTF-16 code unit offset, the unit DOM
    /// selection APIs report. Offsets past the end clamp to the end.
    #[must_use]
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut consumed = 0;
        let mut line = 1;
        let mut column = 1;
        for c in source.chars() {
            if consumed >= offset {
                break;
            }
            consumed += c.len_utf16();
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += c.len_utf16();
            }
        }
        Self { line, column }
    }

    /// Status bar text, e.g. `Line 3, Col 7`.
    #[must_use]
    pub fn status_text(&self) -> String {
        format!("Line {}, Col {}", self.line, self.column)
    }
}
