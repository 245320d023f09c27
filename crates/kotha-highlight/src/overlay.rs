#![forbid(unsafe_code)]

//! Highlight overlay kept in step with the editable surface.
//!
//! The overlay never scrolls on its own: every scroll offset it holds was
//! copied from the editable surface, either during a render or through
//! [`Overlay::sync_scroll`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::Highlighter;
use crate::markup::HighlightMarkup;

/// Scroll offsets of a scrollable element, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub top: f64,
    pub left: f64,
}

impl ScrollOffset {
    pub const ZERO: Self = Self { top: 0.0, left: 0.0 };

    #[must_use]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// State of the overlay element once it exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayElement {
    pub markup: HighlightMarkup,
    pub scroll: ScrollOffset,
}

/// Lazily created highlight overlay.
#[derive(Default)]
pub struct Overlay {
    highlighter: Highlighter,
    element: Option<OverlayElement>,
    renders: u64,
}

impl Overlay {
    /// Create an overlay that renders with `highlighter`.
    #[must_use]
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            highlighter,
            element: None,
            renders: 0,
        }
    }

    /// The highlighter used for renders.
    #[must_use]
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Replace the highlighter. Takes effect on the next render.
    pub fn set_highlighter(&mut self, highlighter: Highlighter) {
        self.highlighter = highlighter;
    }

    /// Whether the overlay element has been created.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.element.is_some()
    }

    /// The overlay element, if it has been created.
    #[must_use]
    pub fn element(&self) -> Option<&OverlayElement> {
        self.element.as_ref()
    }

    /// Number of renders performed so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Re-tokenize `text` and replace the overlay markup.
    ///
    /// Creates the element on first use and copies `surface_scroll` onto it.
    pub fn render(&mut self, text: &str, surface_scroll: ScrollOffset) -> &OverlayElement {
        let markup = self.highlighter.highlight(text);
        self.renders += 1;
        debug!(
            render = self.renders,
            bytes = text.len(),
            lines = markup.source_lines(),
            created = self.element.is_none(),
            "overlay render"
        );
        self.element.insert(OverlayElement {
            markup,
            scroll: surface_scroll,
        })
    }

    /// Mirror the editable surface's scroll offsets onto the overlay.
    ///
    /// Returns `false` (and does nothing) when the overlay has not been
    /// created yet.
    pub fn sync_scroll(&mut self, surface_scroll: ScrollOffset) -> bool {
        match self.element.as_mut() {
            Some(element) => {
                trace!(top = surface_scroll.top, left = surface_scroll.left, "overlay scroll");
                element.scroll = surface_scroll;
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("highlighter", &self.highlighter)
            .field("element", &self.element)
            .field("renders", &self.renders)
            .finish()
    }
}
