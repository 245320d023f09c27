#![forbid(unsafe_code)]

//! Highlight rendering for the Kotha editor.
//!
//! The editable surface stays plain text; colors come from a second element
//! laid exactly underneath it. [`Highlighter`] turns source text into that
//! element's markup, [`Overlay`] owns the element and mirrors the surface's
//! scroll offsets, and [`LineGutter`] keeps the line numbers in step.
//!
//! Every render re-tokenizes the whole text. The markup preserves character
//! geometry, so the overlay lines up with the surface glyph for glyph.

pub mod gutter;
pub mod markup;
pub mod overlay;

pub use gutter::{CursorPosition, LineGutter};
pub use markup::{
    HighlightMarkup, HighlightTheme, TRAILING_LINE, escape_html, escape_html_into, render_markup,
};
pub use overlay::{Overlay, OverlayElement, ScrollOffset};

use std::sync::Arc;

use kotha_syntax::{KothaTokenizer, PlainTokenizer, Token, Tokenizer, TokenizerRegistry};

/// Tokenizer plus class theme.
///
/// `highlight` is a pure function of the text: calling it twice on the same
/// input yields identical markup.
#[derive(Clone)]
pub struct Highlighter {
    tokenizer: Arc<dyn Tokenizer>,
    theme: HighlightTheme,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(Arc::new(KothaTokenizer::default()), HighlightTheme::default())
    }
}

impl Highlighter {
    #[must_use]
    pub fn new(tokenizer: Arc<dyn Tokenizer>, theme: HighlightTheme) -> Self {
        Self { tokenizer, theme }
    }

    /// Highlighter for `filename`, falling back to plain text when the
    /// registry has no tokenizer for its extension.
    #[must_use]
    pub fn for_file(registry: &TokenizerRegistry, filename: &str, theme: HighlightTheme) -> Self {
        let tokenizer = registry
            .for_filename(filename)
            .unwrap_or_else(|| Arc::new(PlainTokenizer) as Arc<dyn Tokenizer>);
        Self::new(tokenizer, theme)
    }

    /// Name of the active tokenizer.
    #[must_use]
    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    #[must_use]
    pub fn theme(&self) -> &HighlightTheme {
        &self.theme
    }

    /// Token partition of `text`.
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let tokens = self.tokenizer.tokenize(text);
        debug_assert!(
            kotha_syntax::validate_coverage(text, &tokens),
            "tokenizer {} broke the partition",
            self.tokenizer.name()
        );
        tokens
    }

    /// Render `text` into overlay markup.
    #[must_use]
    pub fn highlight(&self, text: &str) -> HighlightMarkup {
        render_markup(text, &self.tokens(text), &self.theme)
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("tokenizer", &self.tokenizer.name())
            .field("theme", &self.theme)
            .finish()
    }
}
