#![forbid(unsafe_code)]

//! Highlight markup generation.
//!
//! Converts a token partition into the inner HTML of the overlay element:
//! plain tokens are emitted as escaped text, every other token is wrapped in
//! a `<span>` carrying its category class. A trailing line break is always
//! appended so the overlay's scroll height never falls short of the editable
//! surface.
//!
//! The markup never changes the character geometry of the source: stripping
//! the tags and decoding the entities gives back the source text followed by
//! one newline (see [`HighlightMarkup::visible_text`]).

use kotha_syntax::{Token, TokenKind};

/// Line break appended after the highlighted source.
pub const TRAILING_LINE: &str = "<br/>";

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// HTML-escape a string into the output buffer.
pub fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape a string.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html_into(&mut out, s);
    out
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Maps token categories to CSS classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightTheme {
    /// Prefix prepended to every category class (empty by default, matching
    /// the stock stylesheet's `.comment`, `.string`, ... rules).
    pub class_prefix: String,
}

impl HighlightTheme {
    /// Theme with the given class prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            class_prefix: prefix.into(),
        }
    }

    /// CSS class for a token kind, or `None` for plain text.
    #[must_use]
    pub fn class_for(&self, kind: TokenKind) -> Option<String> {
        kind.css_class()
            .map(|class| format!("{}{}", self.class_prefix, class))
    }
}

// ---------------------------------------------------------------------------
// HighlightMarkup
// ---------------------------------------------------------------------------

/// Rendered overlay markup for one version of the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMarkup {
    html: String,
    source_lines: usize,
}

impl HighlightMarkup {
    /// The inner HTML for the overlay element.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume the markup, returning the HTML string.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    /// Number of lines in the source this markup was rendered from.
    #[must_use]
    pub fn source_lines(&self) -> usize {
        self.source_lines
    }

    /// Number of lines the overlay lays out (source lines plus the trailing
    /// line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.source_lines + 1
    }

    /// Text as the browser would lay it out: tags removed, `<br/>` turned
    /// into a newline and entities decoded.
    #[must_use]
    pub fn visible_text(&self) -> String {
        let mut out = String::with_capacity(self.html.len());
        let mut rest = self.html.as_str();
        while let Some(c) = rest.chars().next() {
            match c {
                '<' => {
                    let close = rest.find('>').map_or(rest.len(), |i| i + 1);
                    if rest[..close].starts_with("<br") {
                        out.push('\n');
                    }
                    rest = &rest[close..];
                }
                '&' => {
                    let (decoded, len) = decode_entity(rest);
                    out.push(decoded);
                    rest = &rest[len..];
                }
                _ => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        out
    }
}

fn decode_entity(s: &str) -> (char, usize) {
    for (entity, c) in [("&lt;", '<'), ("&gt;", '>'), ("&amp;", '&'), ("&quot;", '"')] {
        if s.starts_with(entity) {
            return (c, entity.len());
        }
    }
    ('&', 1)
}

/// Render tokens over `source` into overlay markup.
///
/// `tokens` must partition `source`; any gaps are emitted as plain text so a
/// faulty tokenizer can degrade the colors but never the geometry.
#[must_use]
pub fn render_markup(source: &str, tokens: &[Token], theme: &HighlightTheme) -> HighlightMarkup {
    let mut html = String::with_capacity(source.len() + tokens.len() * 24 + TRAILING_LINE.len());
    let mut last_end = 0;

    for token in tokens {
        if token.range.start < last_end {
            continue;
        }
        // Fill gaps between tokens with unstyled text
        if token.range.start > last_end
            && let Some(gap) = source.get(last_end..token.range.start)
        {
            escape_html_into(&mut html, gap);
        }
        let Some(text) = source.get(token.range.clone()) else {
            continue;
        };
        match theme.class_for(token.kind) {
            Some(class) => {
                html.push_str("<span class=\"");
                escape_html_into(&mut html, &class);
                html.push_str("\">");
                escape_html_into(&mut html, text);
                html.push_str("</span>");
            }
            None => escape_html_into(&mut html, text),
        }
        last_end = token.range.end;
    }

    // Trailing text after last token
    if last_end < source.len()
        && let Some(tail) = source.get(last_end..)
    {
        escape_html_into(&mut html, tail);
    }

    html.push_str(TRAILING_LINE);

    HighlightMarkup {
        html,
        source_lines: source.split('\n').count(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
