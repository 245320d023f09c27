#![forbid(unsafe_code)]

//! Tokenization for Kotha source highlighting.
//!
//! The token model partitions a source string into classified byte ranges:
//! every byte belongs to exactly one [`Token`], tokens are ordered, and the
//! concatenation of their texts reproduces the source. [`validate_coverage`]
//! checks that contract and is used by the highlighter in debug builds.
//!
//! [`KothaTokenizer`] is a single left-to-right lexer. Because each position
//! is claimed once, a keyword or operator inside a string or comment can
//! never be re-classified.
//!
//! # Example
//!
//! ```
//! use kotha_syntax::{KothaTokenizer, TokenKind, Tokenizer};
//!
//! let tokenizer = KothaTokenizer::default();
//! let tokens = tokenizer.tokenize("dhoro x = 10;");
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! ```

mod lexer;

pub use lexer::{KOTHA_KEYWORDS, KothaTokenizer, LexerConfig, OPERATOR_BYTES, is_word_byte};

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Token kinds
// ---------------------------------------------------------------------------

/// Highlight category of a token.
///
/// Categories are mutually exclusive per character position.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    String,
    Number,
    Keyword,
    Operator,
    /// Everything else: identifiers, whitespace, punctuation.
    Plain,
}

impl TokenKind {
    /// CSS class used by the overlay stylesheet, or `None` for plain text.
    #[must_use]
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Comment => Some("comment"),
            Self::String => Some("string"),
            Self::Number => Some("number"),
            Self::Keyword => Some("keyword"),
            Self::Operator => Some("operator"),
            Self::Plain => None,
        }
    }

    /// Whether this kind is rendered without markup.
    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A classified span of source text.
///
/// Ranges are byte offsets into the source and always fall on UTF-8
/// character boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

impl Token {
    /// Create a token. Panics in debug builds if the range is inverted.
    pub fn new(kind: TokenKind, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "token range must be ordered");
        Self { kind, range }
    }

    /// Token length in bytes.
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Whether the token is empty.
    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }

    /// Extract the token's text from a source string.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

// ---------------------------------------------------------------------------
// Tokenizer trait
// ---------------------------------------------------------------------------

/// Whole-text tokenizer abstraction.
///
/// Implementations must return a sequence that passes
/// [`validate_coverage`] for every input, and must be deterministic: the
/// same text always yields the same tokens.
pub trait Tokenizer: Send + Sync {
    /// Human-readable name (e.g., "Kotha").
    fn name(&self) -> &'static str;

    /// File extensions this tokenizer handles (without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Tokenize a full text buffer.
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

// ---------------------------------------------------------------------------
// PlainTokenizer
// ---------------------------------------------------------------------------

/// Fallback tokenizer that classifies the whole text as [`TokenKind::Plain`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn name(&self) -> &'static str {
        "Plain"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        vec![Token::new(TokenKind::Plain, 0..text.len())]
    }
}

// ---------------------------------------------------------------------------
// TokenizerRegistry
// ---------------------------------------------------------------------------

/// Registry for looking up tokenizers by file extension or name.
#[derive(Default)]
pub struct TokenizerRegistry {
    tokenizers: Vec<Arc<dyn Tokenizer>>,
    by_extension: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl TokenizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the Kotha tokenizer and the plain fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(KothaTokenizer::default()));
        registry.register(Box::new(PlainTokenizer));
        registry
    }

    /// Register a tokenizer. Later registrations for the same extension or
    /// name override earlier ones.
    pub fn register(&mut self, tokenizer: Box<dyn Tokenizer>) {
        let tokenizer: Arc<dyn Tokenizer> = Arc::from(tokenizer);
        let index = self.tokenizers.len();
        self.by_name
            .insert(tokenizer.name().to_ascii_lowercase(), index);
        for ext in tokenizer.extensions() {
            let key = ext.trim_start_matches('.').to_ascii_lowercase();
            if !key.is_empty() {
                self.by_extension.insert(key, index);
            }
        }
        self.tokenizers.push(tokenizer);
    }

    /// Look up a tokenizer by file extension (case-insensitive, dot optional).
    pub fn for_extension(&self, ext: &str) -> Option<Arc<dyn Tokenizer>> {
        let key = ext.trim_start_matches('.').to_ascii_lowercase();
        let index = self.by_extension.get(&key)?;
        self.tokenizers.get(*index).cloned()
    }

    /// Look up a tokenizer by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Tokenizer>> {
        let key = name.to_ascii_lowercase();
        let index = self.by_name.get(&key)?;
        self.tokenizers.get(*index).cloned()
    }

    /// Look up the tokenizer for a file name such as `game.kotha`.
    pub fn for_filename(&self, filename: &str) -> Option<Arc<dyn Tokenizer>> {
        let (_, ext) = filename.rsplit_once('.')?;
        self.for_extension(ext)
    }

    /// Number of registered tokenizers.
    pub fn len(&self) -> usize {
        self.tokenizers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tokenizers.is_empty()
    }

    /// Get all registered tokenizer names.
    pub fn names(&self) -> Vec<&str> {
        self.tokenizers.iter().map(|t| t.name()).collect()
    }
}

impl std::fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizerRegistry")
            .field("tokenizers", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that all token ranges are in-bounds and non-overlapping.
pub fn validate_tokens(source: &str, tokens: &[Token]) -> bool {
    let len = source.len();
    let mut prev_end = 0;
    for token in tokens {
        if token.range.start > token.range.end {
            return false;
        }
        if token.range.end > len {
            return false;
        }
        if token.range.start < prev_end {
            return false; // overlapping
        }
        prev_end = token.range.end;
    }
    true
}

/// Validate that tokens exactly partition `source`.
///
/// Holds when tokens are non-empty, contiguous from `0` to `source.len()`,
/// and every boundary is a UTF-8 character boundary (so concatenating the
/// token texts reproduces the source).
pub fn validate_coverage(source: &str, tokens: &[Token]) -> bool {
    let mut expected_start = 0;
    for token in tokens {
        if token.is_empty() || token.range.start != expected_start {
            return false;
        }
        if token.range.end > source.len() || !source.is_char_boundary(token.range.end) {
            return false;
        }
        expected_start = token.range.end;
    }
    expected_start == source.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
