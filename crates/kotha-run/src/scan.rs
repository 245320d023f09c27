#![forbid(unsafe_code)]

//! Static count of input call sites.
//!
//! The count is a syntactic estimate: every `nao (` occurrence counts once,
//! reachable or not, including `banao(`. [`ScanMode::CodeOnly`] additionally skips occurrences
//! inside string literals and comments.

use kotha_syntax::{KothaTokenizer, TokenKind, Tokenizer, is_word_byte};

/// Name of the input-reading call.
pub const DEFAULT_INPUT_CALL: &str = "nao";

/// How call sites are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Every occurrence of the call name followed by optional whitespace and
    /// `(`, even as the tail of a longer word (`banao(` counts).
    #[default]
    Syntactic,
    /// Call name at an identifier start only, ignoring occurrences inside
    /// strings and comments.
    CodeOnly,
}

impl ScanMode {
    /// Parse `syntactic` or `code-only` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "syntactic" => Some(Self::Syntactic),
            "code-only" | "code_only" | "codeonly" => Some(Self::CodeOnly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntactic => "syntactic",
            Self::CodeOnly => "code-only",
        }
    }
}

/// Counts input call sites in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScanner {
    call_name: String,
    mode: ScanMode,
}

impl Default for InputScanner {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_CALL, ScanMode::Syntactic)
    }
}

impl InputScanner {
    pub fn new(call_name: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            call_name: call_name.into(),
            mode,
        }
    }

    #[must_use]
    pub fn call_name(&self) -> &str {
        &self.call_name
    }

    #[must_use]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Number of call sites in `source`.
    #[must_use]
    pub fn count(&self, source: &str) -> usize {
        if self.call_name.is_empty() {
            return 0;
        }
        let excluded = match self.mode {
            ScanMode::Syntactic => Vec::new(),
            ScanMode::CodeOnly => KothaTokenizer::default()
                .tokenize(source)
                .into_iter()
                .filter(|t| matches!(t.kind, TokenKind::String | TokenKind::Comment))
                .map(|t| t.range)
                .collect(),
        };
        source
            .match_indices(self.call_name.as_str())
            .filter(|(start, _)| self.is_call_site(source, *start))
            .filter(|(start, _)| !excluded.iter().any(|r| r.contains(start)))
            .count()
    }

    fn is_call_site(&self, source: &str, start: usize) -> bool {
        let bytes = source.as_bytes();
        if self.mode == ScanMode::CodeOnly && start > 0 && is_word_byte(bytes[start - 1]) {
            return false;
        }
        source[start + self.call_name.len()..]
            .trim_start()
            .starts_with('(')
    }
}
