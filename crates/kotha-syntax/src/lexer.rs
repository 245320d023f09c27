//! Single-pass Kotha lexer.

use crate::{Token, TokenKind, Tokenizer};

/// Reserved words highlighted as [`TokenKind::Keyword`].
///
/// Includes the language keywords plus the builtin names the IDE treats as
/// reserved (string/file library calls, game and model helpers).
pub const KOTHA_KEYWORDS: &[&str] = &[
    "dhoro", "sthir", "kaj", "ferot", "jodi", "noyto", "othoba", "cholbe", "jotokkhon", "theke",
    "porjonto", "dekhaw", "nao", "talika", "new", "try", "catch", "finally", "throw", "model",
    "shikha", "bhabisyot", "drishti", "dhata", "chhobi", "rakhaw", "load", "khela", "sprite",
    "chitro", "random", "porishkar", "wait", "function", "main", "void", "include", "songjukto",
    "kotha_strlen", "kotha_strcat", "kotha_strcmp", "kotha_strcpy", "kotha_substr",
    "kotha_toupper", "kotha_tolower", "kotha_reverse", "kotha_fopen", "kotha_fclose",
    "kotha_fread", "kotha_fwrite", "kotha_fexists", "kotha_fsize", "kotha_fdelete",
    "kotha_frename",
];

/// Bytes that form operator runs.
pub const OPERATOR_BYTES: &[u8] = b"+-*/%=<>!&|";

/// Whether `b` can be part of a word (identifier, keyword or number).
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ---------------------------------------------------------------------------
// LexerConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`KothaTokenizer`].
#[derive(Debug, Clone, Copy)]
pub struct LexerConfig {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub operators: &'static [u8],
    pub line_comment: &'static str,
    pub block_comment_start: &'static str,
    pub block_comment_end: &'static str,
}

impl LexerConfig {
    /// The Kotha language configuration.
    pub const fn kotha() -> Self {
        Self {
            name: "Kotha",
            extensions: &["kotha"],
            keywords: KOTHA_KEYWORDS,
            operators: OPERATOR_BYTES,
            line_comment: "//",
            block_comment_start: "/*",
            block_comment_end: "*/",
        }
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self::kotha()
    }
}

// ---------------------------------------------------------------------------
// KothaTokenizer
// ---------------------------------------------------------------------------

/// Left-to-right lexer producing a total, non-overlapping token partition.
///
/// At each position the first matching rule wins:
/// 1. line comment (`//` to end of line) or block comment (`/* ... */`)
/// 2. double-quoted string with backslash escapes
/// 3. number (`digits[.digits]` as a whole word)
/// 4. reserved word (whole word)
/// 5. operator run
/// 6. plain text
///
/// Unterminated strings and block comments extend to the end of the text.
/// Consecutive plain characters are merged into a single token.
#[derive(Debug, Clone, Copy, Default)]
pub struct KothaTokenizer {
    config: LexerConfig,
}

impl KothaTokenizer {
    /// Create a tokenizer with the given configuration.
    pub const fn new(config: LexerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Whether `word` is a reserved word.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.config.keywords.contains(&word)
    }

    fn is_operator_byte(&self, b: u8) -> bool {
        self.config.operators.contains(&b)
    }

    fn starts_comment(&self, rest: &str) -> bool {
        (!self.config.line_comment.is_empty() && rest.starts_with(self.config.line_comment))
            || (!self.config.block_comment_start.is_empty()
                && rest.starts_with(self.config.block_comment_start))
    }

    /// Scan a comment starting at `pos`, if one starts there.
    fn scan_comment(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = &text[pos..];
        if !self.config.line_comment.is_empty() && rest.starts_with(self.config.line_comment) {
            let len = rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len());
            return Some(pos + len);
        }
        if !self.config.block_comment_start.is_empty()
            && rest.starts_with(self.config.block_comment_start)
        {
            let after_open = pos + self.config.block_comment_start.len();
            let end = match text[after_open..].find(self.config.block_comment_end) {
                Some(offset) => after_open + offset + self.config.block_comment_end.len(),
                None => text.len(),
            };
            return Some(end);
        }
        None
    }

    /// Scan a string literal starting at `pos` (the opening quote).
    ///
    /// A backslash consumes the following character, whatever it is.
    fn scan_string(&self, text: &str, pos: usize) -> usize {
        let bytes = text.as_bytes();
        let mut end = pos + 1;
        while end < bytes.len() {
            match bytes[end] {
                b'\\' => {
                    let escaped = text[end + 1..].chars().next().map_or(0, char::len_utf8);
                    end += 1 + escaped;
                }
                b'"' => return end + 1,
                _ => end += 1,
            }
        }
        text.len()
    }

    /// Scan the word at `pos` and classify it.
    fn scan_word(&self, text: &str, pos: usize) -> (TokenKind, usize) {
        let bytes = text.as_bytes();
        let end = word_end(bytes, pos);
        let word = &text[pos..end];

        if word.bytes().all(|b| b.is_ascii_digit()) {
            // Optional fraction: `.` followed by another all-digit word.
            if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
                let frac_end = word_end(bytes, end + 1);
                if bytes[end + 1..frac_end].iter().all(u8::is_ascii_digit) {
                    return (TokenKind::Number, frac_end);
                }
            }
            return (TokenKind::Number, end);
        }

        if self.is_keyword(word) {
            (TokenKind::Keyword, end)
        } else {
            (TokenKind::Plain, end)
        }
    }

    /// Scan an operator run, stopping before any comment opener.
    fn scan_operator(&self, text: &str, pos: usize) -> usize {
        let bytes = text.as_bytes();
        let mut end = pos + 1;
        while end < bytes.len() && self.is_operator_byte(bytes[end]) {
            if self.starts_comment(&text[end..]) {
                break;
            }
            end += 1;
        }
        end
    }
}

fn word_end(bytes: &[u8], pos: usize) -> usize {
    let mut end = pos;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Append a token, merging adjacent plain spans.
fn push_token(tokens: &mut Vec<Token>, kind: TokenKind, start: usize, end: usize) {
    if start == end {
        return;
    }
    if kind == TokenKind::Plain
        && let Some(last) = tokens.last_mut()
        && last.kind == TokenKind::Plain
        && last.range.end == start
    {
        last.range.end = end;
        return;
    }
    tokens.push(Token::new(kind, start..end));
}

impl Tokenizer for KothaTokenizer {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.config.extensions
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let bytes = text.as_bytes();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let ch = bytes[pos];

            if let Some(end) = self.scan_comment(text, pos) {
                push_token(&mut tokens, TokenKind::Comment, pos, end);
                pos = end;
                continue;
            }

            if ch == b'"' {
                let end = self.scan_string(text, pos);
                push_token(&mut tokens, TokenKind::String, pos, end);
                pos = end;
                continue;
            }

            if is_word_byte(ch) {
                let (kind, end) = self.scan_word(text, pos);
                push_token(&mut tokens, kind, pos, end);
                pos = end;
                continue;
            }

            if self.is_operator_byte(ch) {
                let end = self.scan_operator(text, pos);
                push_token(&mut tokens, TokenKind::Operator, pos, end);
                pos = end;
                continue;
            }

            // Advance by full UTF-8 character width, not just one byte.
            let char_len = text[pos..].chars().next().map_or(1, char::len_utf8);
            push_token(&mut tokens, TokenKind::Plain, pos, pos + char_len);
            pos += char_len;
        }

        tokens
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
