//! Module `scanner` implements a one‑pass, streaming lexer for the Lox language.
//!
//! It transforms source text into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a
//! `FusedIterator`, it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &str) -> Scanner<'_>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields a `Token` on each `.next()`.  The scanner never fails: a malformed
//!   lexeme becomes an in‑band `ERROR` token carrying its diagnostic, and
//!   scanning resumes right after it, so one pass reports every lexical error.
//!
//! - `scan(src)` / `lexical_errors(tokens)`
//!   Convenience wrappers used by the pipeline.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `.`, `-`, `+`, `;`, `*`, `/`.
//! - Two‑character operators (longest match first): `!=`, `==`, `<=`, `>=`.
//! - String literals: `"` … `"`, multi‑line, raw (no escapes).
//! - Numeric literals: integer and optional fractional part.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash
//!   `KEYWORDS` map.
//!
//! # Example
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! for token in Scanner::new("print 123; // example") {
//!     println!("{}", token);
//! }
//! ```

use crate::error::LoxError;
use crate::token::{Span, Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    text: &'a str,              // entire source text
    src: &'a [u8],              // the same text as bytes
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    chars: usize,               // characters consumed so far
    line_start: usize,          // value of `chars` where the current line begins
    token_line: usize,          // line on which the current lexeme starts
    token_column: usize,        // column at which the current lexeme starts
    token_offset: usize,        // character offset at which the current lexeme starts
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    done: bool,                 // EOF already emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            chars: 0,
            line_start: 0,
            token_line: 1,
            token_column: 0,
            token_offset: 0,
            pending: None,
            done: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        if is_char_start(b) {
            self.chars += 1;
        }
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Record that a `\n` was just consumed.
    #[inline(always)]
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.chars;
    }

    /// Move the cursor forward to `to` without scanning the bytes between.
    fn skip_to(&mut self, to: usize) {
        self.chars += self.src[self.curr..to]
            .iter()
            .filter(|&&b| is_char_start(b))
            .count();
        self.curr = to;
    }

    /// Mark `self.curr` as the start of the next lexeme.
    fn begin_lexeme(&mut self) {
        self.start = self.curr;
        self.token_line = self.line;
        self.token_column = self.chars - self.line_start;
        self.token_offset = self.chars;
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  If it produces an
    /// actual token the kind is stored in `self.pending`; whitespace and
    /// comments leave `pending` empty.
    fn scan_token(&mut self) {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'*' => self.pending = Some(TokenType::STAR),

            // ── two‑character operators (!=, ==, <=, >=) ─────────────────
            b'!' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {}

            b'\n' => self.newline(),

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Fast‑forward to the next newline; the newline itself is
                    // consumed by the next call so line tracking stays in one place.
                    match memchr(b'\n', &self.src[self.curr..]) {
                        Some(pos) => self.skip_to(self.curr + pos),
                        None => self.skip_to(self.len()),
                    }

                    return;
                }

                self.pending = Some(TokenType::SLASH);
            }

            b'"' => self.parse_string(),

            b'0'..=b'9' => self.parse_number(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.parse_identifier(),

            // ── unexpected character ─────────────────────────────────────
            _ => {
                // Consume the whole character so multi‑byte input yields a
                // single diagnostic and lexemes stay on char boundaries.
                let ch: char = self.text[self.start..].chars().next().unwrap_or('\u{FFFD}');
                self.skip_to(self.start + ch.len_utf8());

                debug!("Unexpected character {:?} on line {}", ch, self.line);

                self.pending = Some(TokenType::ERROR(format!(
                    "Unexpected character '{}'.",
                    ch
                )));
            }
        }
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * On success `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.newline(); // multi‑line strings are allowed
            }
        }

        if self.is_at_end() {
            self.pending = Some(TokenType::ERROR("Unterminated string.".to_string()));
            return;
        }

        self.advance(); // consume closing quote

        // Quotes are ASCII, so both slice ends fall on char boundaries.
        let s: &str = &self.text[self.start + 1..self.curr - 1];
        self.pending = Some(TokenType::STRING(s.to_owned()));
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // A '.' only belongs to the number when a digit follows it.
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: &str = &self.text[self.start..self.curr];
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // only digits and one '.'
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }

    fn make_token(&self, tt: TokenType) -> Token {
        let span = Span {
            line: self.token_line,
            column: self.token_column,
            offset: self.token_offset,
            start: self.start,
            end: self.curr,
        };

        Token::new(tt, &self.text[self.start..self.curr], span)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Loop until we either emit a token or hit EOF.
        while !self.is_at_end() {
            self.begin_lexeme();
            self.pending = None;

            self.scan_token();

            if let Some(tt) = self.pending.take() {
                debug!("Scanned token ({:?}) on line {}", tt, self.token_line);

                return Some(self.make_token(tt));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        // Emit exactly one EOF then terminate.
        self.done = true;
        self.begin_lexeme();

        Some(self.make_token(TokenType::EOF))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// `false` for UTF‑8 continuation bytes.
#[inline(always)]
fn is_char_start(b: u8) -> bool {
    b & 0xC0 != 0x80
}

/// Scan `source` to completion.  The result always ends with `EOF`.
pub fn scan(source: &str) -> Vec<Token> {
    let tokens: Vec<Token> = Scanner::new(source).collect();

    info!("Scanned {} tokens", tokens.len());

    tokens
}

/// Collect the diagnostics carried by in‑band `ERROR` tokens, in source order.
pub fn lexical_errors(tokens: &[Token]) -> Vec<LoxError> {
    tokens
        .iter()
        .filter_map(|token| match &token.token_type {
            TokenType::ERROR(message) => Some(LoxError::lex(
                token.span.line,
                token.span.offset,
                message.clone(),
            )),
            _ => None,
        })
        .collect()
}
