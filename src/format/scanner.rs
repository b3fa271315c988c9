// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character scanning and two-token lookahead shared by both dialect front-ends.

use std::fmt;

use memchr::{memchr, memchr2};

/// A lexed token. `start..end` is the byte range in the source (quotes included for strings);
/// `literal` is the meaningful text (quotes stripped for strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a, K> {
    pub kind: K,
    pub literal: &'a str,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

pub(crate) trait TokenKind: Copy + PartialEq + fmt::Debug {
    const NEWLINE: Self;
    const EOF: Self;

    fn is_string(self) -> bool;
}

pub(crate) trait Tokenize<'a> {
    type Kind: TokenKind;

    fn next_token(&mut self) -> Token<'a, Self::Kind>;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Char-at-a-time cursor tracking line, column (1-based, in chars), and byte offset.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 1, column: 1, at_line_start: true }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// True while only inline whitespace has been seen on the current line.
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
            if !ch.is_whitespace() {
                self.at_line_start = false;
            }
        }
        Some(ch)
    }

    /// Advances over `len` bytes that are known not to contain a newline.
    pub fn advance(&mut self, len: usize) {
        let end = (self.pos + len).min(self.src.len());
        let skipped = &self.src[self.pos..end];
        self.column += skipped.chars().count();
        if skipped.chars().any(|ch| !ch.is_whitespace()) {
            self.at_line_start = false;
        }
        self.pos = end;
    }

    pub fn skip_inline_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || !ch.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    /// Moves to the next `\n` (not consumed) or to the end of input.
    pub fn skip_to_line_end(&mut self) {
        let rest = self.rest().as_bytes();
        let len = memchr(b'\n', rest).unwrap_or(rest.len());
        self.advance(len);
    }

    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Consumes a `"`-quoted string and returns its contents. An unterminated string ends at the
    /// line break (left unconsumed) or at the end of input.
    pub fn quoted(&mut self) -> &'a str {
        self.bump();
        let start = self.pos;
        let rest = self.rest().as_bytes();
        match memchr2(b'"', b'\n', rest) {
            Some(idx) if rest[idx] == b'"' => {
                self.advance(idx);
                let literal = &self.src[start..self.pos];
                self.bump();
                literal
            }
            Some(idx) => {
                self.advance(idx);
                &self.src[start..self.pos]
            }
            None => {
                self.advance(rest.len());
                &self.src[start..self.pos]
            }
        }
    }

    pub fn mark(&self) -> Mark {
        Mark { pos: self.pos, line: self.line, column: self.column }
    }

    pub fn token<K>(&self, kind: K, mark: Mark) -> Token<'a, K> {
        self.token_with_literal(kind, mark, &self.src[mark.pos..self.pos])
    }

    pub fn token_with_literal<K>(&self, kind: K, mark: Mark, literal: &'a str) -> Token<'a, K> {
        Token { kind, literal, line: mark.line, column: mark.column, start: mark.pos, end: self.pos }
    }
}

/// Characters allowed in bare identifiers of both dialects.
pub(crate) fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

/// Finds the longest table spelling that prefixes `rest`. Tables list longer spellings first.
pub(crate) fn longest_match<T: Copy>(rest: &str, table: &[(&'static str, T)]) -> Option<(usize, T)> {
    table
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, value)| (spelling.len(), *value))
}

/// Case-insensitive keyword lookup.
pub(crate) fn lookup_keyword<K: Copy>(word: &str, table: &[(&'static str, K)]) -> Option<K> {
    table.iter().find(|(keyword, _)| keyword.eq_ignore_ascii_case(word)).map(|(_, kind)| *kind)
}

/// Current + peek lookahead over a tokenizer, plus source slicing for free text.
pub(crate) struct TokenStream<'a, L: Tokenize<'a>> {
    lexer: L,
    source: &'a str,
    current: Token<'a, L::Kind>,
    peek: Token<'a, L::Kind>,
}

impl<'a, L: Tokenize<'a>> TokenStream<'a, L> {
    pub fn new(mut lexer: L, source: &'a str) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self { lexer, source, current, peek }
    }

    pub fn current(&self) -> Token<'a, L::Kind> {
        self.current
    }

    pub fn peek(&self) -> Token<'a, L::Kind> {
        self.peek
    }

    pub fn kind(&self) -> L::Kind {
        self.current.kind
    }

    pub fn at(&self, kind: L::Kind) -> bool {
        self.current.kind == kind
    }

    pub fn at_eof(&self) -> bool {
        self.current.kind == L::Kind::EOF
    }

    pub fn at_line_end(&self) -> bool {
        self.current.kind == L::Kind::NEWLINE || self.current.kind == L::Kind::EOF
    }

    pub fn advance(&mut self) -> Token<'a, L::Kind> {
        let consumed = self.current;
        self.current = self.peek;
        self.peek = self.lexer.next_token();
        consumed
    }

    pub fn eat(&mut self, kind: L::Kind) -> Option<Token<'a, L::Kind>> {
        self.at(kind).then(|| self.advance())
    }

    pub fn skip_newlines(&mut self) {
        while self.at(L::Kind::NEWLINE) {
            self.advance();
        }
    }

    /// Consumes the rest of the line (newline excluded) and returns its source text with
    /// leading/trailing whitespace dropped. A lone quoted string yields its unquoted contents.
    pub fn rest_of_line(&mut self) -> Option<String> {
        self.text_until(|_| false)
    }

    /// Like [`Self::rest_of_line`], but also stops before the first token matching `stop`.
    pub fn text_until(&mut self, stop: impl Fn(&Self) -> bool) -> Option<String> {
        let first = self.current;
        let mut last_end = first.start;
        let mut count = 0usize;
        while !self.at_line_end() && !stop(self) {
            last_end = self.advance().end;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        if count == 1 && first.kind.is_string() {
            return Some(first.literal.to_owned());
        }
        let text = self.source[first.start..last_end].trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    /// Consumes whole lines until `stop` matches the first token of a line (that token is left
    /// current) or input ends. Returns the exact source between the first and last consumed
    /// tokens, inner line breaks and indentation included.
    pub fn lines_until(&mut self, stop: impl Fn(&Self) -> bool) -> Option<String> {
        let mut first_start: Option<usize> = None;
        let mut last_end = 0usize;
        let mut line_start = true;
        while !self.at_eof() {
            if line_start && stop(self) {
                break;
            }
            let token = self.advance();
            line_start = token.kind == L::Kind::NEWLINE;
            if !line_start {
                if first_start.is_none() {
                    first_start = Some(token.start);
                }
                last_end = token.end;
            }
        }
        let start = first_start?;
        Some(self.source[start..last_end].to_owned())
    }

    /// Consumes tokens up to (not including) the line break; returns the consumed byte range.
    pub fn skip_line(&mut self) -> Option<(usize, usize)> {
        let start = self.current.start;
        let mut end = None;
        while !self.at_line_end() {
            end = Some(self.advance().end);
        }
        end.map(|end| (start, end))
    }
}
