// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::format::scanner::{
    is_ident_char, longest_match, lookup_keyword, Scanner, Token, TokenKind, Tokenize,
};
use crate::model::{ArrowHead, FragmentOperator, LineStyle, MessageStyle, ParticipantKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tok {
    Newline,
    Eof,
    Ident,
    Str,
    Arrow(MessageStyle),
    Plus,
    Minus,
    Colon,
    Comma,
    Unknown,

    Header,
    Title,
    Declare(ParticipantKind),
    As,
    Create,
    Destroy,
    Note,
    Left,
    Right,
    Of,
    Over,
    Activate,
    Deactivate,
    Open(FragmentOperator),
    Else,
    And,
    Option,
    Box,
    End,
    Autonumber,
}

impl TokenKind for Tok {
    const NEWLINE: Self = Tok::Newline;
    const EOF: Self = Tok::Eof;

    fn is_string(self) -> bool {
        self == Tok::Str
    }
}

const fn style(line: LineStyle, head: ArrowHead) -> MessageStyle {
    MessageStyle::new(line, head)
}

/// Message arrows, longest spelling first: 4-, then 3-, then 2-character forms.
pub(crate) const ARROWS: &[(&str, MessageStyle)] = &[
    ("-->>", style(LineStyle::Dotted, ArrowHead::Arrow)),
    ("->>", style(LineStyle::Solid, ArrowHead::Arrow)),
    ("-->", style(LineStyle::Dotted, ArrowHead::Open)),
    ("--x", style(LineStyle::Dotted, ArrowHead::Cross)),
    ("--)", style(LineStyle::Dotted, ArrowHead::Async)),
    ("->", style(LineStyle::Solid, ArrowHead::Open)),
    ("-x", style(LineStyle::Solid, ArrowHead::Cross)),
    ("-)", style(LineStyle::Solid, ArrowHead::Async)),
];

const KEYWORDS: &[(&str, Tok)] = &[
    ("sequenceDiagram", Tok::Header),
    ("title", Tok::Title),
    ("participant", Tok::Declare(ParticipantKind::Participant)),
    ("actor", Tok::Declare(ParticipantKind::Actor)),
    ("database", Tok::Declare(ParticipantKind::Database)),
    ("boundary", Tok::Declare(ParticipantKind::Boundary)),
    ("control", Tok::Declare(ParticipantKind::Control)),
    ("entity", Tok::Declare(ParticipantKind::Entity)),
    ("collections", Tok::Declare(ParticipantKind::Collection)),
    ("queue", Tok::Declare(ParticipantKind::Queue)),
    ("as", Tok::As),
    ("create", Tok::Create),
    ("destroy", Tok::Destroy),
    ("note", Tok::Note),
    ("left", Tok::Left),
    ("right", Tok::Right),
    ("of", Tok::Of),
    ("over", Tok::Over),
    ("activate", Tok::Activate),
    ("deactivate", Tok::Deactivate),
    ("alt", Tok::Open(FragmentOperator::Alt)),
    ("opt", Tok::Open(FragmentOperator::Opt)),
    ("loop", Tok::Open(FragmentOperator::Loop)),
    ("par", Tok::Open(FragmentOperator::Par)),
    ("critical", Tok::Open(FragmentOperator::Critical)),
    ("break", Tok::Open(FragmentOperator::Break)),
    ("rect", Tok::Open(FragmentOperator::Rect)),
    ("else", Tok::Else),
    ("and", Tok::And),
    ("option", Tok::Option),
    ("box", Tok::Box),
    ("end", Tok::End),
    ("autonumber", Tok::Autonumber),
];

pub(crate) fn is_keyword(word: &str) -> bool {
    lookup_keyword(word, KEYWORDS).is_some()
}

pub(crate) struct Lexer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { scanner: Scanner::new(source) }
    }
}

impl<'a> Tokenize<'a> for Lexer<'a> {
    type Kind = Tok;

    fn next_token(&mut self) -> Token<'a, Tok> {
        loop {
            self.scanner.skip_inline_whitespace();
            // `%%` comments only count at the start of a line; mid-line they are message text.
            if self.scanner.at_line_start() && self.scanner.starts_with("%%") {
                self.scanner.skip_to_line_end();
                continue;
            }
            break;
        }

        let mark = self.scanner.mark();
        let Some(ch) = self.scanner.peek() else {
            return self.scanner.token(Tok::Eof, mark);
        };

        match ch {
            '\n' => {
                self.scanner.bump();
                self.scanner.token(Tok::Newline, mark)
            }
            '"' => {
                let literal = self.scanner.quoted();
                self.scanner.token_with_literal(Tok::Str, mark, literal)
            }
            '-' => {
                if let Some((len, style)) = longest_match(self.scanner.rest(), ARROWS) {
                    self.scanner.advance(len);
                    return self.scanner.token(Tok::Arrow(style), mark);
                }
                self.scanner.bump();
                self.scanner.token(Tok::Minus, mark)
            }
            '+' => {
                self.scanner.bump();
                self.scanner.token(Tok::Plus, mark)
            }
            ':' => {
                self.scanner.bump();
                self.scanner.token(Tok::Colon, mark)
            }
            ',' => {
                self.scanner.bump();
                self.scanner.token(Tok::Comma, mark)
            }
            ch if is_ident_char(ch) => {
                let word = self.scanner.eat_while(is_ident_char);
                let kind = lookup_keyword(word, KEYWORDS).unwrap_or(Tok::Ident);
                self.scanner.token(kind, mark)
            }
            _ => {
                self.scanner.bump();
                self.scanner.token(Tok::Unknown, mark)
            }
        }
    }
}
