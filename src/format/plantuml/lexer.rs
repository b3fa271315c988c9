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
    /// `#name` or `#hex`; the literal keeps the `#`.
    Color,
    Arrow(MessageStyle),
    /// `<-` / `<--`: the target is written first.
    ReverseArrow(MessageStyle),
    LBracket,
    RBracket,
    PlusPlus,
    MinusMinus,
    Colon,
    Comma,
    DoubleEq,
    Ellipsis,
    Gap,
    Unknown,

    StartUml,
    EndUml,
    Title,
    Declare(ParticipantKind),
    As,
    Create,
    Destroy,
    Note,
    EndNote,
    Left,
    Right,
    Of,
    Over,
    Ref,
    Activate,
    Deactivate,
    Open(FragmentOperator),
    Else,
    Box,
    End,
    Directive,
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

/// Forward arrows, longest spelling first.
pub(crate) const ARROWS: &[(&str, MessageStyle)] = &[
    ("-->>", style(LineStyle::Dotted, ArrowHead::Open)),
    ("-->x", style(LineStyle::Dotted, ArrowHead::Cross)),
    ("-->", style(LineStyle::Dotted, ArrowHead::Arrow)),
    ("--\\", style(LineStyle::Dotted, ArrowHead::Async)),
    ("->>", style(LineStyle::Solid, ArrowHead::Open)),
    ("->x", style(LineStyle::Solid, ArrowHead::Cross)),
    ("->", style(LineStyle::Solid, ArrowHead::Arrow)),
    ("-\\", style(LineStyle::Solid, ArrowHead::Async)),
];

const REVERSE_ARROWS: &[(&str, MessageStyle)] = &[
    ("<--", style(LineStyle::Dotted, ArrowHead::Arrow)),
    ("<-", style(LineStyle::Solid, ArrowHead::Arrow)),
];

const PUNCTUATION: &[(&str, Tok)] = &[
    ("++", Tok::PlusPlus),
    ("--", Tok::MinusMinus),
    ("==", Tok::DoubleEq),
    ("...", Tok::Ellipsis),
    ("|||", Tok::Gap),
    ("[", Tok::LBracket),
    ("]", Tok::RBracket),
    (":", Tok::Colon),
    (",", Tok::Comma),
];

const KEYWORDS: &[(&str, Tok)] = &[
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
    ("hnote", Tok::Note),
    ("rnote", Tok::Note),
    ("endnote", Tok::EndNote),
    ("left", Tok::Left),
    ("right", Tok::Right),
    ("of", Tok::Of),
    ("over", Tok::Over),
    ("ref", Tok::Ref),
    ("activate", Tok::Activate),
    ("deactivate", Tok::Deactivate),
    ("alt", Tok::Open(FragmentOperator::Alt)),
    ("opt", Tok::Open(FragmentOperator::Opt)),
    ("loop", Tok::Open(FragmentOperator::Loop)),
    ("par", Tok::Open(FragmentOperator::Par)),
    ("critical", Tok::Open(FragmentOperator::Critical)),
    ("break", Tok::Open(FragmentOperator::Break)),
    ("group", Tok::Open(FragmentOperator::Rect)),
    ("else", Tok::Else),
    ("box", Tok::Box),
    ("end", Tok::End),
    ("autonumber", Tok::Directive),
    ("autoactivate", Tok::Directive),
    ("hide", Tok::Directive),
    ("show", Tok::Directive),
    ("skinparam", Tok::Directive),
    ("return", Tok::Directive),
    ("newpage", Tok::Directive),
];

const AT_KEYWORDS: &[(&str, Tok)] = &[("startuml", Tok::StartUml), ("enduml", Tok::EndUml)];

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

    /// Skips `'` line comments and `/' … '/` block comments that open a line.
    fn skip_comment(&mut self) -> bool {
        if !self.scanner.at_line_start() {
            return false;
        }
        if self.scanner.starts_with("'") {
            self.scanner.skip_to_line_end();
            return true;
        }
        if self.scanner.starts_with("/'") {
            self.scanner.advance(2);
            while !self.scanner.is_eof() && !self.scanner.starts_with("'/") {
                self.scanner.bump();
            }
            if !self.scanner.is_eof() {
                self.scanner.advance(2);
            }
            return true;
        }
        false
    }
}

impl<'a> Tokenize<'a> for Lexer<'a> {
    type Kind = Tok;

    fn next_token(&mut self) -> Token<'a, Tok> {
        loop {
            self.scanner.skip_inline_whitespace();
            if !self.skip_comment() {
                break;
            }
        }

        let mark = self.scanner.mark();
        let Some(ch) = self.scanner.peek() else {
            return self.scanner.token(Tok::Eof, mark);
        };

        let rest = self.scanner.rest();
        if let Some((len, style)) = longest_match(rest, ARROWS) {
            self.scanner.advance(len);
            return self.scanner.token(Tok::Arrow(style), mark);
        }
        if let Some((len, style)) = longest_match(rest, REVERSE_ARROWS) {
            self.scanner.advance(len);
            return self.scanner.token(Tok::ReverseArrow(style), mark);
        }
        if let Some((len, kind)) = longest_match(rest, PUNCTUATION) {
            self.scanner.advance(len);
            return self.scanner.token(kind, mark);
        }

        match ch {
            '\n' => {
                self.scanner.bump();
                self.scanner.token(Tok::Newline, mark)
            }
            '"' => {
                let literal = self.scanner.quoted();
                self.scanner.token_with_literal(Tok::Str, mark, literal)
            }
            '#' => {
                self.scanner.bump();
                self.scanner.eat_while(|c| c.is_ascii_alphanumeric());
                self.scanner.token(Tok::Color, mark)
            }
            '@' => {
                self.scanner.bump();
                let word = self.scanner.eat_while(is_ident_char);
                let kind = lookup_keyword(word, AT_KEYWORDS).unwrap_or(Tok::Unknown);
                self.scanner.token(kind, mark)
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
