// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::lexer::{Lexer, Tok};
use crate::format::builder::{AstBuilder, ParseOutput};
use crate::format::scanner::TokenStream;
use crate::format::ParseError;
use crate::model::{
    Activation, ActivationAction, Dialect, FragmentBranch, FragmentOperator, MessageKind,
    MessageLifecycle, NotePosition, ParticipantId, ParticipantKind, SequenceAst, SequenceEvent,
    SequenceFragment, SequenceMessage, SequenceNote,
};

const FRAGMENT_STOPS: &[Tok] = &[Tok::Else, Tok::And, Tok::Option, Tok::End];
const BOX_STOPS: &[Tok] = &[Tok::End];

/// CSS color keywords recognized as the leading word of a `box` header.
const NAMED_COLORS: &[&str] = &[
    "aqua", "aquamarine", "azure", "beige", "black", "blue", "brown", "coral", "crimson", "cyan",
    "gold", "gray", "green", "grey", "indigo", "ivory", "khaki", "lavender", "lightblue",
    "lightgray", "lightgreen", "lightgrey", "lightyellow", "lime", "magenta", "maroon", "navy",
    "olive", "orange", "orchid", "pink", "plum", "purple", "red", "salmon", "silver", "tan",
    "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat", "white", "yellow",
];

/// Parse Mermaid `sequenceDiagram` text into the shared tree.
///
/// Recoverable problems never fail the parse; see [`parse_with_diagnostics`] for the spans that
/// were skipped.
pub fn parse_sequence_diagram(input: &str) -> Result<SequenceAst, ParseError> {
    parse_with_diagnostics(input).map(|out| out.ast)
}

pub fn parse_with_diagnostics(input: &str) -> Result<ParseOutput, ParseError> {
    let is_blank = input.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("%%")
    });
    if is_blank {
        return Err(ParseError::EmptyInput { dialect: Dialect::Mermaid });
    }

    let mut parser = Parser {
        tokens: TokenStream::new(Lexer::new(input), input),
        builder: AstBuilder::new(input, Dialect::Mermaid),
        pending_create: None,
        pending_destroy: None,
    };
    let events = parser.parse_block(&[]);
    Ok(parser.builder.finish(events))
}

struct Parser<'a> {
    tokens: TokenStream<'a, Lexer<'a>>,
    builder: AstBuilder<'a>,
    pending_create: Option<ParticipantId>,
    pending_destroy: Option<ParticipantId>,
}

impl<'a> Parser<'a> {
    fn parse_block(&mut self, stops: &[Tok]) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        loop {
            self.tokens.skip_newlines();
            if self.tokens.at_eof() || stops.contains(&self.tokens.kind()) {
                return events;
            }
            self.parse_statement(&mut events);
        }
    }

    fn parse_statement(&mut self, events: &mut Vec<SequenceEvent>) {
        match self.tokens.kind() {
            Tok::Header | Tok::Autonumber => {
                self.tokens.skip_line();
            }
            Tok::Title => {
                self.tokens.advance();
                self.tokens.eat(Tok::Colon);
                let title = self.tokens.rest_of_line();
                self.builder.set_title(title);
            }
            Tok::Declare(kind) => {
                let keyword = self.tokens.advance();
                if self.parse_declaration(kind).is_none() {
                    self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end);
                }
            }
            Tok::Create => self.parse_create(),
            Tok::Destroy => {
                let keyword = self.tokens.advance();
                match self.participant_operand() {
                    Some(participant_id) => self.pending_destroy = Some(participant_id),
                    None => {
                        self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end)
                    }
                }
            }
            Tok::Note => events.extend(self.parse_note()),
            Tok::Activate | Tok::Deactivate => events.extend(self.parse_activation()),
            Tok::Open(operator) => events.push(self.parse_fragment(operator)),
            Tok::Box => events.extend(self.parse_box()),
            Tok::Ident | Tok::Str if matches!(self.tokens.peek().kind, Tok::Arrow(_)) => {
                events.extend(self.parse_message());
            }
            _ => {
                self.skip_token();
                return;
            }
        }
        self.skip_trailing();
    }

    fn skip_token(&mut self) {
        let token = self.tokens.advance();
        self.builder.skip(token.line, token.column, token.start, token.end);
    }

    /// Records whatever a statement left unconsumed on its line.
    fn skip_trailing(&mut self) {
        let current = self.tokens.current();
        if let Some((start, end)) = self.tokens.skip_line() {
            self.builder.skip(current.line, current.column, start, end);
        }
    }

    fn participant_operand(&mut self) -> Option<ParticipantId> {
        match self.tokens.kind() {
            Tok::Ident | Tok::Str => {
                let token = self.tokens.advance();
                self.builder.reference(token.literal)
            }
            _ => None,
        }
    }

    fn parse_declaration(&mut self, kind: ParticipantKind) -> Option<ParticipantId> {
        if !matches!(self.tokens.kind(), Tok::Ident | Tok::Str) {
            return None;
        }
        let name_token = self.tokens.advance();
        let alias = if self.tokens.eat(Tok::As).is_some() {
            self.tokens.rest_of_line()
        } else {
            None
        };
        self.builder.declare(name_token.literal, alias, kind)
    }

    fn parse_create(&mut self) {
        let keyword = self.tokens.advance();
        let kind = match self.tokens.kind() {
            Tok::Declare(kind) => {
                self.tokens.advance();
                kind
            }
            _ => ParticipantKind::Participant,
        };
        match self.parse_declaration(kind) {
            Some(participant_id) => self.pending_create = Some(participant_id),
            None => self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end),
        }
    }

    /// Mermaid has no found or lost messages: a statement with a blank endpoint is skipped
    /// whole, without declaring either side.
    fn parse_message(&mut self) -> Option<SequenceEvent> {
        let from_token = self.tokens.advance();
        let arrow = self.tokens.advance();
        let Tok::Arrow(style) = arrow.kind else {
            return None;
        };
        let mut consumed = arrow.end;

        let mut lifecycle = MessageLifecycle::default();
        if let Some(plus) = self.tokens.eat(Tok::Plus) {
            lifecycle.activate_target = true;
            consumed = plus.end;
        } else if let Some(minus) = self.tokens.eat(Tok::Minus) {
            lifecycle.deactivate_source = true;
            consumed = minus.end;
        }

        let to_token = match self.tokens.kind() {
            Tok::Ident | Tok::Str => {
                let token = self.tokens.advance();
                consumed = token.end;
                Some(token)
            }
            _ => None,
        };
        let resolvable = |raw: &str| ParticipantId::new(raw.trim()).is_ok();
        let Some(to_token) = to_token
            .filter(|token| resolvable(from_token.literal) && resolvable(token.literal))
        else {
            let end = self.tokens.skip_line().map_or(consumed, |(_, end)| end);
            self.builder.skip(from_token.line, from_token.column, from_token.start, end);
            return None;
        };
        let from = self.builder.reference(from_token.literal);
        let to = self.builder.reference(to_token.literal);

        let text = match self.tokens.eat(Tok::Colon) {
            Some(_) => self.tokens.rest_of_line().map(|text| decode_breaks(&text)),
            None => None,
        };

        let mut message = SequenceMessage::new(from, to, style, text.unwrap_or_default());
        message.lifecycle = lifecycle;
        if self.pending_create.is_some() && self.pending_create == message.to {
            self.pending_create = None;
            message.kind = MessageKind::Create;
        } else if self.pending_destroy.as_ref().is_some_and(|id| message.touches(id)) {
            self.pending_destroy = None;
            message.kind = MessageKind::Destroy;
        }
        Some(SequenceEvent::Message(message))
    }

    fn parse_note(&mut self) -> Option<SequenceEvent> {
        let keyword = self.tokens.advance();
        let position = match self.tokens.kind() {
            Tok::Left => NotePosition::Left,
            Tok::Right => NotePosition::Right,
            Tok::Over => NotePosition::Over,
            _ => {
                self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end);
                return None;
            }
        };
        self.tokens.advance();
        if position != NotePosition::Over {
            self.tokens.eat(Tok::Of);
        }

        let mut participant_ids = Vec::new();
        while let Some(participant_id) = self.participant_operand() {
            if !participant_ids.contains(&participant_id) {
                participant_ids.push(participant_id);
            }
            if self.tokens.eat(Tok::Comma).is_none() {
                break;
            }
        }
        if participant_ids.is_empty() {
            self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end);
            return None;
        }

        let text = match self.tokens.eat(Tok::Colon) {
            Some(_) => self.tokens.rest_of_line().map(|text| decode_breaks(&text)),
            None => None,
        };
        Some(SequenceEvent::Note(SequenceNote {
            position,
            participant_ids,
            text: text.unwrap_or_default(),
        }))
    }

    fn parse_activation(&mut self) -> Option<SequenceEvent> {
        let keyword = self.tokens.advance();
        let action = if keyword.kind == Tok::Activate {
            ActivationAction::Activate
        } else {
            ActivationAction::Deactivate
        };
        let Some(participant_id) = self.participant_operand() else {
            self.builder.skip(keyword.line, keyword.column, keyword.start, keyword.end);
            return None;
        };
        Some(SequenceEvent::Activation(Activation { participant_id, action }))
    }

    fn parse_fragment(&mut self, operator: FragmentOperator) -> SequenceEvent {
        let opener = self.tokens.advance();
        let mut condition = self.tokens.rest_of_line();
        let mut branches = Vec::new();
        loop {
            let events = self.parse_block(FRAGMENT_STOPS);
            branches.push(FragmentBranch { condition: condition.take(), events });
            match self.tokens.kind() {
                Tok::Else | Tok::And | Tok::Option => {
                    self.tokens.advance();
                    condition = self.tokens.rest_of_line();
                }
                Tok::End => {
                    self.tokens.advance();
                    break;
                }
                _ => {
                    tracing::debug!(
                        line = opener.line,
                        operator = operator.as_str(),
                        "fragment not closed before end of input"
                    );
                    break;
                }
            }
        }
        SequenceEvent::Fragment(SequenceFragment::new(operator, branches))
    }

    fn parse_box(&mut self) -> Vec<SequenceEvent> {
        self.tokens.advance();
        let header = self.tokens.rest_of_line().unwrap_or_default();
        let (color, name) = split_box_header(&header);
        self.builder.open_group(name, color);
        let events = self.parse_block(BOX_STOPS);
        self.builder.close_group();
        self.tokens.eat(Tok::End);
        events
    }
}

/// Mermaid writes line breaks in labels as `<br>`/`<br/>`.
fn decode_breaks(text: &str) -> String {
    text.replace("<br/>", "\n").replace("<br />", "\n").replace("<br>", "\n")
}

pub(super) fn encode_breaks(text: &str) -> String {
    text.replace('\n', "<br/>")
}

/// Splits `box` header text into an optional leading color and the box title.
pub(super) fn split_box_header(header: &str) -> (Option<String>, String) {
    let header = header.trim();
    let lower = header.to_ascii_lowercase();
    for function in ["rgb(", "rgba(", "hsl(", "hsla("] {
        if lower.starts_with(function) {
            if let Some(close) = header.find(')') {
                let (color, rest) = header.split_at(close + 1);
                return (Some(color.to_owned()), rest.trim().to_owned());
            }
        }
    }

    let (first, rest) = header.split_once(char::is_whitespace).unwrap_or((header, ""));
    let is_color = (first.starts_with('#') && first.len() > 1)
        || NAMED_COLORS.iter().any(|named| named.eq_ignore_ascii_case(first));
    if is_color {
        (Some(first.to_owned()), rest.trim().to_owned())
    } else {
        (None, header.to_owned())
    }
}
