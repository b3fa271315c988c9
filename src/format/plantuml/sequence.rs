// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::lexer::{Lexer, Tok};
use crate::format::builder::{AstBuilder, ParseOutput};
use crate::format::scanner::{Token, TokenStream};
use crate::format::ParseError;
use crate::model::{
    Activation, ActivationAction, Dialect, Divider, FragmentBranch, FragmentOperator, MessageKind,
    MessageLifecycle, NotePosition, ParticipantId, ParticipantKind, Reference,
    SequenceAst, SequenceEvent, SequenceFragment, SequenceMessage, SequenceNote, Spacer,
};

const FRAGMENT_STOPS: &[Tok] = &[Tok::Else, Tok::End];
const BOX_STOPS: &[Tok] = &[Tok::End];

/// Parse PlantUML sequence text (`@startuml` … `@enduml`) into the shared tree.
///
/// Everything after `@enduml` is ignored.
pub fn parse_sequence_diagram(input: &str) -> Result<SequenceAst, ParseError> {
    parse_with_diagnostics(input).map(|out| out.ast)
}

pub fn parse_with_diagnostics(input: &str) -> Result<ParseOutput, ParseError> {
    let is_blank = input.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('\'')
    });
    if is_blank {
        return Err(ParseError::EmptyInput { dialect: Dialect::PlantUml });
    }

    let mut parser = Parser {
        tokens: TokenStream::new(Lexer::new(input), input),
        builder: AstBuilder::new(input, Dialect::PlantUml),
        pending_create: None,
    };
    let events = parser.parse_block(&[]);
    Ok(parser.builder.finish(events))
}

struct Parser<'a> {
    tokens: TokenStream<'a, Lexer<'a>>,
    builder: AstBuilder<'a>,
    pending_create: Option<ParticipantId>,
}

impl<'a> Parser<'a> {
    fn parse_block(&mut self, stops: &[Tok]) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        loop {
            self.tokens.skip_newlines();
            if self.tokens.at_eof() || self.tokens.at(Tok::EndUml) {
                return events;
            }
            if stops.contains(&self.tokens.kind()) {
                return events;
            }
            self.parse_statement(&mut events);
        }
    }

    fn parse_statement(&mut self, events: &mut Vec<SequenceEvent>) {
        match self.tokens.kind() {
            Tok::StartUml | Tok::Directive => {
                self.tokens.skip_line();
                return;
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
                    self.skip_span(keyword);
                }
            }
            Tok::Create => self.parse_create(),
            Tok::Destroy => self.parse_destroy(events),
            Tok::Note => events.extend(self.parse_note()),
            Tok::Ref => events.extend(self.parse_reference()),
            Tok::Activate | Tok::Deactivate => events.extend(self.parse_activation()),
            Tok::Open(operator) => events.push(self.parse_fragment(operator)),
            Tok::Box => events.extend(self.parse_box()),
            Tok::DoubleEq => {
                self.tokens.advance();
                let text = self.tokens.rest_of_line().and_then(|text| {
                    let text = text.trim_end_matches('=').trim();
                    (!text.is_empty()).then(|| text.to_owned())
                });
                events.push(SequenceEvent::Divider(Divider { text }));
            }
            Tok::Ellipsis => {
                self.tokens.advance();
                let text = self.tokens.rest_of_line().and_then(|text| {
                    let text = text.trim_end_matches('.').trim();
                    (!text.is_empty()).then(|| text.to_owned())
                });
                events.push(SequenceEvent::Spacer(Spacer { text }));
            }
            Tok::Gap => {
                self.tokens.advance();
                events.push(SequenceEvent::Spacer(Spacer { text: None }));
            }
            Tok::Ident | Tok::Str | Tok::LBracket if self.at_message() => {
                events.extend(self.parse_message());
            }
            _ => {
                let token = self.tokens.advance();
                self.skip_span(token);
                return;
            }
        }
        self.skip_trailing();
    }

    fn at_message(&self) -> bool {
        matches!(self.tokens.peek().kind, Tok::Arrow(_) | Tok::ReverseArrow(_))
    }

    fn skip_span(&mut self, token: Token<'a, Tok>) {
        self.builder.skip(token.line, token.column, token.start, token.end);
    }

    fn skip_trailing(&mut self) {
        let current = self.tokens.current();
        if let Some((start, end)) = self.tokens.skip_line() {
            self.builder.skip(current.line, current.column, start, end);
        }
    }

    fn operand(&mut self) -> Option<Token<'a, Tok>> {
        matches!(self.tokens.kind(), Tok::Ident | Tok::Str).then(|| self.tokens.advance())
    }

    fn participant_operand(&mut self) -> Option<ParticipantId> {
        let token = self.operand()?;
        self.builder.reference(token.literal)
    }

    fn participant_list(&mut self) -> Vec<ParticipantId> {
        let mut participant_ids = Vec::new();
        while let Some(participant_id) = self.participant_operand() {
            if !participant_ids.contains(&participant_id) {
                participant_ids.push(participant_id);
            }
            if self.tokens.eat(Tok::Comma).is_none() {
                break;
            }
        }
        participant_ids
    }

    /// `participant A`, `participant "Display" as A`, `participant A as "Display"`, each with
    /// an optional trailing `#color`.
    fn parse_declaration(&mut self, kind: ParticipantKind) -> Option<ParticipantId> {
        let first = self.operand()?;
        let (raw_id, name) = match self.tokens.eat(Tok::As) {
            Some(_) => match self.operand() {
                Some(second) if first.kind == Tok::Ident && second.kind == Tok::Str => {
                    (first.literal, Some(second.literal))
                }
                Some(second) => (second.literal, Some(first.literal)),
                None => (first.literal, None),
            },
            None => (first.literal, None),
        };
        self.tokens.eat(Tok::Color);
        self.builder.declare(raw_id, name.map(decode_breaks), kind)
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
            None => self.skip_span(keyword),
        }
    }

    /// `destroy X` follows the message it applies to.
    fn parse_destroy(&mut self, events: &mut [SequenceEvent]) {
        let keyword = self.tokens.advance();
        let Some(participant_id) = self.participant_operand() else {
            self.skip_span(keyword);
            return;
        };
        match events.last_mut() {
            Some(SequenceEvent::Message(message)) if message.touches(&participant_id) => {
                message.kind = MessageKind::Destroy;
            }
            _ => tracing::debug!(
                line = keyword.line,
                participant = %participant_id,
                "destroy without a preceding message"
            ),
        }
    }

    fn parse_message(&mut self) -> Option<SequenceEvent> {
        let found = self.tokens.eat(Tok::LBracket).is_some();
        let first = if found { None } else { self.operand() };
        let (style, reversed) = match self.tokens.advance().kind {
            Tok::Arrow(style) => (style, false),
            Tok::ReverseArrow(style) => (style, true),
            _ => return None,
        };
        let first = first.and_then(|token| self.builder.reference(token.literal));
        let lost = self.tokens.eat(Tok::RBracket).is_some();
        let second = if lost { None } else { self.participant_operand() };
        let (from, to) = if reversed { (second, first) } else { (first, second) };

        let mut lifecycle = MessageLifecycle::default();
        loop {
            if self.tokens.eat(Tok::PlusPlus).is_some() {
                lifecycle.activate_target = true;
            } else if self.tokens.eat(Tok::MinusMinus).is_some() {
                lifecycle.deactivate_source = true;
            } else {
                break;
            }
        }

        let text = match self.tokens.eat(Tok::Colon) {
            Some(_) => self.tokens.rest_of_line().map(|text| decode_breaks(&text)),
            None => None,
        };
        let mut message = SequenceMessage::new(from, to, style, text.unwrap_or_default());
        message.lifecycle = lifecycle;
        if self.pending_create.is_some() && self.pending_create == message.to {
            self.pending_create = None;
            message.kind = MessageKind::Create;
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
                self.skip_span(keyword);
                return None;
            }
        };
        self.tokens.advance();
        if position != NotePosition::Over {
            self.tokens.eat(Tok::Of);
        }
        let participant_ids = self.participant_list();
        self.tokens.eat(Tok::Color);
        let text = self.annotation_text(Tok::Note);

        if participant_ids.is_empty() {
            self.skip_span(keyword);
            return None;
        }
        Some(SequenceEvent::Note(SequenceNote {
            position,
            participant_ids,
            text: text.unwrap_or_default(),
        }))
    }

    fn parse_reference(&mut self) -> Option<SequenceEvent> {
        let keyword = self.tokens.advance();
        self.tokens.eat(Tok::Over);
        let participant_ids = self.participant_list();
        self.tokens.eat(Tok::Color);
        let text = self.annotation_text(Tok::Ref);

        if participant_ids.is_empty() {
            self.skip_span(keyword);
            return None;
        }
        Some(SequenceEvent::Reference(Reference {
            participant_ids,
            text: text.unwrap_or_default(),
            link: None,
        }))
    }

    /// Text of a note or reference: `: single line`, or the lines up to `end <closer>`.
    fn annotation_text(&mut self, closer: Tok) -> Option<String> {
        if self.tokens.eat(Tok::Colon).is_some() {
            return self.tokens.rest_of_line().map(|text| decode_breaks(&text));
        }
        if !self.tokens.at_line_end() {
            return None;
        }

        let is_closer = |tokens: &TokenStream<'a, Lexer<'a>>| {
            (tokens.at(Tok::End) && tokens.peek().kind == closer)
                || (closer == Tok::Note && tokens.at(Tok::EndNote))
        };
        let body = self.tokens.lines_until(is_closer);
        if self.tokens.eat(Tok::End).is_some() {
            self.tokens.advance();
        } else if self.tokens.eat(Tok::EndNote).is_none() {
            tracing::debug!("multi-line annotation not closed before end of input");
        }
        body.map(|body| body.lines().map(str::trim).collect::<Vec<_>>().join("\n"))
    }

    fn parse_activation(&mut self) -> Option<SequenceEvent> {
        let keyword = self.tokens.advance();
        let action = if keyword.kind == Tok::Activate {
            ActivationAction::Activate
        } else {
            ActivationAction::Deactivate
        };
        let Some(participant_id) = self.participant_operand() else {
            self.skip_span(keyword);
            return None;
        };
        self.tokens.eat(Tok::Color);
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
                Tok::Else => {
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

    /// `box "Title" #color` … `end box`.
    fn parse_box(&mut self) -> Vec<SequenceEvent> {
        self.tokens.advance();
        let name = self.tokens.text_until(|tokens| tokens.at(Tok::Color)).unwrap_or_default();
        let color = self.tokens.eat(Tok::Color).map(|token| normalize_color(token.literal));
        self.skip_trailing();

        self.builder.open_group(name, color);
        let events = self.parse_block(BOX_STOPS);
        self.builder.close_group();
        if self.tokens.eat(Tok::End).is_some() {
            self.tokens.eat(Tok::Box);
        }
        events
    }
}

/// PlantUML writes line breaks in labels as a literal `\n`.
fn decode_breaks(text: &str) -> String {
    text.replace("\\n", "\n")
}

pub(super) fn encode_breaks(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Hex colors keep their `#`; named colors are stored bare.
fn normalize_color(literal: &str) -> String {
    let bare = literal.trim_start_matches('#');
    if is_hex_color(bare) {
        literal.to_owned()
    } else {
        bare.to_owned()
    }
}

fn is_hex_color(bare: &str) -> bool {
    matches!(bare.len(), 3 | 4 | 6 | 8) && bare.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests;
