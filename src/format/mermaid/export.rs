// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use super::lexer::{is_keyword, ARROWS};
use super::sequence::encode_breaks;
use crate::format::boxes::{plan_boxes, BoxStep};
use crate::format::ident::render_ident;
use crate::model::{
    ActivationAction, FragmentOperator, MessageKind, MessageStyle, NotePosition, ParticipantId,
    SequenceAst, SequenceEvent, SequenceFragment, SequenceMessage, SequenceNote,
};

const INDENT: &str = "    ";

/// Export the tree as Mermaid `sequenceDiagram` text.
///
/// Participants are declared up front in list order, wrapped in `box` blocks rebuilt from group
/// membership. Mermaid has no divider, spacer, reference, or found/lost message syntax: dividers
/// and spacers become `%%` comments, references become notes, and messages missing an endpoint
/// are emitted as comments.
pub fn export_sequence_diagram(ast: &SequenceAst) -> String {
    let mut writer = Writer { ast, out: String::new() };
    writer.line(0, "sequenceDiagram");
    if let Some(title) = &ast.meta().title {
        writer.line(1, &format!("title {title}"));
    }
    writer.declarations();
    writer.events(ast.events(), 1);
    writer.out
}

struct Writer<'a> {
    ast: &'a SequenceAst,
    out: String,
}

impl<'a> Writer<'a> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn ident(&self, participant_id: &'a ParticipantId) -> Cow<'a, str> {
        render_ident(participant_id.as_str(), is_keyword)
    }

    fn declarations(&mut self) {
        let mut depth = 1;
        for step in plan_boxes(self.ast) {
            match step {
                BoxStep::Open(group) => {
                    let mut header = String::from("box");
                    if let Some(color) = &group.style().background_color {
                        header.push(' ');
                        header.push_str(color);
                    }
                    if !group.name().is_empty() {
                        header.push(' ');
                        header.push_str(group.name());
                    }
                    self.line(depth, &header);
                    depth += 1;
                }
                BoxStep::Close(_) => {
                    depth -= 1;
                    self.line(depth, "end");
                }
                BoxStep::Participant(participant) => {
                    let mut decl =
                        format!("{} {}", participant.kind().keyword(), self.ident(participant.id()));
                    if participant.name() != participant.id().as_str() {
                        decl.push_str(" as ");
                        decl.push_str(&encode_breaks(participant.name()));
                    }
                    self.line(depth, &decl);
                }
            }
        }
    }

    fn events(&mut self, events: &'a [SequenceEvent], depth: usize) {
        for event in events {
            match event {
                SequenceEvent::Message(message) => self.message(message, depth),
                SequenceEvent::Fragment(fragment) => self.fragment(fragment, depth),
                SequenceEvent::Note(note) => self.note(note, depth),
                SequenceEvent::Divider(divider) => {
                    let text = divider.text.as_deref().unwrap_or_default();
                    self.line(depth, &format!("%% == {text} =="));
                }
                SequenceEvent::Spacer(spacer) => match &spacer.text {
                    Some(text) => self.line(depth, &format!("%% ...{text}...")),
                    None => self.line(depth, "%% ..."),
                },
                SequenceEvent::Activation(activation) => {
                    let keyword = match activation.action {
                        ActivationAction::Activate => "activate",
                        ActivationAction::Deactivate => "deactivate",
                    };
                    let target = self.ident(&activation.participant_id);
                    self.line(depth, &format!("{keyword} {target}"));
                }
                SequenceEvent::Reference(reference) => {
                    let targets = self.targets(&reference.participant_ids);
                    let text = encode_breaks(&reference.text);
                    self.line(depth, &format!("Note over {targets}: ref: {text}"));
                }
            }
        }
    }

    fn message(&mut self, message: &'a SequenceMessage, depth: usize) {
        let arrow = arrow_spelling(message.style);
        let text = encode_breaks(&message.text);
        let (Some(from), Some(to)) = (&message.from, &message.to) else {
            let from = message.from.as_ref().map(|id| id.as_str()).unwrap_or("[");
            let to = message.to.as_ref().map(|id| id.as_str()).unwrap_or("]");
            self.line(depth, &format!("%% {from} {arrow} {to}: {text}"));
            return;
        };

        match message.kind {
            MessageKind::Create => {
                let kind = self.ast.participant(to).map(|p| p.kind()).unwrap_or_default();
                let decl = format!("create {} {}", kind.keyword(), self.ident(to));
                self.line(depth, &decl);
            }
            MessageKind::Destroy => {
                let target = self.ident(to);
                self.line(depth, &format!("destroy {target}"));
            }
            MessageKind::Sync | MessageKind::Reply | MessageKind::Async => {}
        }

        let suffix = if message.lifecycle.activate_target {
            "+"
        } else if message.lifecycle.deactivate_source {
            "-"
        } else {
            ""
        };
        let mut line = format!("{}{arrow}{suffix}{}:", self.ident(from), self.ident(to));
        if !text.is_empty() {
            line.push(' ');
            line.push_str(&text);
        }
        self.line(depth, &line);
    }

    fn fragment(&mut self, fragment: &'a SequenceFragment, depth: usize) {
        let branch_keyword = match fragment.operator {
            FragmentOperator::Par => "and",
            FragmentOperator::Critical => "option",
            _ => "else",
        };
        for (idx, branch) in fragment.branches.iter().enumerate() {
            let keyword = if idx == 0 { fragment.operator.as_str() } else { branch_keyword };
            match &branch.condition {
                Some(condition) => self.line(depth, &format!("{keyword} {condition}")),
                None => self.line(depth, keyword),
            }
            self.events(&branch.events, depth + 1);
        }
        self.line(depth, "end");
    }

    fn note(&mut self, note: &'a SequenceNote, depth: usize) {
        let position = match note.position {
            NotePosition::Left => "left of",
            NotePosition::Right => "right of",
            NotePosition::Over => "over",
        };
        let targets = self.targets(&note.participant_ids);
        let text = encode_breaks(&note.text);
        self.line(depth, &format!("Note {position} {targets}: {text}"));
    }

    fn targets(&self, participant_ids: &'a [ParticipantId]) -> String {
        participant_ids.iter().map(|id| self.ident(id)).collect::<Vec<_>>().join(",")
    }
}

fn arrow_spelling(style: MessageStyle) -> &'static str {
    ARROWS
        .iter()
        .find(|(_, candidate)| *candidate == style)
        .map(|(spelling, _)| *spelling)
        .unwrap_or("->>")
}
