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
    SequenceAst, SequenceEvent, SequenceFragment, SequenceMessage,
};

const INDENT: &str = "    ";

/// Export the tree as PlantUML sequence text wrapped in `@startuml` / `@enduml`.
pub fn export_sequence_diagram(ast: &SequenceAst) -> String {
    let mut writer = Writer { ast, out: String::new() };
    writer.line(0, "@startuml");
    if let Some(title) = &ast.meta().title {
        writer.line(0, &format!("title {title}"));
    }
    writer.declarations();
    writer.events(ast.events(), 0);
    writer.line(0, "@enduml");
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

    /// Multi-line bodies are written flush left; the parser trims body lines.
    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn ident(&self, participant_id: &'a ParticipantId) -> Cow<'a, str> {
        render_ident(participant_id.as_str(), is_keyword)
    }

    fn targets(&self, participant_ids: &'a [ParticipantId]) -> String {
        participant_ids.iter().map(|id| self.ident(id)).collect::<Vec<_>>().join(", ")
    }

    fn declarations(&mut self) {
        let mut depth = 0;
        for step in plan_boxes(self.ast) {
            match step {
                BoxStep::Open(group) => {
                    let mut header = format!("box \"{}\"", group.name().replace('"', "'"));
                    if let Some(color) = &group.style().background_color {
                        header.push_str(" #");
                        header.push_str(color.trim_start_matches('#'));
                    }
                    self.line(depth, &header);
                    depth += 1;
                }
                BoxStep::Close(_) => {
                    depth -= 1;
                    self.line(depth, "end box");
                }
                BoxStep::Participant(participant) => {
                    let keyword = participant.kind().keyword();
                    let id = self.ident(participant.id());
                    let decl = if participant.name() == participant.id().as_str() {
                        format!("{keyword} {id}")
                    } else {
                        let name = encode_breaks(participant.name()).replace('"', "'");
                        format!("{keyword} \"{name}\" as {id}")
                    };
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
                SequenceEvent::Note(note) => {
                    let position = match note.position {
                        NotePosition::Left => "left of",
                        NotePosition::Right => "right of",
                        NotePosition::Over => "over",
                    };
                    let head = format!("note {position} {}", self.targets(&note.participant_ids));
                    self.annotation(depth, &head, &note.text, "end note");
                }
                SequenceEvent::Reference(reference) => {
                    let head = format!("ref over {}", self.targets(&reference.participant_ids));
                    self.annotation(depth, &head, &reference.text, "end ref");
                }
                SequenceEvent::Divider(divider) => match &divider.text {
                    Some(text) => self.line(depth, &format!("== {text} ==")),
                    None => self.line(depth, "===="),
                },
                SequenceEvent::Spacer(spacer) => match &spacer.text {
                    Some(text) => self.line(depth, &format!("...{text}...")),
                    None => self.line(depth, "|||"),
                },
                SequenceEvent::Activation(activation) => {
                    let keyword = match activation.action {
                        ActivationAction::Activate => "activate",
                        ActivationAction::Deactivate => "deactivate",
                    };
                    let target = self.ident(&activation.participant_id);
                    self.line(depth, &format!("{keyword} {target}"));
                }
            }
        }
    }

    fn annotation(&mut self, depth: usize, head: &str, text: &str, closer: &str) {
        if text.contains('\n') {
            self.line(depth, head);
            for body_line in text.lines() {
                self.raw(body_line);
            }
            self.line(depth, closer);
        } else {
            self.line(depth, &format!("{head} : {text}"));
        }
    }

    fn message(&mut self, message: &'a SequenceMessage, depth: usize) {
        if message.kind == MessageKind::Create {
            if let Some(to) = &message.to {
                let kind = self.ast.participant(to).map(|p| p.kind()).unwrap_or_default();
                let decl = format!("create {} {}", kind.keyword(), self.ident(to));
                self.line(depth, &decl);
            }
        }

        let from = message.from.as_ref().map(|id| self.ident(id)).unwrap_or(Cow::Borrowed("["));
        let to = message.to.as_ref().map(|id| self.ident(id)).unwrap_or(Cow::Borrowed("]"));
        let arrow = arrow_spelling(message.style);
        let mut line = match (message.from.is_some(), message.to.is_some()) {
            (true, true) => format!("{from} {arrow} {to}"),
            (false, _) => format!("[{arrow} {to}"),
            (true, false) => format!("{from} {arrow}]"),
        };
        if message.lifecycle.activate_target {
            line.push_str(" ++");
        }
        if message.lifecycle.deactivate_source {
            line.push_str(" --");
        }
        if !message.text.is_empty() {
            line.push_str(" : ");
            line.push_str(&encode_breaks(&message.text));
        }
        self.line(depth, &line);

        if message.kind == MessageKind::Destroy {
            if let Some(target) = message.to.as_ref().or(message.from.as_ref()) {
                let target = self.ident(target);
                self.line(depth, &format!("destroy {target}"));
            }
        }
    }

    fn fragment(&mut self, fragment: &'a SequenceFragment, depth: usize) {
        let keyword = match fragment.operator {
            FragmentOperator::Rect => "group",
            operator => operator.as_str(),
        };
        for (idx, branch) in fragment.branches.iter().enumerate() {
            let keyword = if idx == 0 { keyword } else { "else" };
            match &branch.condition {
                Some(condition) => self.line(depth, &format!("{keyword} {condition}")),
                None => self.line(depth, keyword),
            }
            self.events(&branch.events, depth + 1);
        }
        self.line(depth, "end");
    }
}

fn arrow_spelling(style: MessageStyle) -> &'static str {
    ARROWS
        .iter()
        .find(|(_, candidate)| *candidate == style)
        .map(|(spelling, _)| *spelling)
        .unwrap_or("->")
}

#[cfg(test)]
mod tests {
    use super::export_sequence_diagram;
    use crate::model::fixtures::{ast_with, checkout, msg, pid};
    use crate::model::{MessageStyle, SequenceEvent, SequenceMessage};

    #[test]
    fn exports_boxes_fragments_references() {
        let out = export_sequence_diagram(&checkout());
        let expected = "\
@startuml
actor User
participant Web
box \"Backend\" #Aqua
    participant Orders
    database Payments
end box
participant Audit
User -> Web : checkout
activate Web
Web -> Orders : create order
alt card accepted
    Orders -> Payments : charge
    loop until settled
        Payments -> Audit : record attempt
    end
    Payments -> Orders : charged
else card declined
    Payments -> Orders : declined
    note over Orders, Payments : retry later
end
ref over Orders, Audit : audit trail
Orders -> Web : order id
deactivate Web
Web -> User : done
@enduml
";
        assert_eq!(out, expected);
    }

    #[test]
    fn found_and_lost_messages_use_brackets() {
        let found = SequenceMessage::new(None, Some(pid("A")), MessageStyle::default(), "in");
        let lost = SequenceMessage::new(Some(pid("A")), None, MessageStyle::default(), "out");
        let ast = ast_with(
            &["A"],
            vec![
                SequenceEvent::Message(found),
                SequenceEvent::Message(lost),
                msg("A", "A", "self"),
            ],
        );
        let out = export_sequence_diagram(&ast);
        assert!(out.contains("\n[-> A : in\n"));
        assert!(out.contains("\nA ->] : out\n"));
        assert!(out.contains("\nA -> A : self\n"));
    }
}
