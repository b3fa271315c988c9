// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::Dialect;
use super::ids::{GroupId, ParticipantId};
use super::seq_ast::{
    Activation, ActivationAction, FragmentBranch, FragmentOperator, MessageStyle, NotePosition,
    ParticipantGroup, ParticipantKind, Reference, SequenceAst, SequenceEvent, SequenceFragment,
    SequenceMessage, SequenceNote, SequenceParticipant,
};

pub(crate) fn pid(value: &str) -> ParticipantId {
    ParticipantId::new(value).expect("participant id")
}

pub(crate) fn gid(value: &str) -> GroupId {
    GroupId::new(value).expect("group id")
}

pub(crate) fn participant(id: &str) -> SequenceParticipant {
    SequenceParticipant::new(pid(id))
}

pub(crate) fn msg(from: &str, to: &str, text: &str) -> SequenceEvent {
    SequenceEvent::Message(SequenceMessage::new(
        Some(pid(from)),
        Some(pid(to)),
        MessageStyle::default(),
        text,
    ))
}

pub(crate) fn note(position: NotePosition, ids: &[&str], text: &str) -> SequenceEvent {
    SequenceEvent::Note(SequenceNote {
        position,
        participant_ids: ids.iter().map(|id| pid(id)).collect(),
        text: text.to_owned(),
    })
}

pub(crate) fn reference(ids: &[&str], text: &str) -> SequenceEvent {
    SequenceEvent::Reference(Reference {
        participant_ids: ids.iter().map(|id| pid(id)).collect(),
        text: text.to_owned(),
        link: None,
    })
}

pub(crate) fn activate(id: &str) -> SequenceEvent {
    SequenceEvent::Activation(Activation {
        participant_id: pid(id),
        action: ActivationAction::Activate,
    })
}

pub(crate) fn deactivate(id: &str) -> SequenceEvent {
    SequenceEvent::Activation(Activation {
        participant_id: pid(id),
        action: ActivationAction::Deactivate,
    })
}

pub(crate) fn branch(condition: Option<&str>, events: Vec<SequenceEvent>) -> FragmentBranch {
    FragmentBranch::new(condition, events)
}

pub(crate) fn fragment(operator: FragmentOperator, branches: Vec<FragmentBranch>) -> SequenceEvent {
    SequenceEvent::Fragment(SequenceFragment::new(operator, branches))
}

pub(crate) fn ast_with(participants: &[&str], events: Vec<SequenceEvent>) -> SequenceAst {
    let mut ast = SequenceAst::new(Dialect::Mermaid).with_events(events);
    ast.participants_mut().extend(participants.iter().map(|id| participant(id)));
    ast
}

/// `Client -> API -> Logger -> API -> Client`.
pub(crate) fn client_logger_api() -> SequenceAst {
    ast_with(
        &["Client", "Logger", "API"],
        vec![
            msg("Client", "API", "request"),
            msg("API", "Logger", "log request"),
            msg("Logger", "API", "logged"),
            msg("API", "Client", "response"),
        ],
    )
}

/// A checkout flow exercising every event kind, nested fragments, and a group.
pub(crate) fn checkout() -> SequenceAst {
    let mut ast = ast_with(
        &["User", "Web", "Orders", "Payments", "Audit"],
        vec![
            msg("User", "Web", "checkout"),
            activate("Web"),
            msg("Web", "Orders", "create order"),
            fragment(
                FragmentOperator::Alt,
                vec![
                    branch(
                        Some("card accepted"),
                        vec![
                            msg("Orders", "Payments", "charge"),
                            fragment(
                                FragmentOperator::Loop,
                                vec![branch(
                                    Some("until settled"),
                                    vec![msg("Payments", "Audit", "record attempt")],
                                )],
                            ),
                            msg("Payments", "Orders", "charged"),
                        ],
                    ),
                    branch(
                        Some("card declined"),
                        vec![
                            msg("Payments", "Orders", "declined"),
                            note(NotePosition::Over, &["Orders", "Payments"], "retry later"),
                        ],
                    ),
                ],
            ),
            reference(&["Orders", "Audit"], "audit trail"),
            msg("Orders", "Web", "order id"),
            deactivate("Web"),
            msg("Web", "User", "done"),
        ],
    );
    ast.participants_mut()[0].set_kind(ParticipantKind::Actor);
    ast.participants_mut()[3].set_kind(ParticipantKind::Database);
    ast.groups_mut().push(
        ParticipantGroup::new(gid("group-1"), "Backend")
            .with_background_color(Some("Aqua"))
            .with_participants(vec![pid("Orders"), pid("Payments")]),
    );
    ast
}
