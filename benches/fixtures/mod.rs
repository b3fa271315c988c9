// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use seqlens::model::{
    Dialect, FragmentBranch, FragmentOperator, MessageStyle, NotePosition, ParticipantId,
    SequenceAst, SequenceEvent, SequenceFragment, SequenceMessage, SequenceNote,
    SequenceParticipant,
};

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    if prefix.len() >= target_len {
        return prefix[..target_len].to_owned();
    }

    let mut out = String::with_capacity(target_len);
    out.push_str(prefix);
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

pub fn checksum_sequence(ast: &SequenceAst) -> u64 {
    fn events(acc: u64, events: &[SequenceEvent]) -> u64 {
        events.iter().fold(acc, |acc, event| match event {
            SequenceEvent::Fragment(fragment) => fragment.branches.iter().fold(
                acc.wrapping_mul(131).wrapping_add(fragment.operator as u64),
                |acc, branch| events(acc, &branch.events),
            ),
            SequenceEvent::Message(message) => acc
                .wrapping_mul(131)
                .wrapping_add(message.text.len() as u64)
                .wrapping_add(message.kind as u64),
            other => acc
                .wrapping_mul(131)
                .wrapping_add(other.participant_refs().len() as u64),
        })
    }

    let mut acc = 0u64;
    for participant in ast.participants() {
        acc = acc.wrapping_mul(131).wrapping_add(participant.id().as_str().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(participant.name().len() as u64);
    }
    for group in ast.groups() {
        acc = acc.wrapping_mul(131).wrapping_add(group.participant_ids().len() as u64);
    }
    events(acc, ast.events())
}

pub mod seq {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub participants: usize,
        pub messages: usize,
        /// Every this many messages open a nested `alt`/`loop` block.
        pub fragment_every: usize,
        pub long_text: bool,
    }

    impl Params {
        pub const fn new(
            participants: usize,
            messages: usize,
            fragment_every: usize,
            long_text: bool,
        ) -> Self {
            Self { participants, messages, fragment_every, long_text }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        LargeLongText,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Medium => "medium",
                Self::LargeLongText => "large_long_text",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params::new(8, 40, 10, false),
                Self::Medium => Params::new(20, 200, 8, false),
                Self::LargeLongText => Params::new(40, 800, 6, true),
            }
        }

        pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::LargeLongText];
    }

    pub fn participant_id(idx: usize) -> ParticipantId {
        ParticipantId::new(format!("P{idx:03}")).expect("valid participant id")
    }

    fn message_text(idx: usize, long_text: bool) -> String {
        if long_text {
            let prefix = format!("msg_{idx:06}_");
            ascii_repeat_to_len(&prefix, 'y', 160)
        } else {
            format!("m{idx:04}")
        }
    }

    fn message(params: Params, idx: usize) -> SequenceEvent {
        let from = participant_id(idx % params.participants);
        let to = participant_id((idx + 1) % params.participants);
        SequenceEvent::Message(SequenceMessage::new(
            Some(from),
            Some(to),
            MessageStyle::default(),
            message_text(idx, params.long_text),
        ))
    }

    pub fn diagram(params: Params) -> SequenceAst {
        assert!(params.participants >= 2, "participants must be >= 2");
        assert!(params.fragment_every >= 2, "fragment_every must be >= 2");

        let mut ast = SequenceAst::new(Dialect::Mermaid);
        for idx in 0..params.participants {
            ast.participants_mut().push(SequenceParticipant::new(participant_id(idx)));
        }

        let mut events = Vec::with_capacity(params.messages);
        let mut idx = 0;
        while idx < params.messages {
            if idx % params.fragment_every != params.fragment_every - 1 {
                events.push(message(params, idx));
                idx += 1;
                continue;
            }
            let ok = message(params, idx);
            let retry = SequenceEvent::Fragment(SequenceFragment::new(
                FragmentOperator::Loop,
                vec![FragmentBranch::new(Some("retry"), vec![message(params, idx + 1)])],
            ));
            let note = SequenceEvent::Note(SequenceNote {
                position: NotePosition::Over,
                participant_ids: vec![participant_id(idx % params.participants)],
                text: format!("failure {idx}"),
            });
            events.push(SequenceEvent::Fragment(SequenceFragment::new(
                FragmentOperator::Alt,
                vec![
                    FragmentBranch::new(Some(format!("success {idx}")), vec![ok]),
                    FragmentBranch::new(Some(format!("failure {idx}")), vec![retry, note]),
                ],
            )));
            idx += 2;
        }

        ast.with_events(events)
    }

    pub fn fixture(case: Case) -> SequenceAst {
        diagram(case.params())
    }
}
