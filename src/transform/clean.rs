// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Invariant repair after the rules ran: first the event tree, then the participant and group
//! lists.

use std::collections::HashSet;

use smallvec::{smallvec, SmallVec};

use super::walker::{walk_branches, walk_event, Replacement, Walker};
use crate::model::{ParticipantId, SequenceAst, SequenceEvent, SequenceFragment};

/// Drops references to undeclared participants, then empty branches and fragments without
/// branches, bottom-up.
pub fn clean_structure(ast: SequenceAst) -> SequenceAst {
    let declared = ast.participants().iter().map(|participant| participant.id().clone()).collect();
    StructureCleaner { declared }.transform(ast)
}

/// Keeps only participants some event still references, and only those as group members.
/// Groups left without members are dropped.
pub fn clean_unused(mut ast: SequenceAst) -> SequenceAst {
    let mut referenced = HashSet::new();
    collect_referenced(ast.events(), &mut referenced);

    ast.participants_mut().retain(|participant| referenced.contains(participant.id()));
    ast.groups_mut().retain_mut(|group| {
        group.participant_ids_mut().retain(|id| referenced.contains(id));
        !group.participant_ids().is_empty()
    });
    ast
}

fn collect_referenced(events: &[SequenceEvent], out: &mut HashSet<ParticipantId>) {
    for event in events {
        if let SequenceEvent::Fragment(fragment) = event {
            for branch in &fragment.branches {
                collect_referenced(&branch.events, out);
            }
        } else {
            out.extend(event.participant_refs().into_iter().cloned());
        }
    }
}

struct StructureCleaner {
    declared: HashSet<ParticipantId>,
}

impl StructureCleaner {
    fn dangling(&self, id: Option<&ParticipantId>) -> bool {
        id.is_some_and(|id| !self.declared.contains(id))
    }
}

impl Walker for StructureCleaner {
    fn visit_event(&mut self, event: SequenceEvent) -> Replacement {
        match event {
            SequenceEvent::Message(message)
                if self.dangling(message.from.as_ref()) || self.dangling(message.to.as_ref()) =>
            {
                SmallVec::new()
            }
            SequenceEvent::Note(mut note) => {
                note.participant_ids.retain(|id| self.declared.contains(id));
                if note.participant_ids.is_empty() {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Note(note)]
                }
            }
            SequenceEvent::Reference(mut reference) => {
                reference.participant_ids.retain(|id| self.declared.contains(id));
                if reference.participant_ids.is_empty() {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Reference(reference)]
                }
            }
            SequenceEvent::Activation(activation)
                if !self.declared.contains(&activation.participant_id) =>
            {
                SmallVec::new()
            }
            other => walk_event(self, other),
        }
    }

    fn visit_fragment(&mut self, fragment: SequenceFragment) -> Replacement {
        let mut fragment = walk_branches(self, fragment);
        fragment.branches.retain(|branch| !branch.events.is_empty());
        if fragment.branches.is_empty() {
            SmallVec::new()
        } else {
            smallvec![SequenceEvent::Fragment(fragment)]
        }
    }
}
