// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use smallvec::{smallvec, SmallVec};

use super::rule::MergeTarget;
use super::walker::{walk_branches, walk_event, Replacement, Walker};
use super::Filter;
use crate::model::{ParticipantId, SequenceAst, SequenceEvent, SequenceFragment, SequenceParticipant};
use crate::query::ParticipantSelector;

/// Collapse every matched participant into one stand-in.
///
/// Without an explicit target the stand-in's id joins the matched ids with `+` in declaration
/// order. Traffic that only ever ran between merged participants disappears with them.
pub struct Merge<'a> {
    selector: &'a ParticipantSelector,
    target: Option<&'a MergeTarget>,
}

impl<'a> Merge<'a> {
    pub fn new(selector: &'a ParticipantSelector, target: Option<&'a MergeTarget>) -> Self {
        Self { selector, target }
    }

    fn target_id(&self, merged: &[ParticipantId]) -> Option<ParticipantId> {
        if let Some(target) = self.target {
            return Some(target.id().clone());
        }
        let joined = merged.iter().map(ParticipantId::as_str).collect::<Vec<_>>().join("+");
        match ParticipantId::new(&joined) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(id = %joined, error = %err, "cannot derive a merge target id");
                None
            }
        }
    }

    fn stand_in(&self, id: ParticipantId, first: Option<&SequenceParticipant>) -> SequenceParticipant {
        let name = self.target.and_then(MergeTarget::name).unwrap_or(id.as_str()).to_owned();
        let kind = self
            .target
            .and_then(MergeTarget::kind)
            .or_else(|| first.map(SequenceParticipant::kind))
            .unwrap_or_default();
        SequenceParticipant::new(id).with_name(name).with_kind(kind)
    }
}

impl Filter for Merge<'_> {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn apply(&self, mut ast: SequenceAst) -> SequenceAst {
        let merged = ast
            .participants()
            .iter()
            .filter(|participant| self.selector.matches(participant))
            .map(|participant| participant.id().clone())
            .collect::<Vec<_>>();
        if merged.is_empty() {
            return ast;
        }
        let Some(target) = self.target_id(&merged) else {
            return ast;
        };
        let merged_set = merged.iter().cloned().collect::<HashSet<_>>();

        let occupied = ast
            .participants()
            .iter()
            .any(|participant| participant.id() == &target && !merged_set.contains(participant.id()));
        let stand_in =
            (!occupied).then(|| self.stand_in(target.clone(), ast.participant(&merged[0])));

        let participants = ast.participants_mut();
        let position = participants
            .iter()
            .position(|participant| merged_set.contains(participant.id()))
            .unwrap_or(participants.len());
        participants.retain(|participant| !merged_set.contains(participant.id()));
        if let Some(stand_in) = stand_in {
            participants.insert(position.min(participants.len()), stand_in);
        }

        ast.groups_mut().retain_mut(|group| {
            let remapped = remap_ids(group.participant_ids(), &merged_set, &target);
            *group.participant_ids_mut() = remapped;
            !group.participant_ids().is_empty()
        });

        MergeWalker { merged: &merged_set, target: &target }.transform(ast)
    }
}

/// Replaces merged ids with the target, keeping first occurrences only.
fn remap_ids(
    ids: &[ParticipantId],
    merged: &HashSet<ParticipantId>,
    target: &ParticipantId,
) -> Vec<ParticipantId> {
    let mut out: Vec<ParticipantId> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = if merged.contains(id) { target } else { id };
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

struct MergeWalker<'a> {
    merged: &'a HashSet<ParticipantId>,
    target: &'a ParticipantId,
}

impl MergeWalker<'_> {
    fn remap(&self, id: Option<ParticipantId>) -> Option<ParticipantId> {
        id.map(|id| if self.merged.contains(&id) { self.target.clone() } else { id })
    }

    fn internal(&self, ids: &[ParticipantId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.merged.contains(id))
    }
}

impl Walker for MergeWalker<'_> {
    fn visit_event(&mut self, event: SequenceEvent) -> Replacement {
        match event {
            SequenceEvent::Message(mut message) => {
                let touched_merge = message.from.as_ref().is_some_and(|id| self.merged.contains(id))
                    || message.to.as_ref().is_some_and(|id| self.merged.contains(id));
                message.from = self.remap(message.from.take());
                message.to = self.remap(message.to.take());
                let collapsed = message.from.as_ref() == Some(self.target)
                    && message.to.as_ref() == Some(self.target);
                if touched_merge && collapsed {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Message(message)]
                }
            }
            SequenceEvent::Note(mut note) => {
                if self.internal(&note.participant_ids) {
                    return SmallVec::new();
                }
                note.participant_ids = remap_ids(&note.participant_ids, self.merged, self.target);
                smallvec![SequenceEvent::Note(note)]
            }
            SequenceEvent::Reference(mut reference) => {
                if self.internal(&reference.participant_ids) {
                    return SmallVec::new();
                }
                reference.participant_ids =
                    remap_ids(&reference.participant_ids, self.merged, self.target);
                smallvec![SequenceEvent::Reference(reference)]
            }
            SequenceEvent::Activation(activation) if self.merged.contains(&activation.participant_id) => {
                SmallVec::new()
            }
            other => walk_event(self, other),
        }
    }

    fn visit_fragment(&mut self, fragment: SequenceFragment) -> Replacement {
        let fragment = walk_branches(self, fragment);
        if fragment.is_hollow() {
            SmallVec::new()
        } else {
            smallvec![SequenceEvent::Fragment(fragment)]
        }
    }
}
