// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use smallvec::{smallvec, SmallVec};

use super::walker::{walk_event, Replacement, Walker};
use super::Filter;
use crate::model::{ParticipantId, SequenceAst, SequenceEvent};
use crate::query::ParticipantSelector;

/// Show only the matched participants: keep messages touching them, narrow notes and
/// references to them, keep their activations.
pub struct Focus<'a> {
    selector: &'a ParticipantSelector,
}

impl<'a> Focus<'a> {
    pub fn new(selector: &'a ParticipantSelector) -> Self {
        Self { selector }
    }
}

impl Filter for Focus<'_> {
    fn name(&self) -> &'static str {
        "focus"
    }

    fn apply(&self, ast: SequenceAst) -> SequenceAst {
        let keep = self.selector.matching_ids(&ast);
        FocusWalker { keep }.transform(ast)
    }
}

struct FocusWalker {
    keep: HashSet<ParticipantId>,
}

impl FocusWalker {
    fn kept(&self, participant_id: Option<&ParticipantId>) -> bool {
        participant_id.is_some_and(|id| self.keep.contains(id))
    }
}

impl Walker for FocusWalker {
    fn visit_event(&mut self, event: SequenceEvent) -> Replacement {
        match event {
            SequenceEvent::Message(message) => {
                if self.kept(message.from.as_ref()) || self.kept(message.to.as_ref()) {
                    smallvec![SequenceEvent::Message(message)]
                } else {
                    SmallVec::new()
                }
            }
            SequenceEvent::Note(mut note) => {
                note.participant_ids.retain(|id| self.keep.contains(id));
                if note.participant_ids.is_empty() {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Note(note)]
                }
            }
            SequenceEvent::Reference(mut reference) => {
                reference.participant_ids.retain(|id| self.keep.contains(id));
                if reference.participant_ids.is_empty() {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Reference(reference)]
                }
            }
            SequenceEvent::Activation(activation) => {
                if self.keep.contains(&activation.participant_id) {
                    smallvec![SequenceEvent::Activation(activation)]
                } else {
                    SmallVec::new()
                }
            }
            other => walk_event(self, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Focus;
    use crate::model::fixtures::checkout;
    use crate::model::SequenceEvent;
    use crate::query::ParticipantSelector;
    use crate::transform::Filter;

    #[test]
    fn keeps_only_what_touches_the_focus() {
        let selector = ParticipantSelector::by_id("Payments");
        let out = Focus::new(&selector).apply(checkout());

        let texts = out.messages().iter().map(|m| m.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, ["charge", "record attempt", "charged", "declined"]);

        let SequenceEvent::Fragment(alt) = &out.events()[0] else {
            panic!("expected the alt fragment first, got {:?}", out.events());
        };
        let SequenceEvent::Note(note) = &alt.branches[1].events[1] else {
            panic!("expected the note");
        };
        let narrowed = note.participant_ids.iter().map(|p| p.as_str()).collect::<Vec<_>>();
        assert_eq!(narrowed, ["Payments"]);
        // The reference over Orders and Audit and the Web activations are gone.
        assert_eq!(out.events().len(), 1);
        // Participants are left for the cleaners.
        assert_eq!(out.participants().len(), 5);
    }

    #[test]
    fn no_match_empties_the_events() {
        let selector = ParticipantSelector::by_id("Nobody");
        let out = Focus::new(&selector).apply(checkout());
        assert!(out.messages().is_empty());
    }
}
