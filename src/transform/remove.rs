// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use smallvec::{smallvec, SmallVec};

use super::walker::{walk_event, walk_fragment, Replacement, Walker};
use super::Filter;
use crate::model::{ParticipantId, SequenceAst, SequenceEvent, SequenceFragment};
use crate::query::Selector;

/// Delete the matched nodes.
///
/// Removing participants also deletes every message sent from or to them; notes, activations
/// and group memberships that still mention them are left to the cleaners. Removing a group
/// deletes only the box, never its members.
pub struct Remove<'a> {
    selector: &'a Selector,
}

impl<'a> Remove<'a> {
    /// `None` for branch selectors: a single branch cannot be removed on its own.
    pub fn new(selector: &'a Selector) -> Option<Self> {
        (!matches!(selector, Selector::Branch(_))).then_some(Self { selector })
    }
}

impl Filter for Remove<'_> {
    fn name(&self) -> &'static str {
        "remove"
    }

    fn apply(&self, mut ast: SequenceAst) -> SequenceAst {
        let removed = self.selector.matching_participants(&ast);
        if !removed.is_empty() {
            ast.participants_mut().retain(|participant| !removed.contains(participant.id()));
        }
        ast.groups_mut().retain(|group| !self.selector.matches_group(group));
        RemoveWalker { selector: self.selector, removed: &removed }.transform(ast)
    }
}

struct RemoveWalker<'a> {
    selector: &'a Selector,
    removed: &'a HashSet<ParticipantId>,
}

impl Walker for RemoveWalker<'_> {
    fn visit_event(&mut self, event: SequenceEvent) -> Replacement {
        match event {
            SequenceEvent::Message(message) => {
                let removed = self.removed.iter().any(|id| message.touches(id))
                    || self.selector.matches_message(&message);
                if removed {
                    SmallVec::new()
                } else {
                    smallvec![SequenceEvent::Message(message)]
                }
            }
            other => walk_event(self, other),
        }
    }

    fn visit_fragment(&mut self, fragment: SequenceFragment) -> Replacement {
        if self.selector.matches_fragment(&fragment) {
            return SmallVec::new();
        }
        walk_fragment(self, fragment)
    }
}
