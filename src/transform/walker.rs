// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Owned-tree traversal for rewrite passes.
//!
//! A pass consumes the tree by value and rebuilds it: every event goes through
//! [`Walker::visit_event`], which returns the events that replace it (none to delete, one to
//! keep or replace, several to expand). Fragments recurse into their branches by default.
//! Participants and groups are not events and pass through untouched.

use smallvec::{smallvec, SmallVec};

use crate::model::{FragmentBranch, SequenceAst, SequenceEvent, SequenceFragment};

pub type Replacement = SmallVec<[SequenceEvent; 1]>;

pub trait Walker {
    fn visit_event(&mut self, event: SequenceEvent) -> Replacement {
        walk_event(self, event)
    }

    fn visit_fragment(&mut self, fragment: SequenceFragment) -> Replacement {
        walk_fragment(self, fragment)
    }

    fn transform(&mut self, ast: SequenceAst) -> SequenceAst {
        let (meta, participants, groups, events) = ast.into_parts();
        let events = walk_events(self, events);
        SequenceAst::from_parts(meta, participants, groups, events)
    }
}

pub fn walk_events<W: Walker + ?Sized>(
    walker: &mut W,
    events: Vec<SequenceEvent>,
) -> Vec<SequenceEvent> {
    let mut out = Vec::with_capacity(events.len());
    for event in events {
        out.extend(walker.visit_event(event));
    }
    out
}

/// Default event handling: fragments go to [`Walker::visit_fragment`], leaves are kept.
pub fn walk_event<W: Walker + ?Sized>(walker: &mut W, event: SequenceEvent) -> Replacement {
    match event {
        SequenceEvent::Fragment(fragment) => walker.visit_fragment(fragment),
        leaf => smallvec![leaf],
    }
}

/// Default fragment handling: walk every branch, keep the fragment.
pub fn walk_fragment<W: Walker + ?Sized>(walker: &mut W, fragment: SequenceFragment) -> Replacement {
    smallvec![SequenceEvent::Fragment(walk_branches(walker, fragment))]
}

pub fn walk_branches<W: Walker + ?Sized>(
    walker: &mut W,
    fragment: SequenceFragment,
) -> SequenceFragment {
    let SequenceFragment { operator, branches } = fragment;
    let branches = branches
        .into_iter()
        .map(|branch| FragmentBranch {
            condition: branch.condition,
            events: walk_events(walker, branch.events),
        })
        .collect();
    SequenceFragment::new(operator, branches)
}
