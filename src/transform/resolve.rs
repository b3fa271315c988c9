// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::walker::{walk_events, walk_fragment, Replacement, Walker};
use super::Filter;
use crate::model::{SequenceAst, SequenceFragment};
use crate::query::Selector;

/// Collapse fragments onto one branch.
///
/// The first branch (in declaration order) the selector accepts replaces its whole fragment;
/// fragments without such a branch stay and are searched further down.
pub struct Resolve<'a> {
    selector: &'a Selector,
}

impl<'a> Resolve<'a> {
    /// `None` unless the selector targets fragments or branches.
    pub fn new(selector: &'a Selector) -> Option<Self> {
        matches!(selector, Selector::Fragment(_) | Selector::Branch(_)).then_some(Self { selector })
    }
}

impl Filter for Resolve<'_> {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn apply(&self, ast: SequenceAst) -> SequenceAst {
        ResolveWalker { selector: self.selector }.transform(ast)
    }
}

struct ResolveWalker<'a> {
    selector: &'a Selector,
}

impl Walker for ResolveWalker<'_> {
    fn visit_fragment(&mut self, fragment: SequenceFragment) -> Replacement {
        let operator = fragment.operator;
        let chosen = fragment
            .branches
            .iter()
            .position(|branch| self.selector.matches_branch(operator, branch));
        let Some(index) = chosen else {
            return walk_fragment(self, fragment);
        };
        let mut branches = fragment.branches;
        let events = walk_events(self, branches.swap_remove(index).events);
        SmallVec::from_vec(events)
    }
}
