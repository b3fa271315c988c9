// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree rewriting: filters driven by rules, followed by invariant repair.
//!
//! Every pass takes the tree by value and returns its successor. After the rules of a lens ran,
//! [`transform`] always cleans up: empty containers and dangling participant references first,
//! then participants and groups nothing refers to anymore.

pub mod clean;
mod engine;
pub mod focus;
pub mod merge;
pub mod remove;
pub mod resolve;
pub mod rule;
pub mod walker;

pub use clean::{clean_structure, clean_unused};
pub use engine::{apply_rule, transform, transform_lenses};
pub use focus::Focus;
pub use merge::Merge;
pub use remove::Remove;
pub use resolve::Resolve;
pub use rule::{rule_set_schema, Action, MergeTarget, Rule, RuleSet, RuleSetError};
pub use walker::{Replacement, Walker};

use crate::model::SequenceAst;

/// One rewrite pass.
pub trait Filter {
    fn name(&self) -> &'static str;

    fn apply(&self, ast: SequenceAst) -> SequenceAst;
}
