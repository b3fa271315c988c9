// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Selectors: declarative match criteria evaluated against tree nodes.

pub mod matcher;
pub mod selector;

pub use matcher::{MatcherError, Pattern, TextMatcher};
pub use selector::{
    BranchSelector, FragmentSelector, GroupSelector, MessageSelector, OperatorMatch,
    ParticipantSelector, Selector, SelectorKind,
};
