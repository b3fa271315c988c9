// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seqlens: one master sequence diagram, many derived views.
//!
//! Text in either dialect is parsed into a shared tree ([`model::SequenceAst`]), rewritten by an
//! ordered list of rules ([`transform::Rule`]) and rendered again in either dialect.

pub mod format;
pub mod model;
pub mod query;
pub mod transform;

pub use format::{generate, parse, parse_with_diagnostics, ParseError};
pub use model::{Dialect, SequenceAst};
pub use transform::{transform, transform_lenses, Rule, RuleSet};
