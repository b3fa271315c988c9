// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rayon::prelude::*;

use super::clean::{clean_structure, clean_unused};
use super::focus::Focus;
use super::merge::Merge;
use super::remove::Remove;
use super::resolve::Resolve;
use super::rule::{Action, Rule, RuleSet};
use super::Filter;
use crate::model::SequenceAst;
use crate::query::Selector;

/// Runs `rules` in order, then the structure and unused cleaners.
///
/// Rules that cannot run (unknown action, or a selector kind the action does not accept) are
/// skipped with a warning; they never fail the pipeline.
pub fn transform(ast: SequenceAst, rules: &[Rule]) -> SequenceAst {
    let ast = rules.iter().fold(ast, apply_rule);

    let before = ast.event_count();
    let ast = clean_structure(ast);
    tracing::trace!(before, after = ast.event_count(), "structure cleaner");

    let before = ast.participants().len();
    let ast = clean_unused(ast);
    tracing::trace!(before, after = ast.participants().len(), "unused cleaner");
    ast
}

/// Applies one rule without running the cleaners.
pub fn apply_rule(ast: SequenceAst, rule: &Rule) -> SequenceAst {
    let Some(filter) = build_filter(rule) else {
        return ast;
    };
    tracing::trace!(filter = filter.name(), selector = %rule.selector.kind(), "applying rule");
    filter.apply(ast)
}

/// One pipeline per lens, each over its own copy of `ast`; results keep the order of `lenses`.
pub fn transform_lenses(ast: &SequenceAst, lenses: &[RuleSet]) -> Vec<SequenceAst> {
    lenses
        .par_iter()
        .map(|lens| {
            tracing::trace!(lens = lens.name.as_deref().unwrap_or(""), rules = lens.rules.len(), "running lens");
            transform(ast.clone(), &lens.rules)
        })
        .collect()
}

fn build_filter(rule: &Rule) -> Option<Box<dyn Filter + '_>> {
    let filter: Option<Box<dyn Filter + '_>> = match (&rule.action, &rule.selector) {
        (Action::Unknown(name), _) => {
            tracing::warn!(action = %name, "skipping rule with unknown action");
            return None;
        }
        (Action::Focus, Selector::Participant(selector)) => Some(boxed(Focus::new(selector))),
        (Action::Merge, Selector::Participant(selector)) => {
            Some(boxed(Merge::new(selector, rule.merge_target.as_ref())))
        }
        (Action::Remove, selector) => Remove::new(selector).map(boxed),
        (Action::Resolve, selector) => Resolve::new(selector).map(boxed),
        (Action::Focus | Action::Merge, _) => None,
    };
    if filter.is_none() {
        tracing::warn!(
            action = %rule.action,
            selector = %rule.selector.kind(),
            "skipping rule: action does not accept this selector kind"
        );
    }
    filter
}

fn boxed<'a, F: Filter + 'a>(filter: F) -> Box<dyn Filter + 'a> {
    Box::new(filter)
}

#[cfg(test)]
mod tests;
