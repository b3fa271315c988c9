// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{apply_rule, transform, transform_lenses};
use crate::format::{generate, parse};
use crate::model::fixtures::{checkout, pid};
use crate::model::{Dialect, SequenceAst};
use crate::query::{MessageSelector, ParticipantSelector, TextMatcher};
use crate::transform::{clean_structure, clean_unused, Action, MergeTarget, Rule, RuleSet};

const LOGGER: &str = "\
sequenceDiagram
    participant Client
    participant Logger
    participant API
    Client->>API: request
    API->>Logger: log
    Logger-->>API: logged
    API-->>Client: response
";

fn texts(ast: &SequenceAst) -> Vec<&str> {
    ast.messages().iter().map(|message| message.text.as_str()).collect()
}

fn ids(ast: &SequenceAst) -> Vec<&str> {
    ast.participants().iter().map(|participant| participant.id().as_str()).collect()
}

#[test]
fn removing_the_logger_hides_it_from_the_output() {
    let ast = parse(Dialect::Mermaid, LOGGER).expect("parse");
    let out = transform(ast, &[Rule::remove(ParticipantSelector::by_id("Logger"))]);

    assert_eq!(ids(&out), ["Client", "API"]);
    assert_eq!(texts(&out), ["request", "response"]);
    let text = generate(Dialect::Mermaid, &out);
    assert!(!text.contains("Logger"), "{text}");
    let text = generate(Dialect::PlantUml, &out);
    assert!(!text.contains("Logger"), "{text}");
}

#[test]
fn cleaners_drop_what_focus_left_behind() {
    let out = transform(checkout(), &[Rule::focus(ParticipantSelector::by_id("Payments"))]);
    assert_eq!(ids(&out), ["Orders", "Payments", "Audit"]);
    assert_eq!(out.groups().len(), 1);
    assert_eq!(texts(&out), ["charge", "record attempt", "charged", "declined"]);
}

#[rstest]
#[case::unknown_action(Rule::new(Action::Unknown("highlight".to_owned()), ParticipantSelector::default()))]
#[case::focus_on_messages(Rule::new(Action::Focus, MessageSelector::default()))]
#[case::merge_on_messages(Rule::new(Action::Merge, MessageSelector::default()))]
#[case::resolve_on_participants(Rule::resolve(ParticipantSelector::default()))]
#[case::remove_branches(Rule::remove(crate::query::BranchSelector::default()))]
fn unusable_rules_are_no_ops(#[case] rule: Rule) {
    let source = checkout();
    assert_eq!(apply_rule(source.clone(), &rule), source);
    assert_eq!(transform(source.clone(), &[rule]), transform(source, &[]));
}

#[rstest]
#[case::single("Payments")]
#[case::substring("e")]
#[case::nobody("Nobody")]
fn focus_and_remove_partition_the_messages(#[case] text: &str) {
    let selector = ParticipantSelector::by_text(text);
    let focused = apply_rule(checkout(), &Rule::focus(selector.clone()));
    let removed = apply_rule(checkout(), &Rule::remove(selector));

    let source = checkout();
    let mut all = texts(&source);
    let mut both = texts(&focused);
    both.extend(texts(&removed));
    all.sort_unstable();
    both.sort_unstable();
    assert_eq!(both, all);
}

#[test]
fn rules_apply_in_order() {
    let target = MergeTarget::Id(pid("Backend"));
    let backend = ParticipantSelector::by_text(
        TextMatcher::pattern("^(Orders|Payments)$", "").expect("valid pattern"),
    );
    let merge_then_focus = [
        Rule::merge(backend, Some(target)),
        Rule::focus(ParticipantSelector::by_id("Backend")),
    ];
    let out = transform(checkout(), &merge_then_focus);
    assert_eq!(ids(&out), ["Web", "Backend", "Audit"]);
    assert_eq!(texts(&out), ["create order", "record attempt", "order id"]);

    // Focusing first leaves nothing named Backend to keep.
    let focus_then_merge = [merge_then_focus[1].clone(), merge_then_focus[0].clone()];
    let out = transform(checkout(), &focus_then_merge);
    assert!(out.events().is_empty());
    assert!(out.participants().is_empty());
}

#[test]
fn transform_output_is_already_clean() {
    let rules = [Rule::remove(ParticipantSelector::by_id("Audit"))];
    let once = transform(checkout(), &rules);
    assert_eq!(clean_unused(clean_structure(once.clone())), once);
    assert!(ids(&once).iter().all(|id| *id != "Audit"));
    // The loop only carried traffic to Audit and goes with it; the reference over Orders and
    // Audit is narrowed instead.
    assert_eq!(once.event_count(), checkout().event_count() - 2);
}

#[test]
fn lenses_run_independently_and_keep_their_order() {
    let json = r#"[
        {"name": "happy path", "rules": [
            {"action": "resolve", "selector": {"kind": "branch", "condition": "accepted"}}
        ]},
        {"name": "frontend", "rules": [
            {"action": "merge",
             "selector": {"kind": "participant", "id": {"pattern": "^(Orders|Payments|Audit)$"}},
             "mergeTarget": {"id": "Backend", "type": "entity"}}
        ]},
        {"rules": [{"action": "shrug", "selector": {"kind": "group"}}]}
    ]"#;
    let lenses: Vec<RuleSet> = serde_json::from_str(json).expect("lenses");
    let source = checkout();
    let views = transform_lenses(&source, &lenses);

    assert_eq!(views.len(), 3);
    assert!(texts(&views[0]).iter().all(|text| *text != "declined"));
    assert_eq!(ids(&views[1]), ["User", "Web", "Backend"]);
    assert_eq!(texts(&views[1]), ["checkout", "create order", "order id", "done"]);
    assert_eq!(views[2], source);
    assert_eq!(source, checkout());
}
