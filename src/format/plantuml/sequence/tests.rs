// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{parse_sequence_diagram, parse_with_diagnostics};
use crate::format::plantuml::export_sequence_diagram;
use crate::format::ParseError;
use crate::model::{
    ArrowHead, Dialect, FragmentOperator, LineStyle, MessageKind, NotePosition, ParticipantKind,
    SequenceAst, SequenceEvent,
};

fn parse(input: &str) -> SequenceAst {
    parse_sequence_diagram(input).expect("parse")
}

fn endpoints(ast: &SequenceAst) -> Vec<(Option<&str>, Option<&str>)> {
    ast.messages()
        .iter()
        .map(|m| (m.from.as_ref().map(|p| p.as_str()), m.to.as_ref().map(|p| p.as_str())))
        .collect()
}

#[test]
fn messages_until_enduml() {
    let ast = parse("@startuml\nAlice -> Bob : hello\nBob --> Alice : hi\n@enduml\nCarol -> Dave\n");
    let ids = ast.participants().iter().map(|p| p.id().as_str()).collect::<Vec<_>>();
    assert_eq!(ids, ["Alice", "Bob"]);
    let kinds = ast.messages().iter().map(|m| m.kind).collect::<Vec<_>>();
    assert_eq!(kinds, [MessageKind::Sync, MessageKind::Reply]);
    assert_eq!(ast.meta().source_dialect, Dialect::PlantUml);
}

#[rstest]
#[case("->", LineStyle::Solid, ArrowHead::Arrow, MessageKind::Sync)]
#[case("-->", LineStyle::Dotted, ArrowHead::Arrow, MessageKind::Reply)]
#[case("->>", LineStyle::Solid, ArrowHead::Open, MessageKind::Sync)]
#[case("-->>", LineStyle::Dotted, ArrowHead::Open, MessageKind::Reply)]
#[case("->x", LineStyle::Solid, ArrowHead::Cross, MessageKind::Sync)]
#[case("-->x", LineStyle::Dotted, ArrowHead::Cross, MessageKind::Reply)]
#[case("-\\", LineStyle::Solid, ArrowHead::Async, MessageKind::Async)]
#[case("--\\", LineStyle::Dotted, ArrowHead::Async, MessageKind::Async)]
fn every_arrow_spelling(
    #[case] arrow: &str,
    #[case] line: LineStyle,
    #[case] head: ArrowHead,
    #[case] kind: MessageKind,
) {
    let ast = parse(&format!("A {arrow} B : hi\n"));
    let message = ast.messages()[0];
    assert_eq!((message.style.line, message.style.head, message.kind), (line, head, kind));
    assert_eq!(message.text, "hi");
}

#[test]
fn reversed_found_and_lost_messages() {
    let ast = parse("B <-- A : back\n[-> A : incoming\nA ->] : outgoing\n");
    assert_eq!(
        endpoints(&ast),
        [(Some("A"), Some("B")), (None, Some("A")), (Some("A"), None)]
    );
    assert_eq!(ast.messages()[0].kind, MessageKind::Reply);
}

#[test]
fn lifecycle_shortcuts() {
    let ast = parse("A -> B ++ : call\nB --> A -- : ret\n");
    assert!(ast.messages()[0].lifecycle.activate_target);
    assert!(ast.messages()[1].lifecycle.deactivate_source);
    assert_eq!(ast.messages()[1].text, "ret");
}

#[test]
fn declarations_with_aliases_and_colors() {
    let ast = parse(
        "participant \"Long Name\" as L #red\nactor Bob as B\nparticipant C as \"Charlie\"\ncollections Items\n",
    );
    let described = ast
        .participants()
        .iter()
        .map(|p| (p.id().as_str(), p.name(), p.kind()))
        .collect::<Vec<_>>();
    assert_eq!(
        described,
        [
            ("L", "Long Name", ParticipantKind::Participant),
            ("B", "Bob", ParticipantKind::Actor),
            ("C", "Charlie", ParticipantKind::Participant),
            ("Items", "Items", ParticipantKind::Collection),
        ]
    );
    assert!(parse_with_diagnostics("participant \"Long Name\" as L #red\n")
        .expect("parse")
        .skipped
        .is_empty());
}

#[test]
fn create_marks_next_message_and_destroy_marks_previous() {
    let ast = parse(
        "A -> B : hi\ncreate control Worker\nA -> Worker : spawn\nWorker -> A : bye\ndestroy Worker\n",
    );
    let kinds = ast.messages().iter().map(|m| m.kind).collect::<Vec<_>>();
    assert_eq!(kinds, [MessageKind::Sync, MessageKind::Create, MessageKind::Destroy]);
    assert_eq!(ast.participants()[2].kind(), ParticipantKind::Control);
}

#[test]
fn single_and_multi_line_annotations() {
    let ast = parse(
        "\
note left of A : one
note over A, B
  first line
  second line
end note
ref over A, B : see other
ref over B
  details
end ref
",
    );
    assert_eq!(ast.events().len(), 4);
    let SequenceEvent::Note(left) = &ast.events()[0] else {
        panic!("expected note");
    };
    assert_eq!((left.position, left.text.as_str()), (NotePosition::Left, "one"));
    let SequenceEvent::Note(over) = &ast.events()[1] else {
        panic!("expected note");
    };
    assert_eq!(over.participant_ids.len(), 2);
    assert_eq!(over.text, "first line\nsecond line");
    let SequenceEvent::Reference(single) = &ast.events()[2] else {
        panic!("expected reference");
    };
    assert_eq!(single.text, "see other");
    let SequenceEvent::Reference(multi) = &ast.events()[3] else {
        panic!("expected reference");
    };
    assert_eq!(multi.text, "details");
}

#[test]
fn dividers_and_spacers() {
    let ast = parse("A -> B\n== Phase 1 ==\n...\n... 5 minutes later ...\n|||\n");
    let texts = ast.events()[1..]
        .iter()
        .map(|event| match event {
            SequenceEvent::Divider(divider) => ("divider", divider.text.as_deref()),
            SequenceEvent::Spacer(spacer) => ("spacer", spacer.text.as_deref()),
            other => panic!("unexpected {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        texts,
        [
            ("divider", Some("Phase 1")),
            ("spacer", None),
            ("spacer", Some("5 minutes later")),
            ("spacer", None),
        ]
    );
}

#[test]
fn fragments_and_groups() {
    let ast = parse(
        "\
alt success
    A -> B : OK
else failure
    A -> B : Error
end
group Retry policy
    par
        A -> C : one
    else
        A -> D : two
    end
end
",
    );
    let SequenceEvent::Fragment(alt) = &ast.events()[0] else {
        panic!("expected fragment");
    };
    assert_eq!(alt.operator, FragmentOperator::Alt);
    let conditions = alt.branches.iter().map(|b| b.condition.as_deref()).collect::<Vec<_>>();
    assert_eq!(conditions, [Some("success"), Some("failure")]);

    let SequenceEvent::Fragment(group) = &ast.events()[1] else {
        panic!("expected fragment");
    };
    assert_eq!(group.operator, FragmentOperator::Rect);
    assert_eq!(group.branches[0].condition.as_deref(), Some("Retry policy"));
    let SequenceEvent::Fragment(par) = &group.branches[0].events[0] else {
        panic!("expected nested fragment");
    };
    assert_eq!(par.branches.len(), 2);
    assert_eq!(par.branches[1].condition, None);
}

#[test]
fn boxes_keep_hex_colors_and_strip_named_ones() {
    let ast = parse(
        "box \"Internal\" #LightBlue\nparticipant A\nparticipant B\nend box\nbox \"Hex\" #ffeeaa\nparticipant C\nend box\nA -> C\n",
    );
    let groups = ast
        .groups()
        .iter()
        .map(|g| (g.name(), g.style().background_color.as_deref(), g.participant_ids().len()))
        .collect::<Vec<_>>();
    assert_eq!(groups, [("Internal", Some("LightBlue"), 2), ("Hex", Some("#ffeeaa"), 1)]);
}

#[test]
fn directives_and_comments_are_not_reported() {
    let out = parse_with_diagnostics(
        "@startuml\n' setup\nautonumber\nskinparam monochrome true\nhide footbox\nA -> B : it's ok\n@enduml\n",
    )
    .expect("parse");
    assert!(out.skipped.is_empty());
    assert_eq!(out.ast.messages()[0].text, "it's ok");
}

#[test]
fn stray_tokens_are_skipped_and_reported() {
    let out = parse_with_diagnostics("A -> B : hi\n% weird %\nB -> A\n").expect("parse");
    assert_eq!(out.ast.messages().len(), 2);
    assert_eq!(out.skipped.len(), 1);
    assert_eq!((out.skipped[0].line, out.skipped[0].text.as_str()), (2, "% weird %"));
}

#[rstest]
#[case("")]
#[case("\n   \n")]
#[case("' only a comment\n")]
fn blank_input_is_rejected(#[case] input: &str) {
    assert!(matches!(
        parse_sequence_diagram(input),
        Err(ParseError::EmptyInput { dialect: Dialect::PlantUml })
    ));
}

#[test]
fn export_reparses_to_the_same_tree() {
    let source = "\
@startuml
title Payment
actor User
box \"Shop\" #LightBlue
participant \"Web Front\" as Web
database DB
end box
User -> Web ++ : buy
create control Worker
Web ->> Worker : spawn
Web -\\ DB : write
alt ok
    DB --> Web : done
else
    DB -->x Web : failed
end
group retry
    Web ->x DB : again
end
note right of DB
  stored
  twice
end note
== Finish ==
...later...
|||
ref over User, Web : receipt
[-> Web : ping
Web ->] : pong
Worker --> Web -- : finished
destroy Worker
@enduml
";
    let first = parse(source);
    assert!(parse_with_diagnostics(source).expect("parse").skipped.is_empty());
    let exported = export_sequence_diagram(&first);
    let second = parse(&exported);
    assert_eq!(first, second, "exported:\n{exported}");
}
