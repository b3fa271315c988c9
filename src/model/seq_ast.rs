// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialect-neutral sequence diagram tree.
//!
//! Participants and groups are flat lists; the event sequence is a strict forest where fragments
//! own their branches' events. Every rewrite pass consumes a tree and returns a new one.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::diagram::{DiagramMeta, Dialect};
use super::ids::{GroupId, ParticipantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceAst {
    meta: DiagramMeta,
    participants: Vec<SequenceParticipant>,
    groups: Vec<ParticipantGroup>,
    events: Vec<SequenceEvent>,
}

impl SequenceAst {
    pub fn new(source_dialect: Dialect) -> Self {
        Self::from_parts(DiagramMeta::new(source_dialect), Vec::new(), Vec::new(), Vec::new())
    }

    pub fn from_parts(
        meta: DiagramMeta,
        participants: Vec<SequenceParticipant>,
        groups: Vec<ParticipantGroup>,
        events: Vec<SequenceEvent>,
    ) -> Self {
        Self { meta, participants, groups, events }
    }

    pub fn into_parts(
        self,
    ) -> (DiagramMeta, Vec<SequenceParticipant>, Vec<ParticipantGroup>, Vec<SequenceEvent>) {
        (self.meta, self.participants, self.groups, self.events)
    }

    pub fn meta(&self) -> &DiagramMeta {
        &self.meta
    }

    pub fn participants(&self) -> &[SequenceParticipant] {
        &self.participants
    }

    pub fn participants_mut(&mut self) -> &mut Vec<SequenceParticipant> {
        &mut self.participants
    }

    pub fn participant(&self, participant_id: &ParticipantId) -> Option<&SequenceParticipant> {
        self.participants.iter().find(|p| p.id() == participant_id)
    }

    pub fn groups(&self) -> &[ParticipantGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut Vec<ParticipantGroup> {
        &mut self.groups
    }

    pub fn events(&self) -> &[SequenceEvent] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Vec<SequenceEvent> {
        &mut self.events
    }

    /// Swaps the event forest, keeping participants, groups, and metadata.
    pub fn with_events(mut self, events: Vec<SequenceEvent>) -> Self {
        self.events = events;
        self
    }

    /// Messages in document order, descending into every fragment branch.
    pub fn messages(&self) -> Vec<&SequenceMessage> {
        fn collect<'a>(events: &'a [SequenceEvent], out: &mut Vec<&'a SequenceMessage>) {
            for event in events {
                match event {
                    SequenceEvent::Message(message) => out.push(message),
                    SequenceEvent::Fragment(fragment) => {
                        for branch in &fragment.branches {
                            collect(&branch.events, out);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.events, &mut out);
        out
    }

    /// Total number of events, counting fragments and everything nested inside them.
    pub fn event_count(&self) -> usize {
        fn count(events: &[SequenceEvent]) -> usize {
            events
                .iter()
                .map(|event| match event {
                    SequenceEvent::Fragment(fragment) => {
                        1 + fragment.branches.iter().map(|b| count(&b.events)).sum::<usize>()
                    }
                    _ => 1,
                })
                .sum()
        }

        count(&self.events)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Actor,
    #[default]
    Participant,
    Database,
    Boundary,
    Control,
    Entity,
    Collection,
    Queue,
}

impl ParticipantKind {
    /// Declaration keyword shared by both dialects.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Participant => "participant",
            Self::Database => "database",
            Self::Boundary => "boundary",
            Self::Control => "control",
            Self::Entity => "entity",
            Self::Collection => "collections",
            Self::Queue => "queue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceParticipant {
    id: ParticipantId,
    name: String,
    #[serde(rename = "type")]
    kind: ParticipantKind,
}

impl SequenceParticipant {
    /// A participant whose display name equals its id, as produced by implicit declaration.
    pub fn new(id: ParticipantId) -> Self {
        let name = id.as_str().to_owned();
        Self { id, name, kind: ParticipantKind::Participant }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: ParticipantKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_kind(&mut self, kind: ParticipantKind) {
        self.kind = kind;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// A visual box around participants. Not part of the event forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantGroup {
    id: GroupId,
    name: String,
    participant_ids: Vec<ParticipantId>,
    #[serde(default)]
    style: GroupStyle,
}

impl ParticipantGroup {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), participant_ids: Vec::new(), style: GroupStyle::default() }
    }

    pub fn with_background_color<T: Into<String>>(mut self, color: Option<T>) -> Self {
        self.style.background_color = color.map(Into::into);
        self
    }

    pub fn with_participants(mut self, participant_ids: Vec<ParticipantId>) -> Self {
        self.participant_ids = participant_ids;
        self
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn participant_ids(&self) -> &[ParticipantId] {
        &self.participant_ids
    }

    pub fn participant_ids_mut(&mut self) -> &mut Vec<ParticipantId> {
        &mut self.participant_ids
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participant_ids.contains(participant_id)
    }

    pub fn style(&self) -> &GroupStyle {
        &self.style
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SequenceEvent {
    Message(SequenceMessage),
    Fragment(SequenceFragment),
    Note(SequenceNote),
    Divider(Divider),
    Spacer(Spacer),
    Activation(Activation),
    Reference(Reference),
}

impl SequenceEvent {
    /// Participant ids referenced directly by this node; fragments reference none themselves.
    pub fn participant_refs(&self) -> SmallVec<[&ParticipantId; 2]> {
        match self {
            Self::Message(message) => message.from.iter().chain(message.to.iter()).collect(),
            Self::Note(note) => note.participant_ids.iter().collect(),
            Self::Reference(reference) => reference.participant_ids.iter().collect(),
            Self::Activation(activation) => SmallVec::from_elem(&activation.participant_id, 1),
            Self::Fragment(_) | Self::Divider(_) | Self::Spacer(_) => SmallVec::new(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Sync,
    Reply,
    Async,
    Destroy,
    Create,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    #[default]
    Arrow,
    Open,
    Async,
    Cross,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageStyle {
    pub line: LineStyle,
    pub head: ArrowHead,
}

impl MessageStyle {
    pub const fn new(line: LineStyle, head: ArrowHead) -> Self {
        Self { line, head }
    }

    /// The message kind implied by the arrow alone.
    pub fn implied_kind(self) -> MessageKind {
        match (self.line, self.head) {
            (_, ArrowHead::Async) => MessageKind::Async,
            (LineStyle::Dotted, _) => MessageKind::Reply,
            (LineStyle::Solid, _) => MessageKind::Sync,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLifecycle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub activate_target: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deactivate_source: bool,
}

impl MessageLifecycle {
    pub fn is_empty(&self) -> bool {
        !self.activate_target && !self.deactivate_source
    }
}

/// A message between participants. A missing `from` is a found message, a missing `to` a lost
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ParticipantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ParticipantId>,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub style: MessageStyle,
    #[serde(default, skip_serializing_if = "MessageLifecycle::is_empty")]
    pub lifecycle: MessageLifecycle,
}

impl SequenceMessage {
    pub fn new(
        from: Option<ParticipantId>,
        to: Option<ParticipantId>,
        style: MessageStyle,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            text: text.into(),
            kind: style.implied_kind(),
            style,
            lifecycle: MessageLifecycle::default(),
        }
    }

    pub fn touches(&self, participant_id: &ParticipantId) -> bool {
        self.from.as_ref() == Some(participant_id) || self.to.as_ref() == Some(participant_id)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FragmentOperator {
    Alt,
    Opt,
    Loop,
    Par,
    Critical,
    Break,
    Rect,
}

impl FragmentOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Loop => "loop",
            Self::Par => "par",
            Self::Critical => "critical",
            Self::Break => "break",
            Self::Rect => "rect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceFragment {
    pub operator: FragmentOperator,
    pub branches: Vec<FragmentBranch>,
}

impl SequenceFragment {
    pub fn new(operator: FragmentOperator, branches: Vec<FragmentBranch>) -> Self {
        Self { operator, branches }
    }

    /// True when no branch holds any event.
    pub fn is_hollow(&self) -> bool {
        self.branches.iter().all(|branch| branch.events.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentBranch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub events: Vec<SequenceEvent>,
}

impl FragmentBranch {
    pub fn new<T: Into<String>>(condition: Option<T>, events: Vec<SequenceEvent>) -> Self {
        Self { condition: condition.map(Into::into), events }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePosition {
    Left,
    Right,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceNote {
    pub position: NotePosition,
    pub participant_ids: Vec<ParticipantId>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationAction {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    pub participant_id: ParticipantId,
    pub action: ActivationAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub participant_ids: Vec<ParticipantId>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}
