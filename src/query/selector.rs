// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::matcher::TextMatcher;
use crate::model::{
    FragmentBranch, FragmentOperator, MessageKind, ParticipantGroup, ParticipantId,
    ParticipantKind, SequenceAst, SequenceFragment, SequenceMessage, SequenceParticipant,
};

/// Declarative match criteria for one kind of tree node.
///
/// Every present field must match (conjunction); absent fields impose no constraint, so a
/// selector with no fields matches every node of its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selector {
    Participant(ParticipantSelector),
    Message(MessageSelector),
    Group(GroupSelector),
    Fragment(FragmentSelector),
    Branch(BranchSelector),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Participant,
    Message,
    Group,
    Fragment,
    Branch,
}

impl SelectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Message => "message",
            Self::Group => "group",
            Self::Fragment => "fragment",
            Self::Branch => "branch",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParticipantSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TextMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatcher>,
    /// Shorthand: matches when either the id or the name matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMatcher>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParticipantKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MessageSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<TextMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<TextMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMatcher>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GroupSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TextMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextMatcher>,
}

/// Matches a fragment by operator, and by condition when any of its branches matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FragmentSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<TextMatcher>,
}

/// Matches one branch: its own condition, and the operator of the fragment enclosing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BranchSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<TextMatcher>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OperatorMatch {
    One(FragmentOperator),
    AnyOf(Vec<FragmentOperator>),
}

impl OperatorMatch {
    pub fn contains(&self, operator: FragmentOperator) -> bool {
        match self {
            Self::One(expected) => *expected == operator,
            Self::AnyOf(expected) => expected.contains(&operator),
        }
    }
}

impl From<FragmentOperator> for OperatorMatch {
    fn from(operator: FragmentOperator) -> Self {
        Self::One(operator)
    }
}

fn field_matches(matcher: Option<&TextMatcher>, text: &str) -> bool {
    matcher.map_or(true, |matcher| matcher.is_match(text))
}

/// A missing value (no condition, a found/lost endpoint) never satisfies a present field.
fn optional_field_matches(matcher: Option<&TextMatcher>, text: Option<&str>) -> bool {
    match (matcher, text) {
        (None, _) => true,
        (Some(matcher), Some(text)) => matcher.is_match(text),
        (Some(_), None) => false,
    }
}

fn condition_matches(
    operator: Option<&OperatorMatch>,
    condition: Option<&TextMatcher>,
    fragment_operator: FragmentOperator,
    branch: &FragmentBranch,
) -> bool {
    operator.map_or(true, |operator| operator.contains(fragment_operator))
        && optional_field_matches(condition, branch.condition.as_deref())
}

impl ParticipantSelector {
    pub fn by_id(matcher: impl Into<TextMatcher>) -> Self {
        Self { id: Some(matcher.into()), ..Self::default() }
    }

    pub fn by_text(matcher: impl Into<TextMatcher>) -> Self {
        Self { text: Some(matcher.into()), ..Self::default() }
    }

    pub fn matches(&self, participant: &SequenceParticipant) -> bool {
        let id = participant.id().as_str();
        field_matches(self.id.as_ref(), id)
            && field_matches(self.name.as_ref(), participant.name())
            && self
                .text
                .as_ref()
                .map_or(true, |text| text.is_match(id) || text.is_match(participant.name()))
            && self.kind.map_or(true, |kind| kind == participant.kind())
    }

    /// Ids of the declared participants this selector matches.
    pub fn matching_ids(&self, ast: &SequenceAst) -> HashSet<ParticipantId> {
        ast.participants()
            .iter()
            .filter(|participant| self.matches(participant))
            .map(|participant| participant.id().clone())
            .collect()
    }
}

impl MessageSelector {
    pub fn matches(&self, message: &SequenceMessage) -> bool {
        optional_field_matches(self.from.as_ref(), message.from.as_ref().map(|id| id.as_str()))
            && optional_field_matches(self.to.as_ref(), message.to.as_ref().map(|id| id.as_str()))
            && field_matches(self.text.as_ref(), &message.text)
            && self.kind.map_or(true, |kind| kind == message.kind)
    }
}

impl GroupSelector {
    pub fn matches(&self, group: &ParticipantGroup) -> bool {
        field_matches(self.id.as_ref(), group.id().as_str())
            && field_matches(self.name.as_ref(), group.name())
    }
}

impl FragmentSelector {
    pub fn matches(&self, fragment: &SequenceFragment) -> bool {
        let operator_ok =
            self.operator.as_ref().map_or(true, |operator| operator.contains(fragment.operator));
        operator_ok
            && (self.condition.is_none()
                || fragment.branches.iter().any(|branch| self.matches_branch(fragment.operator, branch)))
    }

    pub fn matches_branch(&self, operator: FragmentOperator, branch: &FragmentBranch) -> bool {
        condition_matches(self.operator.as_ref(), self.condition.as_ref(), operator, branch)
    }
}

impl BranchSelector {
    pub fn matches(&self, operator: FragmentOperator, branch: &FragmentBranch) -> bool {
        condition_matches(self.operator.as_ref(), self.condition.as_ref(), operator, branch)
    }
}

impl Selector {
    pub fn kind(&self) -> SelectorKind {
        match self {
            Self::Participant(_) => SelectorKind::Participant,
            Self::Message(_) => SelectorKind::Message,
            Self::Group(_) => SelectorKind::Group,
            Self::Fragment(_) => SelectorKind::Fragment,
            Self::Branch(_) => SelectorKind::Branch,
        }
    }

    pub fn matches_message(&self, message: &SequenceMessage) -> bool {
        matches!(self, Self::Message(selector) if selector.matches(message))
    }

    pub fn matches_group(&self, group: &ParticipantGroup) -> bool {
        matches!(self, Self::Group(selector) if selector.matches(group))
    }

    pub fn matches_fragment(&self, fragment: &SequenceFragment) -> bool {
        matches!(self, Self::Fragment(selector) if selector.matches(fragment))
    }

    /// Branch matching needs the enclosing fragment's operator. Fragment selectors also match
    /// branches, with the same fields.
    pub fn matches_branch(&self, operator: FragmentOperator, branch: &FragmentBranch) -> bool {
        match self {
            Self::Branch(selector) => selector.matches(operator, branch),
            Self::Fragment(selector) => selector.matches_branch(operator, branch),
            _ => false,
        }
    }

    /// Ids of the declared participants this selector matches, empty for other kinds.
    pub fn matching_participants(&self, ast: &SequenceAst) -> HashSet<ParticipantId> {
        match self {
            Self::Participant(selector) => selector.matching_ids(ast),
            _ => HashSet::new(),
        }
    }
}

impl From<ParticipantSelector> for Selector {
    fn from(selector: ParticipantSelector) -> Self {
        Self::Participant(selector)
    }
}

impl From<MessageSelector> for Selector {
    fn from(selector: MessageSelector) -> Self {
        Self::Message(selector)
    }
}

impl From<GroupSelector> for Selector {
    fn from(selector: GroupSelector) -> Self {
        Self::Group(selector)
    }
}

impl From<FragmentSelector> for Selector {
    fn from(selector: FragmentSelector) -> Self {
        Self::Fragment(selector)
    }
}

impl From<BranchSelector> for Selector {
    fn from(selector: BranchSelector) -> Self {
        Self::Branch(selector)
    }
}
