// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::model::{ParticipantId, ParticipantKind};
use crate::query::{ParticipantSelector, Selector};

#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("invalid rule set: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a rule does with the nodes its selector matches.
///
/// Unrecognized names are kept as [`Action::Unknown`]; the engine skips those rules with a
/// warning instead of rejecting the whole rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Focus,
    Remove,
    Resolve,
    Merge,
    Unknown(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Focus => "focus",
            Self::Remove => "remove",
            Self::Resolve => "resolve",
            Self::Merge => "merge",
            Self::Unknown(name) => name,
        }
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Self::Focus,
            "remove" => Self::Remove,
            "resolve" => Self::Resolve,
            "merge" => Self::Merge,
            _ => Self::Unknown(s.to_owned()),
        })
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for Action {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("Action")
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "description": "focus, remove, resolve or merge; other values are skipped with a warning",
            "examples": ["focus", "remove", "resolve", "merge"]
        })
    }
}

/// The participant that merged participants collapse into: a bare id, or an id with a display
/// name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MergeTarget {
    Id(ParticipantId),
    Participant {
        id: ParticipantId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<ParticipantKind>,
    },
}

impl MergeTarget {
    pub fn id(&self) -> &ParticipantId {
        match self {
            Self::Id(id) | Self::Participant { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Participant { name, .. } => name.as_deref(),
        }
    }

    pub fn kind(&self) -> Option<ParticipantKind> {
        match self {
            Self::Id(_) => None,
            Self::Participant { kind, .. } => *kind,
        }
    }
}

impl From<ParticipantId> for MergeTarget {
    fn from(id: ParticipantId) -> Self {
        Self::Id(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub action: Action,
    pub selector: Selector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_target: Option<MergeTarget>,
}

impl Rule {
    pub fn new(action: Action, selector: impl Into<Selector>) -> Self {
        Self { action, selector: selector.into(), merge_target: None }
    }

    pub fn focus(selector: ParticipantSelector) -> Self {
        Self::new(Action::Focus, selector)
    }

    pub fn remove(selector: impl Into<Selector>) -> Self {
        Self::new(Action::Remove, selector)
    }

    pub fn resolve(selector: impl Into<Selector>) -> Self {
        Self::new(Action::Resolve, selector)
    }

    pub fn merge(selector: ParticipantSelector, target: Option<MergeTarget>) -> Self {
        Self { merge_target: target, ..Self::new(Action::Merge, selector) }
    }
}

/// A named, ordered list of rules: one derived view ("lens") of a diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Deserializes a rule-set document. Shape checks beyond what deserialization enforces are
    /// left to the caller.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// JSON Schema of the rule-set document.
pub fn rule_set_schema() -> Schema {
    schemars::schema_for!(RuleSet)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{rule_set_schema, Action, MergeTarget, Rule, RuleSet, RuleSetError};
    use crate::model::fixtures::pid;
    use crate::model::ParticipantKind;
    use crate::query::{ParticipantSelector, Selector};

    #[test]
    fn actions_parse_case_insensitively_and_keep_unknown_names() {
        assert_eq!("Focus".parse::<Action>().unwrap(), Action::Focus);
        assert_eq!(" merge ".parse::<Action>().unwrap(), Action::Merge);
        assert_eq!("highlight".parse::<Action>().unwrap(), Action::Unknown("highlight".to_owned()));
        assert_eq!(String::from(Action::Resolve), "resolve");
    }

    #[test]
    fn rule_set_document_round_trips() {
        let json = r#"{
            "name": "backend-only",
            "rules": [
                {"action": "remove", "selector": {"kind": "participant", "id": "Logger"}},
                {"action": "merge",
                 "selector": {"kind": "participant", "name": {"pattern": "^Service [AB]$"}},
                 "mergeTarget": {"id": "System", "name": "Backend", "type": "entity"}},
                {"action": "explode", "selector": {"kind": "message"}}
            ]
        }"#;
        let set = RuleSet::from_json_str(json).unwrap();
        assert_eq!(set.name.as_deref(), Some("backend-only"));
        assert_eq!(set.rules.len(), 3);
        assert_eq!(set.rules[0], Rule::remove(ParticipantSelector::by_id("Logger")));
        let target = set.rules[1].merge_target.as_ref().unwrap();
        assert_eq!(target.id(), &pid("System"));
        assert_eq!(target.name(), Some("Backend"));
        assert_eq!(target.kind(), Some(ParticipantKind::Entity));
        assert_eq!(set.rules[2].action, Action::Unknown("explode".to_owned()));

        let reparsed: RuleSet =
            serde_json::from_value(serde_json::to_value(&set).unwrap()).unwrap();
        assert_eq!(reparsed, set);
    }

    #[test]
    fn merge_target_accepts_a_bare_id() {
        let rule: Rule = serde_json::from_value(json!({
            "action": "merge",
            "selector": {"kind": "participant", "text": "Service"},
            "mergeTarget": "System"
        }))
        .unwrap();
        assert_eq!(rule.merge_target, Some(MergeTarget::Id(pid("System"))));
        assert!(matches!(rule.selector, Selector::Participant(_)));
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(RuleSet::from_json_str("{"), Err(RuleSetError::Json(_))));
        let missing_selector = r#"{"rules": [{"action": "focus"}]}"#;
        assert!(RuleSet::from_json_str(missing_selector).is_err());
        let bad_pattern =
            r#"{"rules": [{"action": "focus", "selector": {"kind": "participant", "id": {"pattern": "("}}}]}"#;
        assert!(RuleSet::from_json_str(bad_pattern).is_err());
    }

    #[test]
    fn schema_describes_rules() {
        let schema = serde_json::to_value(rule_set_schema()).unwrap();
        let text = schema.to_string();
        assert!(text.contains("mergeTarget"));
        assert!(text.contains("rules"));
        assert!(text.contains("\"participant\""));
    }
}
