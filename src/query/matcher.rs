// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::fmt;

use regex::{Regex, RegexBuilder};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error)]
pub enum MatcherError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown regex flag `{0}` (expected any of `imsxU`)")]
    UnknownFlag(char),
}

/// Matches one text field of a tree node.
///
/// A literal matches by substring. A pattern is a regular expression, searched anywhere in the
/// text unless anchored. In JSON a literal is a bare string and a pattern is
/// `{ "pattern": "...", "flags": "i" }`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "MatcherRepr", into = "MatcherRepr")]
pub enum TextMatcher {
    Literal(String),
    Pattern(Pattern),
}

#[derive(Clone)]
pub struct Pattern {
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` with `flags`: `i` case-insensitive, `m` multi-line, `s` dot matches
    /// newline, `x` verbose, `U` swap greed.
    pub fn new(source: &str, flags: &str) -> Result<Self, MatcherError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'U' => builder.swap_greed(true),
                other => return Err(MatcherError::UnknownFlag(other)),
            };
        }
        let regex = builder.build().map_err(|source_err| MatcherError::InvalidPattern {
            pattern: source.to_owned(),
            source: source_err,
        })?;
        Ok(Self { flags: flags.to_owned(), regex })
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl TextMatcher {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn pattern(source: &str, flags: &str) -> Result<Self, MatcherError> {
        Pattern::new(source, flags).map(Self::Pattern)
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Literal(needle) => text.contains(needle.as_str()),
            Self::Pattern(pattern) => pattern.regex.is_match(text),
        }
    }
}

impl From<&str> for TextMatcher {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for TextMatcher {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<Regex> for TextMatcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(Pattern { flags: String::new(), regex })
    }
}

impl PartialEq for TextMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.source() == b.source() && a.flags == b.flags,
            _ => false,
        }
    }
}

impl fmt::Debug for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Pattern(pattern) => write!(f, "/{}/{}", pattern.source(), pattern.flags),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum MatcherRepr {
    /// Substring match.
    Literal(String),
    /// Regular expression.
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        flags: String,
    },
}

impl TryFrom<MatcherRepr> for TextMatcher {
    type Error = MatcherError;

    fn try_from(repr: MatcherRepr) -> Result<Self, Self::Error> {
        match repr {
            MatcherRepr::Literal(text) => Ok(Self::Literal(text)),
            MatcherRepr::Pattern { pattern, flags } => Self::pattern(&pattern, &flags),
        }
    }
}

impl From<TextMatcher> for MatcherRepr {
    fn from(matcher: TextMatcher) -> Self {
        match matcher {
            TextMatcher::Literal(text) => Self::Literal(text),
            TextMatcher::Pattern(pattern) => Self::Pattern {
                pattern: pattern.source().to_owned(),
                flags: pattern.flags,
            },
        }
    }
}

impl JsonSchema for TextMatcher {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("TextMatcher")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        MatcherRepr::json_schema(generator)
    }
}
