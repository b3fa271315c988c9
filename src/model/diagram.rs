// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Version stamped into every tree's metadata; bumped when the JSON shape changes.
pub const SCHEMA_VERSION: u32 = 1;

/// The concrete text syntax a diagram was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Mermaid `sequenceDiagram` (box-and-arrow style).
    Mermaid,
    /// PlantUML `@startuml` sequence text (UML-annotation style).
    PlantUml,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
        }
    }

    /// Maps a file extension (with or without the leading dot) to a dialect.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        match ext.to_ascii_lowercase().as_str() {
            "mmd" | "mermaid" => Some(Self::Mermaid),
            "puml" | "plantuml" | "pu" | "iuml" | "wsd" => Some(Self::PlantUml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    /// Sniffs the dialect from the first meaningful line of `text`.
    ///
    /// Comment lines of either dialect are skipped. Returns `None` when the first statement is not
    /// a header of either dialect.
    pub fn detect(text: &str) -> Option<Self> {
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("%%") || trimmed.starts_with('\'') {
                continue;
            }
            let lower = trimmed.to_ascii_lowercase();
            if lower.starts_with("sequencediagram") {
                return Some(Self::Mermaid);
            }
            if lower.starts_with("@startuml") {
                return Some(Self::PlantUml);
            }
            return None;
        }
        None
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect: {0} (expected 'mermaid' or 'plantuml')")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            "plantuml" | "puml" | "uml" => Ok(Self::PlantUml),
            _ => Err(UnknownDialect(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMeta {
    pub schema_version: u32,
    pub source_dialect: Dialect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DiagramMeta {
    pub fn new(source_dialect: Dialect) -> Self {
        Self { schema_version: SCHEMA_VERSION, source_dialect, title: None }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::Dialect;

    #[rstest]
    #[case("sequenceDiagram\nA->>B: hi", Some(Dialect::Mermaid))]
    #[case("%% leading comment\n\n  sequenceDiagram", Some(Dialect::Mermaid))]
    #[case("' comment\n@startuml\nA -> B\n@enduml", Some(Dialect::PlantUml))]
    #[case("graph TD\nA-->B", None)]
    #[case("", None)]
    fn detects_dialect_from_header(#[case] text: &str, #[case] expected: Option<Dialect>) {
        assert_eq!(Dialect::detect(text), expected);
    }

    #[test]
    fn resolves_dialect_from_names_and_extensions() {
        assert_eq!("Mermaid".parse::<Dialect>(), Ok(Dialect::Mermaid));
        assert_eq!("puml".parse::<Dialect>(), Ok(Dialect::PlantUml));
        assert!("dot".parse::<Dialect>().is_err());
        assert_eq!(Dialect::from_extension(".mmd"), Some(Dialect::Mermaid));
        assert_eq!(Dialect::from_path(Path::new("views/api.PUML")), Some(Dialect::PlantUml));
        assert_eq!(Dialect::from_path(Path::new("README")), None);
    }
}
