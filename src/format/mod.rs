// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram text parsing and generation.
//!
//! Two dialects share one tree: Mermaid `sequenceDiagram` and PlantUML sequence diagrams. Both
//! parsers are lenient: anything they cannot place in the tree is skipped (and reported through
//! `parse_with_diagnostics`); only input with no diagram content at all is an error.

mod boxes;
mod builder;
mod ident;
pub mod mermaid;
pub mod plantuml;
mod scanner;

pub use builder::{ParseOutput, SkippedSpan};

use crate::model::{Dialect, SequenceAst};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{dialect} input contains no diagram content")]
    EmptyInput { dialect: Dialect },
}

pub fn parse(dialect: Dialect, text: &str) -> Result<SequenceAst, ParseError> {
    parse_with_diagnostics(dialect, text).map(|out| out.ast)
}

pub fn parse_with_diagnostics(dialect: Dialect, text: &str) -> Result<ParseOutput, ParseError> {
    let out = match dialect {
        Dialect::Mermaid => mermaid::parse_with_diagnostics(text)?,
        Dialect::PlantUml => plantuml::parse_with_diagnostics(text)?,
    };
    if !out.skipped.is_empty() {
        tracing::debug!(%dialect, skipped = out.skipped.len(), "parsed with skipped input");
    }
    Ok(out)
}

/// Renders the tree in `dialect`, regardless of the dialect it was parsed from.
pub fn generate(dialect: Dialect, ast: &SequenceAst) -> String {
    match dialect {
        Dialect::Mermaid => mermaid::export_sequence_diagram(ast),
        Dialect::PlantUml => plantuml::export_sequence_diagram(ast),
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, parse, ParseError};
    use crate::model::fixtures::checkout;
    use crate::model::Dialect;

    #[test]
    fn dialects_translate_through_the_shared_tree() {
        let mut ast = checkout();
        // Mermaid has no reference syntax; it comes back as a note.
        ast.events_mut().retain(|event| !matches!(event, crate::model::SequenceEvent::Reference(_)));

        let plantuml = generate(Dialect::PlantUml, &ast);
        let from_plantuml = parse(Dialect::PlantUml, &plantuml).expect("plantuml");
        let mermaid = generate(Dialect::Mermaid, &from_plantuml);
        let from_mermaid = parse(Dialect::Mermaid, &mermaid).expect("mermaid");

        assert_eq!(from_mermaid.participants(), ast.participants());
        assert_eq!(from_mermaid.groups(), ast.groups());
        assert_eq!(from_mermaid.events(), ast.events());
    }

    #[test]
    fn empty_input_names_the_dialect() {
        let err = parse(Dialect::PlantUml, "' nothing here\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyInput { dialect: Dialect::PlantUml });
        assert_eq!(err.to_string(), "plantuml input contains no diagram content");
    }
}
