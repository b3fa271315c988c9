// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! PlantUML sequence diagram parsing and exporting.

mod export;
mod lexer;
pub mod sequence;

pub use export::export_sequence_diagram;
pub use sequence::{parse_sequence_diagram, parse_with_diagnostics};
