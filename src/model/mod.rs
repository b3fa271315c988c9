// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: the shared sequence diagram tree and its ids.

pub mod diagram;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod seq_ast;

pub use diagram::{DiagramMeta, Dialect, UnknownDialect, SCHEMA_VERSION};
pub use ids::{GroupId, Id, IdError, ParticipantId};
pub use seq_ast::{
    Activation, ActivationAction, ArrowHead, Divider, FragmentBranch, FragmentOperator,
    GroupStyle, LineStyle, MessageKind, MessageLifecycle, MessageStyle, NotePosition,
    ParticipantGroup, ParticipantKind, Reference, SequenceAst, SequenceEvent, SequenceFragment,
    SequenceMessage, SequenceNote, SequenceParticipant, Spacer,
};
