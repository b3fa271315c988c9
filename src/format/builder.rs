// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{
    DiagramMeta, Dialect, GroupId, ParticipantGroup, ParticipantId, ParticipantKind, SequenceAst,
    SequenceEvent, SequenceParticipant,
};

/// Input the parser could not place in the tree and stepped over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSpan {
    pub line: usize,
    pub column: usize,
    pub byte_start: usize,
    pub byte_end: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub ast: SequenceAst,
    pub skipped: Vec<SkippedSpan>,
}

/// Participant registry, open-box stack, and recovery log shared by both dialect parsers.
pub(crate) struct AstBuilder<'a> {
    source: &'a str,
    dialect: Dialect,
    title: Option<String>,
    participants: Vec<SequenceParticipant>,
    index: HashMap<ParticipantId, usize>,
    explicit: HashSet<ParticipantId>,
    groups: Vec<ParticipantGroup>,
    open_groups: Vec<usize>,
    skipped: Vec<SkippedSpan>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            title: None,
            participants: Vec::new(),
            index: HashMap::new(),
            explicit: HashSet::new(),
            groups: Vec::new(),
            open_groups: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: Option<String>) {
        if title.is_some() {
            self.title = title;
        }
    }

    /// Resolves a participant reference, declaring it implicitly on first use.
    pub fn reference(&mut self, raw: &str) -> Option<ParticipantId> {
        let participant_id = ParticipantId::new(raw.trim()).ok()?;
        if !self.index.contains_key(&participant_id) {
            self.index.insert(participant_id.clone(), self.participants.len());
            self.participants.push(SequenceParticipant::new(participant_id.clone()));
        }
        self.record_membership(&participant_id);
        Some(participant_id)
    }

    /// Explicit declaration. Refines an implicitly created participant, but the first explicit
    /// declaration of an id wins over later ones.
    pub fn declare(
        &mut self,
        raw: &str,
        name: Option<String>,
        kind: ParticipantKind,
    ) -> Option<ParticipantId> {
        let participant_id = self.reference(raw)?;
        if self.explicit.insert(participant_id.clone()) {
            if let Some(&idx) = self.index.get(&participant_id) {
                let participant = &mut self.participants[idx];
                participant.set_kind(kind);
                if let Some(name) = name.filter(|name| !name.is_empty()) {
                    participant.set_name(name);
                }
            }
        }
        Some(participant_id)
    }

    pub fn open_group(&mut self, name: String, color: Option<String>) {
        let ordinal = self.groups.len() + 1;
        let Ok(group_id) = GroupId::new(format!("group-{ordinal}")) else {
            return;
        };
        self.open_groups.push(self.groups.len());
        self.groups.push(ParticipantGroup::new(group_id, name).with_background_color(color));
    }

    pub fn close_group(&mut self) {
        self.open_groups.pop();
    }

    fn record_membership(&mut self, participant_id: &ParticipantId) {
        for &idx in &self.open_groups {
            let group = &mut self.groups[idx];
            if !group.contains(participant_id) {
                group.participant_ids_mut().push(participant_id.clone());
            }
        }
    }

    /// Logs a skipped byte range, merging it into the previous span when only whitespace
    /// separates them on the same line.
    pub fn skip(&mut self, line: usize, column: usize, start: usize, end: usize) {
        if let Some(last) = self.skipped.last_mut() {
            let gap = self.source.get(last.byte_end..start).unwrap_or("x");
            if last.line == line && gap.trim().is_empty() {
                last.byte_end = end;
                last.text = self.source[last.byte_start..end].to_owned();
                return;
            }
        }
        let text = self.source.get(start..end).unwrap_or_default().to_owned();
        tracing::debug!(line, column, text = %text, dialect = %self.dialect, "skipping unrecognized input");
        self.skipped.push(SkippedSpan { line, column, byte_start: start, byte_end: end, text });
    }

    pub fn finish(self, events: Vec<SequenceEvent>) -> ParseOutput {
        let mut meta = DiagramMeta::new(self.dialect);
        meta.title = self.title;
        // Members follow participant order, which is the order box markers are written in.
        let position = |id: &ParticipantId| self.index.get(id).copied().unwrap_or(usize::MAX);
        let groups = self
            .groups
            .into_iter()
            .filter(|group| !group.participant_ids().is_empty())
            .map(|mut group| {
                group.participant_ids_mut().sort_by_key(|id| position(id));
                group
            })
            .collect();
        ParseOutput {
            ast: SequenceAst::from_parts(meta, self.participants, groups, events),
            skipped: self.skipped,
        }
    }
}
