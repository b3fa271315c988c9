// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ParticipantGroup, SequenceAst, SequenceParticipant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoxStep<'a> {
    Open(&'a ParticipantGroup),
    Close(&'a ParticipantGroup),
    Participant(&'a SequenceParticipant),
}

/// Rebuilds nested box markers around the participant declarations.
///
/// Groups only carry flat membership lists. For each participant (in declaration order) the
/// groups containing it, in group declaration order, form its chain; consecutive chains are
/// diffed by common prefix: groups past the prefix close innermost first, new ones open outermost
/// first. Whatever is still open after the last participant closes at the end.
pub(crate) fn plan_boxes(ast: &SequenceAst) -> Vec<BoxStep<'_>> {
    let mut steps = Vec::with_capacity(ast.participants().len() + ast.groups().len() * 2);
    let mut open: Vec<&ParticipantGroup> = Vec::new();

    for participant in ast.participants() {
        let chain = ast
            .groups()
            .iter()
            .filter(|group| group.contains(participant.id()))
            .collect::<Vec<_>>();
        let common = open
            .iter()
            .zip(chain.iter())
            .take_while(|(current, next)| current.id() == next.id())
            .count();

        while open.len() > common {
            if let Some(group) = open.pop() {
                steps.push(BoxStep::Close(group));
            }
        }
        for &group in &chain[common..] {
            steps.push(BoxStep::Open(group));
            open.push(group);
        }
        steps.push(BoxStep::Participant(participant));
    }

    while let Some(group) = open.pop() {
        steps.push(BoxStep::Close(group));
    }
    steps
}
