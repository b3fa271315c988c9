// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Seqlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use super::scanner::is_ident_char;

/// Renders a participant id so that the dialect lexer reads it back as one token: bare when it
/// is a plain identifier that is not a keyword, otherwise double-quoted.
///
/// Neither dialect can escape `"` inside a quoted string, so embedded quotes become `'`.
pub(crate) fn render_ident<'a>(ident: &'a str, is_keyword: impl Fn(&str) -> bool) -> Cow<'a, str> {
    let bare = !ident.is_empty() && ident.chars().all(is_ident_char) && !is_keyword(ident);
    if bare {
        Cow::Borrowed(ident)
    } else {
        Cow::Owned(format!("\"{}\"", ident.replace('"', "'")))
    }
}
