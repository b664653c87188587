// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sanitization of untrusted text input.

use std::{borrow::Cow, num::IntErrorKind};

/// Separator of list items in URL-encoded transports.
pub const LIST_SEPARATOR: char = ',';

/// Items of comma-separated lists that exceed this length are dropped.
pub const LIST_ITEM_MAX_CHARS: usize = 100;

pub fn trim_in_place(s: &mut String) {
    s.truncate(s.trim_end().len());
    let drain_start_len = s.len() - s.trim_start().len();
    drop(s.drain(0..drain_start_len));
}

/// Remove all markup tags, i.e. everything between `<` and `>`.
///
/// An unterminated tag swallows the remainder of the input.
#[must_use]
pub fn strip_tags(input: &str) -> Cow<'_, str> {
    if !input.contains('<') {
        return Cow::Borrowed(input);
    }
    let mut stripped = String::with_capacity(input.len());
    let mut inside_tag = false;
    for c in input.chars() {
        match c {
            '<' => inside_tag = true,
            '>' if inside_tag => inside_tag = false,
            _ if !inside_tag => stripped.push(c),
            _ => (),
        }
    }
    Cow::Owned(stripped)
}

/// Strip tags and surrounding whitespace.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    match strip_tags(input) {
        Cow::Borrowed(unchanged) => unchanged.trim().to_owned(),
        Cow::Owned(mut stripped) => {
            trim_in_place(&mut stripped);
            stripped
        }
    }
}

/// Split a comma-separated list into sanitized, non-empty items.
///
/// Items exceeding [`LIST_ITEM_MAX_CHARS`] are returned separately.
#[must_use]
pub fn split_list(input: &str) -> (Vec<String>, Vec<String>) {
    let mut items = Vec::new();
    let mut oversized = Vec::new();
    for item in input.split(LIST_SEPARATOR) {
        let item = sanitize_text(item);
        if item.is_empty() {
            continue;
        }
        if item.chars().count() > LIST_ITEM_MAX_CHARS {
            oversized.push(item);
        } else {
            items.push(item);
        }
    }
    (items, oversized)
}

/// Parse the textual representations of a boolean flag.
///
/// Case-insensitive, surrounding whitespace is ignored.
#[must_use]
pub fn parse_flag(input: &str) -> Option<bool> {
    let flag = match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => return None,
    };
    Some(flag)
}

/// Parse a (signed) decimal integer, ignoring surrounding whitespace.
///
/// Integers outside of the range of `i64` saturate.
#[must_use]
pub fn parse_integer(input: &str) -> Option<i64> {
    match input.trim().parse::<i64>() {
        Ok(integer) => Some(integer),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
