// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Stable cache keys of filter sets.

use std::{fmt, str::FromStr};

use bytes::{BufMut as _, BytesMut};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};

use crate::filter::{ActiveTab, Field, FieldValue, FilterSet};

pub const FINGERPRINT_LEN: usize = 16;

/// Truncated digest of the canonical serialization of a [`FilterSet`].
///
/// Displayed as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HEXLOWER.encode(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid fingerprint")]
pub struct ParseFingerprintError;

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let decoded = HEXLOWER_PERMISSIVE
            .decode(input.as_bytes())
            .map_err(|_| ParseFingerprintError)?;
        let bytes = decoded.try_into().map_err(|_| ParseFingerprintError)?;
        Ok(Self(bytes))
    }
}

const TAG_TEXT: u8 = 1;
const TAG_FLAG: u8 = 2;
const TAG_NUMBER: u8 = 3;
const TAG_LIST: u8 = 4;

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_u32(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn put_value(buf: &mut BytesMut, value: &FieldValue) {
    match value {
        FieldValue::Text(text) => {
            buf.put_u8(TAG_TEXT);
            put_str(buf, text);
        }
        FieldValue::Flag(flag) => {
            buf.put_u8(TAG_FLAG);
            buf.put_u8((*flag).into());
        }
        FieldValue::Number(number) => {
            buf.put_u8(TAG_NUMBER);
            buf.put_u32(*number);
        }
        FieldValue::List(items) => {
            let mut items: Vec<_> = items.iter().map(String::as_str).collect();
            items.sort_unstable();
            buf.put_u8(TAG_LIST);
            buf.put_u32(items.len() as u32);
            for item in items {
                put_str(buf, item);
            }
        }
    }
}

/// Length-prefixed serialization of all non-presentation fields in
/// canonical order.
fn canonical_bytes(filters: &FilterSet, active_tab: ActiveTab, page: u32) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);
    for field in Field::iter_all().filter(|field| !field.is_ui_only()) {
        let value = match field {
            Field::ActiveTab => FieldValue::Text(active_tab.as_str().to_owned()),
            Field::Page => FieldValue::Number(page),
            _ => filters.value(field),
        };
        put_str(&mut buf, field.name());
        put_value(&mut buf, &value);
    }
    buf
}

/// Calculate the fingerprint of a filter set.
///
/// The `active_tab` and `page` arguments override the corresponding
/// fields of `filters`.
#[must_use]
pub fn fingerprint(filters: &FilterSet, active_tab: ActiveTab, page: u32) -> Fingerprint {
    let hash = blake3::hash(&canonical_bytes(filters, active_tab, page));
    let mut bytes = [0; FINGERPRINT_LEN];
    bytes.copy_from_slice(&hash.as_bytes()[..FINGERPRINT_LEN]);
    Fingerprint(bytes)
}

impl FilterSet {
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(self, self.active_tab, self.page)
    }
}

#[cfg(test)]
mod tests;
