// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::bail;

use crate::prelude::*;

mod _core {
    pub(super) use filtersync_core::pagination::{PaginationInfo, paginate};
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: u64,
    pub per_page: u32,
    pub current_page: u64,
    pub last_page: u64,
    pub from: u64,
    pub to: u64,
    pub has_more_pages: bool,

    /// Human-readable summary, ignored when deserializing.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub showing: String,
}

impl From<_core::PaginationInfo> for PaginationInfo {
    fn from(from: _core::PaginationInfo) -> Self {
        Self {
            total: from.total(),
            per_page: from.per_page(),
            current_page: from.current_page(),
            last_page: from.last_page(),
            from: from.from(),
            to: from.to(),
            has_more_pages: from.has_more_pages(),
            showing: from.showing_text(),
        }
    }
}

/// Recalculates the derived values and rejects inconsistent input.
impl TryFrom<PaginationInfo> for _core::PaginationInfo {
    type Error = anyhow::Error;

    fn try_from(from: PaginationInfo) -> anyhow::Result<Self> {
        let into = _core::paginate(
            from.total,
            from.per_page.into(),
            from.current_page.try_into()?,
        );
        let recalculated = PaginationInfo::from(into);
        // The text is derived and not compared
        let expected = PaginationInfo {
            showing: recalculated.showing.clone(),
            ..from
        };
        if expected != recalculated {
            bail!("inconsistent pagination: {from:?}");
        }
        Ok(into)
    }
}
