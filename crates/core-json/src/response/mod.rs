// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::anyhow;
use jiff::Timestamp;

use crate::{
    filter::{FieldValue, FilterSet},
    pagination::PaginationInfo,
    prelude::*,
};

mod _core {
    pub(super) use filtersync_core::{
        filter::Field,
        fingerprint::Fingerprint,
        response::{ResponseEnvelope, ResponseMeta, ResponseStatus},
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    Loading,
    Empty,
}

impl From<ResponseStatus> for _core::ResponseStatus {
    fn from(from: ResponseStatus) -> Self {
        match from {
            ResponseStatus::Success => Self::Success,
            ResponseStatus::Error => Self::Error,
            ResponseStatus::Loading => Self::Loading,
            ResponseStatus::Empty => Self::Empty,
        }
    }
}

impl From<_core::ResponseStatus> for ResponseStatus {
    fn from(from: _core::ResponseStatus) -> Self {
        match from {
            _core::ResponseStatus::Success => Self::Success,
            _core::ResponseStatus::Error => Self::Error,
            _core::ResponseStatus::Loading => Self::Loading,
            _core::ResponseStatus::Empty => Self::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub field: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub has_search: bool,
    pub active_filters_count: usize,
    pub has_active_filters: bool,
    pub active_filters: Vec<ActiveFilter>,
    pub timestamp: Timestamp,
}

impl From<_core::ResponseMeta> for ResponseMeta {
    fn from(from: _core::ResponseMeta) -> Self {
        let _core::ResponseMeta {
            has_search,
            active_filters_count,
            has_active_filters,
            active_filters,
            timestamp,
        } = from;
        let active_filters = active_filters
            .into_iter()
            .map(|(field, value)| ActiveFilter {
                field: field.name().to_owned(),
                value: value.into(),
            })
            .collect();
        Self {
            has_search,
            active_filters_count,
            has_active_filters,
            active_filters,
            timestamp,
        }
    }
}

impl TryFrom<ResponseMeta> for _core::ResponseMeta {
    type Error = anyhow::Error;

    fn try_from(from: ResponseMeta) -> anyhow::Result<Self> {
        let ResponseMeta {
            has_search,
            active_filters_count,
            has_active_filters,
            active_filters,
            timestamp,
        } = from;
        let active_filters = active_filters
            .into_iter()
            .map(|ActiveFilter { field, value }| {
                _core::Field::from_name(&field)
                    .map(|field| (field, value.into()))
                    .ok_or_else(|| anyhow!("unknown field \"{field}\""))
            })
            .collect::<anyhow::Result<_>>()?;
        let into = Self {
            has_search,
            active_filters_count,
            has_active_filters,
            active_filters,
            timestamp,
        };
        Ok(into)
    }
}

/// Response of the query endpoint.
///
/// Items are opaque JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub items: Vec<serde_json::Value>,
    pub pagination: PaginationInfo,
    pub applied_filters: FilterSet,
    pub fingerprint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub meta: ResponseMeta,
}

impl From<_core::ResponseEnvelope<serde_json::Value>> for ResponseEnvelope {
    fn from(from: _core::ResponseEnvelope<serde_json::Value>) -> Self {
        let _core::ResponseEnvelope {
            status,
            items,
            pagination,
            applied_filters,
            fingerprint,
            error,
            meta,
        } = from;
        Self {
            status: status.into(),
            items,
            pagination: pagination.into(),
            applied_filters: applied_filters.into(),
            fingerprint: fingerprint.to_string(),
            error,
            meta: meta.into(),
        }
    }
}

impl TryFrom<ResponseEnvelope> for _core::ResponseEnvelope<serde_json::Value> {
    type Error = anyhow::Error;

    fn try_from(from: ResponseEnvelope) -> anyhow::Result<Self> {
        let ResponseEnvelope {
            status,
            items,
            pagination,
            applied_filters,
            fingerprint,
            error,
            meta,
        } = from;
        let fingerprint = fingerprint
            .parse::<_core::Fingerprint>()
            .map_err(|err| anyhow!("{err}: \"{fingerprint}\""))?;
        let into = Self {
            status: status.into(),
            items,
            pagination: pagination.try_into()?,
            applied_filters: applied_filters.try_into()?,
            fingerprint,
            error,
            meta: meta.try_into()?,
        };
        Ok(into)
    }
}

#[cfg(test)]
mod tests;
