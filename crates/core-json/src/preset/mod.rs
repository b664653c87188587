// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use anyhow::anyhow;

use crate::{filter::FieldValue, prelude::*};

mod _core {
    pub(super) use filtersync_core::{filter::Field, preset::FilterPreset};
}

/// Sparse preset with plain, unprefixed wire names as keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub name: String,

    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
}

impl From<_core::FilterPreset> for FilterPreset {
    fn from(from: _core::FilterPreset) -> Self {
        let _core::FilterPreset { name, values } = from;
        let values = values
            .into_iter()
            .map(|(field, value)| (field.name().to_owned(), value.into()))
            .collect();
        Self { name, values }
    }
}

impl TryFrom<FilterPreset> for _core::FilterPreset {
    type Error = anyhow::Error;

    fn try_from(from: FilterPreset) -> anyhow::Result<Self> {
        let FilterPreset { name, values } = from;
        let values = values
            .into_iter()
            .map(|(key, value)| {
                _core::Field::from_name(&key)
                    .map(|field| (field, value.into()))
                    .ok_or_else(|| anyhow!("unknown field \"{key}\""))
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(Self { name, values })
    }
}
