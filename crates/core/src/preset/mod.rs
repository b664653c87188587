// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use crate::{
    filter::{Field, FieldValue, FilterSet},
    registry::EntityRegistry,
    validate::{RawInput, RawValue, Sanitized, Validator},
};

/// A named, sparse filter set.
///
/// Only fields that differ from their defaults are stored. The current
/// page and presentation-only fields are never part of a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPreset {
    pub name: String,
    pub values: BTreeMap<Field, FieldValue>,
}

const fn is_preset_field(field: Field) -> bool {
    !field.is_ui_only() && !matches!(field, Field::Page)
}

impl FilterPreset {
    #[must_use]
    pub fn new(name: impl Into<String>, filters: &FilterSet) -> Self {
        let values = Field::iter_all()
            .filter(|field| is_preset_field(*field) && !filters.is_default(*field))
            .map(|field| (field, filters.value(field)))
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// The stored values as untrusted input with plain wire names.
    ///
    /// Stored presets might be outdated and need to be validated again.
    #[must_use]
    pub fn to_raw_input(&self) -> RawInput {
        self.values
            .iter()
            .filter(|(field, _)| is_preset_field(**field))
            .map(|(field, value)| {
                let value = match value {
                    FieldValue::Text(text) => RawValue::Text(text.clone()),
                    FieldValue::Flag(flag) => RawValue::Bool(*flag),
                    FieldValue::Number(number) => RawValue::Int((*number).into()),
                    FieldValue::List(items) => RawValue::List(items.clone()),
                };
                (field.name(), value)
            })
            .collect()
    }

    /// Re-hydrate the complete filter set.
    ///
    /// Values that have become invalid in the meantime are replaced by
    /// their defaults.
    #[must_use]
    pub fn filters_with_defaults<R>(&self, validator: &Validator<'_, R>) -> Sanitized
    where
        R: EntityRegistry + ?Sized,
    {
        validator.validate_safe(&self.to_raw_input())
    }
}
