// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::BTreeSet, sync::Arc};

use strum::{EnumIter, IntoStaticStr};

use crate::filter::Field;

/// Kinds of entities with a limited set of active codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum EntityKind {
    Country,
    Language,
    AdvertisingNetwork,
    OperatingSystem,
    Browser,
    Device,
}

impl EntityKind {
    /// The kind of entities that are referenced by a field.
    #[must_use]
    pub const fn of_field(field: Field) -> Option<Self> {
        let kind = match field {
            Field::Country => Self::Country,
            Field::Languages => Self::Language,
            Field::AdvertisingNetworks => Self::AdvertisingNetwork,
            Field::OperatingSystems => Self::OperatingSystem,
            Field::Browsers => Self::Browser,
            Field::Devices => Self::Device,
            _ => return None,
        };
        Some(kind)
    }
}

/// Read-only lookup of active entity codes.
///
/// Codes are compared case-sensitively. Unknown codes are never active,
/// i.e. an empty registry rejects everything.
pub trait EntityRegistry {
    fn is_active(&self, kind: EntityKind, code: &str) -> bool;
}

impl<T> EntityRegistry for &T
where
    T: EntityRegistry + ?Sized,
{
    fn is_active(&self, kind: EntityKind, code: &str) -> bool {
        (**self).is_active(kind, code)
    }
}

impl<T> EntityRegistry for Arc<T>
where
    T: EntityRegistry + ?Sized,
{
    fn is_active(&self, kind: EntityKind, code: &str) -> bool {
        (**self).is_active(kind, code)
    }
}

/// An immutable snapshot of all active codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RegistrySnapshot {
    pub countries: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub advertising_networks: BTreeSet<String>,
    pub operating_systems: BTreeSet<String>,
    pub browsers: BTreeSet<String>,
    pub devices: BTreeSet<String>,
}

impl RegistrySnapshot {
    #[must_use]
    pub fn codes(&self, kind: EntityKind) -> &BTreeSet<String> {
        match kind {
            EntityKind::Country => &self.countries,
            EntityKind::Language => &self.languages,
            EntityKind::AdvertisingNetwork => &self.advertising_networks,
            EntityKind::OperatingSystem => &self.operating_systems,
            EntityKind::Browser => &self.browsers,
            EntityKind::Device => &self.devices,
        }
    }

    pub fn codes_mut(&mut self, kind: EntityKind) -> &mut BTreeSet<String> {
        match kind {
            EntityKind::Country => &mut self.countries,
            EntityKind::Language => &mut self.languages,
            EntityKind::AdvertisingNetwork => &mut self.advertising_networks,
            EntityKind::OperatingSystem => &mut self.operating_systems,
            EntityKind::Browser => &mut self.browsers,
            EntityKind::Device => &mut self.devices,
        }
    }

    #[must_use]
    pub fn with_codes<S: Into<String>>(
        mut self,
        kind: EntityKind,
        codes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.codes_mut(kind).extend(codes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.countries,
            &self.languages,
            &self.advertising_networks,
            &self.operating_systems,
            &self.browsers,
            &self.devices,
        ]
        .iter()
        .all(|codes| codes.is_empty())
    }
}

impl EntityRegistry for RegistrySnapshot {
    fn is_active(&self, kind: EntityKind, code: &str) -> bool {
        self.codes(kind).contains(code)
    }
}

#[cfg(test)]
mod tests;
