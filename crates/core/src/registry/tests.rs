// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn empty_registry_rejects_everything() {
    let registry = RegistrySnapshot::default();
    assert!(registry.is_empty());
    assert!(!registry.is_active(EntityKind::Country, "US"));
    assert!(!registry.is_active(EntityKind::Language, ""));
}

#[test]
fn lookup_is_case_sensitive() {
    let registry = RegistrySnapshot::default().with_codes(EntityKind::Country, ["US", "DE"]);
    assert!(registry.is_active(EntityKind::Country, "US"));
    assert!(!registry.is_active(EntityKind::Country, "us"));
    // Codes of one kind are not active for another kind
    assert!(!registry.is_active(EntityKind::Language, "US"));
}

#[test]
fn registry_by_reference_and_shared() {
    let registry = Arc::new(RegistrySnapshot::default().with_codes(EntityKind::Device, ["mobile"]));
    assert!((&registry).is_active(EntityKind::Device, "mobile"));
    assert!(registry.is_active(EntityKind::Device, "mobile"));
}

#[test]
fn kind_of_field() {
    assert_eq!(Some(EntityKind::Language), EntityKind::of_field(Field::Languages));
    assert_eq!(None, EntityKind::of_field(Field::ImageSizes));
    assert_eq!(None, EntityKind::of_field(Field::Keyword));
}
