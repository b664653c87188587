// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn eleven_syncs_within_one_second_trip() {
    let start = Instant::now();
    let mut guard = LoopGuard::new(10, Duration::from_secs(1));
    for i in 0..10 {
        assert!(guard.record_at(start + Duration::from_millis(i * 50)));
    }
    assert!(!guard.record_at(start + Duration::from_millis(999)));
}

#[test]
fn syncs_outside_of_the_window_are_forgotten() {
    let start = Instant::now();
    let mut guard = LoopGuard::new(10, Duration::from_secs(1));
    for i in 0..10 {
        assert!(guard.record_at(start + Duration::from_millis(i * 50)));
    }
    // All previous syncs happened at least 1 s ago
    let later = start + Duration::from_millis(1_450);
    assert!(guard.record_at(later));
    assert_eq!(1, guard.recent_syncs());
}
