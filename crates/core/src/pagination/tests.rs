// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn zero_total() {
    let pagination = paginate(0, 12, 5);
    assert_eq!(0, pagination.total());
    assert_eq!(1, pagination.last_page());
    assert_eq!(1, pagination.current_page());
    assert_eq!(0, pagination.from());
    assert_eq!(0, pagination.to());
    assert!(!pagination.has_more_pages());
    assert!(!pagination.has_pages());
    assert!(pagination.is_empty());
    assert!(pagination.is_first_page());
    assert!(pagination.is_last_page());
    assert_eq!(PaginationInfo::empty(12), pagination);
    assert_eq!("No results", pagination.showing_text());
}

#[test]
fn middle_page() {
    let pagination = paginate(100, 10, 3);
    assert_eq!(10, pagination.last_page());
    assert_eq!(21, pagination.from());
    assert_eq!(30, pagination.to());
    assert_eq!(20, pagination.offset());
    assert!(pagination.has_more_pages());
    assert!(!pagination.is_first_page());
    assert!(!pagination.is_last_page());
    assert_eq!("Showing 21-30 of 100 results", pagination.showing_text());
}

#[test]
fn partial_last_page() {
    let pagination = paginate(25, 10, 3);
    assert_eq!(3, pagination.last_page());
    assert_eq!(21, pagination.from());
    assert_eq!(25, pagination.to());
    assert!(!pagination.has_more_pages());
    assert!(pagination.is_last_page());
    assert_eq!("Showing 21-25 of 25 results", pagination.showing_text());
    assert_eq!("Showing 1 result", paginate(1, 10, 1).showing_text());
}

#[test]
fn clamp_out_of_range_input() {
    assert_eq!(1, paginate(100, 10, -3).current_page());
    assert_eq!(1, paginate(100, 10, 0).current_page());
    assert_eq!(10, paginate(100, 10, i64::MAX).current_page());
    let pagination = paginate(5, 0, 1);
    assert_eq!(1, pagination.per_page());
    assert_eq!(5, pagination.last_page());
    assert_eq!(1, paginate(5, -10, 1).per_page());
}

#[test]
fn bounds_hold_for_all_inputs() {
    for total in [0, 1, 11, 12, 13, 100, 1_000] {
        for per_page in [-1, 0, 1, 6, 12, 96] {
            for current_page in [-1, 0, 1, 2, 9, 10_000] {
                let pagination = paginate(total, per_page, current_page);
                assert!(pagination.current_page() >= 1);
                assert!(pagination.current_page() <= pagination.last_page());
                assert!(pagination.from() <= pagination.to());
                assert!(pagination.to() <= pagination.total());
                assert_eq!(
                    pagination.has_more_pages(),
                    pagination.current_page() < pagination.last_page()
                );
            }
        }
    }
}

#[test]
fn bounds_hold_for_extreme_inputs() {
    for total in [0, 1, u64::MAX - 1, u64::MAX] {
        for per_page in [i64::MIN, -1, 1, 12, i64::from(u32::MAX), i64::MAX] {
            for current_page in [i64::MIN, 1, 2, i64::MAX] {
                let pagination = paginate(total, per_page, current_page);
                assert!(pagination.current_page() >= 1);
                assert!(pagination.current_page() <= pagination.last_page());
                assert!(pagination.from() <= pagination.to());
                assert!(pagination.to() <= total);
                assert!(pagination.offset() < total.max(1));
                assert!(pagination.per_page() >= 1);
            }
        }
    }
    let last = paginate(u64::MAX, 12, i64::MAX);
    assert_eq!(u64::MAX.div_ceil(12), last.current_page());
    assert_eq!(u64::MAX, last.to());
    assert!(!last.has_more_pages());
}

#[test]
fn page_numbers_window() {
    assert_eq!(vec![1, 2, 3, 4, 5], paginate(50, 10, 3).page_numbers(7));
    assert_eq!(vec![1, 2, 3, 4, 5], paginate(200, 10, 3).page_numbers(5));
    assert_eq!(vec![8, 9, 10, 11, 12], paginate(200, 10, 10).page_numbers(5));
    assert_eq!(vec![16, 17, 18, 19, 20], paginate(200, 10, 18).page_numbers(5));
    assert_eq!(vec![16, 17, 18, 19, 20], paginate(200, 10, 20).page_numbers(5));
    assert_eq!(vec![1], paginate(0, 10, 1).page_numbers(PAGE_NUMBERS_WINDOW));
    assert!(paginate(200, 10, 1).page_numbers(0).is_empty());
}

#[test]
fn navigate() {
    let pagination = paginate(100, 10, 3);
    assert_eq!(7, pagination.go_to_page(7).current_page());
    assert_eq!(10, pagination.go_to_page(11).current_page());
    let resized = pagination.change_per_page(24);
    assert_eq!(1, resized.current_page());
    assert_eq!(24, resized.per_page());
    assert_eq!(5, resized.last_page());
}
