// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn trim_in_place_whitespace() {
    let mut s = " \n \t \r ".into();
    trim_in_place(&mut s);
    assert_eq!(String::new(), s);
}

#[test]
fn trim_in_place_start_end() {
    let mut s = " \n \tThis \n is\ta \r Text\r ".into();
    trim_in_place(&mut s);
    assert_eq!("This \n is\ta \r Text", s.as_str());
}

#[test]
fn strip_tags_without_markup_borrows() {
    assert!(matches!(strip_tags("plain text"), Cow::Borrowed("plain text")));
}

#[test]
fn strip_tags_removes_markup() {
    assert_eq!("alert(1)", strip_tags("<script>alert(1)</script>"));
    assert_eq!("bold text", strip_tags("<b>bold</b> text"));
    // Unterminated tag
    assert_eq!("before ", strip_tags("before <img src=x"));
}

#[test]
fn sanitize_text_strips_and_trims() {
    assert_eq!("casino", sanitize_text("  <i>casino</i> \n"));
    assert_eq!("", sanitize_text("<br/>"));
}

#[test]
fn split_list_drops_empty_items() {
    let (items, oversized) = split_list(" en, ,ru,, de ");
    assert_eq!(vec!["en", "ru", "de"], items);
    assert!(oversized.is_empty());
}

#[test]
fn split_list_rejects_oversized_items() {
    let long = "x".repeat(LIST_ITEM_MAX_CHARS + 1);
    let (items, oversized) = split_list(&format!("a,{long}"));
    assert_eq!(vec!["a"], items);
    assert_eq!(vec![long], oversized);
}

#[test]
fn parse_flag_textual_forms() {
    for input in ["1", "true", "TRUE", " yes ", "on"] {
        assert_eq!(Some(true), parse_flag(input), "{input}");
    }
    for input in ["0", "false", "No", "off"] {
        assert_eq!(Some(false), parse_flag(input), "{input}");
    }
    assert_eq!(None, parse_flag("2"));
    assert_eq!(None, parse_flag(""));
}

#[test]
fn parse_integer_trims() {
    assert_eq!(Some(42), parse_integer(" 42 "));
    assert_eq!(Some(-1), parse_integer("-1"));
    assert_eq!(None, parse_integer("4x"));
    assert_eq!(None, parse_integer("1.5"));
}

#[test]
fn parse_integer_saturates() {
    assert_eq!(Some(i64::MAX), parse_integer("99999999999999999999"));
    assert_eq!(Some(i64::MIN), parse_integer(" -99999999999999999999999999999999999999999 "));
    assert_eq!(Some(i64::MIN), parse_integer("-9223372036854775808"));
    assert_eq!(None, parse_integer("+"));
    assert_eq!(None, parse_integer("-"));
}
