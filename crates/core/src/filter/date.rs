// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr};

use jiff::{Span, civil::Date};
use strum::{EnumIter, EnumString, IntoStaticStr};

const DEFAULT: &str = "default";

const CUSTOM_PREFIX: &str = "custom_";

const CUSTOM_SEPARATOR: &str = "_to_";

/// The maximum number of days between start and end of a custom range.
pub const CUSTOM_RANGE_MAX_DAYS: i32 = 365;

/// The maximum age of the start date of a custom range.
pub const CUSTOM_RANGE_MAX_AGE_YEARS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum DatePreset {
    Today,
    Yesterday,
    Last7,
    Last30,
    Last90,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
}

impl DatePreset {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Resolve the preset into an inclusive range of dates.
    #[must_use]
    pub fn resolve(self, today: Date) -> Option<(Date, Date)> {
        let days_back = |days: i64| today.checked_sub(Span::new().days(days)).ok();
        match self {
            Self::Today => Some((today, today)),
            Self::Yesterday => days_back(1).map(|date| (date, date)),
            Self::Last7 => days_back(6).map(|start| (start, today)),
            Self::Last30 => days_back(29).map(|start| (start, today)),
            Self::Last90 => days_back(89).map(|start| (start, today)),
            Self::ThisMonth => Some((today.first_of_month(), today)),
            Self::LastMonth => {
                let end = today.first_of_month().yesterday().ok()?;
                Some((end.first_of_month(), end))
            }
            Self::ThisYear => Some((today.first_of_year(), today)),
            Self::LastYear => {
                let end = today.first_of_year().yesterday().ok()?;
                Some((end.first_of_year(), end))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomDateRange {
    start: Date,
    end: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomDateRangeInvalidity {
    StartAfterEnd,
    SpanTooLong,
    StartTooOld,
}

impl CustomDateRange {
    #[must_use]
    pub const fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Check the range relative to the current date.
    pub fn check(&self, today: Date) -> Result<(), CustomDateRangeInvalidity> {
        let Self { start, end } = *self;
        if start > end {
            return Err(CustomDateRangeInvalidity::StartAfterEnd);
        }
        let days = start
            .until(end)
            .map_or(i32::MAX, |span| span.get_days());
        if days > CUSTOM_RANGE_MAX_DAYS {
            return Err(CustomDateRangeInvalidity::SpanTooLong);
        }
        let oldest_start = today
            .checked_sub(Span::new().years(CUSTOM_RANGE_MAX_AGE_YEARS))
            .unwrap_or(Date::MIN);
        if start < oldest_start {
            return Err(CustomDateRangeInvalidity::StartTooOld);
        }
        Ok(())
    }
}

/// Filter by a date window, either predefined or custom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFilter {
    #[default]
    Default,
    Preset(DatePreset),
    Custom(CustomDateRange),
}

impl DateFilter {
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Resolve the filter into an inclusive range of dates.
    ///
    /// Returns `None` if the filter is unrestricted.
    #[must_use]
    pub fn resolve(&self, today: Date) -> Option<(Date, Date)> {
        match self {
            Self::Default => None,
            Self::Preset(preset) => preset.resolve(today),
            Self::Custom(range) => Some((range.start, range.end)),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT),
            Self::Preset(preset) => f.write_str(preset.as_str()),
            Self::Custom(CustomDateRange { start, end }) => {
                write!(f, "{CUSTOM_PREFIX}{start}{CUSTOM_SEPARATOR}{end}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDateFilterError;

impl fmt::Display for ParseDateFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognized date filter")
    }
}

impl std::error::Error for ParseDateFilterError {}

/// Strict `YYYY-MM-DD`
fn parse_iso_date(input: &str) -> Option<Date> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    input.parse().ok()
}

impl FromStr for DateFilter {
    type Err = ParseDateFilterError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == DEFAULT {
            return Ok(Self::Default);
        }
        if let Some(range) = input.strip_prefix(CUSTOM_PREFIX) {
            let (start, end) = range
                .split_once(CUSTOM_SEPARATOR)
                .ok_or(ParseDateFilterError)?;
            let start = parse_iso_date(start).ok_or(ParseDateFilterError)?;
            let end = parse_iso_date(end).ok_or(ParseDateFilterError)?;
            return Ok(Self::Custom(CustomDateRange::new(start, end)));
        }
        input
            .parse()
            .map(Self::Preset)
            .map_err(|_| ParseDateFilterError)
    }
}
