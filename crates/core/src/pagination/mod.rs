// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Default number of page links around the current page.
pub const PAGE_NUMBERS_WINDOW: u64 = 5;

/// Derived pagination metadata.
///
/// Only constructed by [`paginate()`] and thereby always consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    total: u64,
    per_page: u32,
    current_page: u64,
    last_page: u64,
    from: u64,
    to: u64,
    has_more_pages: bool,
}

/// Calculate the pagination for a number of items.
///
/// A non-positive `per_page` is treated as 1 and `current_page` is
/// clamped into the range of available pages.
#[must_use]
pub fn paginate(total: u64, per_page: i64, current_page: i64) -> PaginationInfo {
    let per_page = per_page.clamp(1, u32::MAX.into()) as u32;
    let last_page = total.div_ceil(per_page.into()).max(1);
    let current_page = (current_page.max(1) as u64).min(last_page);
    let (from, to) = if total > 0 {
        let from = (current_page - 1).saturating_mul(per_page.into()) + 1;
        let to = current_page.saturating_mul(per_page.into()).min(total);
        (from, to)
    } else {
        (0, 0)
    };
    PaginationInfo {
        total,
        per_page,
        current_page,
        last_page,
        from,
        to,
        has_more_pages: current_page < last_page,
    }
}

impl PaginationInfo {
    /// No items on a single page.
    #[must_use]
    pub fn empty(per_page: i64) -> Self {
        paginate(0, per_page, 1)
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    #[must_use]
    pub const fn current_page(&self) -> u64 {
        self.current_page
    }

    #[must_use]
    pub const fn last_page(&self) -> u64 {
        self.last_page
    }

    /// 1-based index of the first item on the current page, 0 if empty.
    #[must_use]
    pub const fn from(&self) -> u64 {
        self.from
    }

    /// 1-based index of the last item on the current page, 0 if empty.
    #[must_use]
    pub const fn to(&self) -> u64 {
        self.to
    }

    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    #[must_use]
    pub const fn has_pages(&self) -> bool {
        self.last_page > 1
    }

    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        self.current_page == self.last_page
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Zero-based offset of the first item on the current page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.per_page as u64)
    }

    /// Page numbers for navigation links around the current page.
    ///
    /// The window is shifted instead of shrunk near the first and the
    /// last page.
    #[must_use]
    pub fn page_numbers(&self, window: u64) -> Vec<u64> {
        if window == 0 {
            return Vec::new();
        }
        if self.last_page <= window {
            return (1..=self.last_page).collect();
        }
        let half = window / 2;
        let mut start = self.current_page.saturating_sub(half).max(1);
        let end = (start + window - 1).min(self.last_page);
        if end - start + 1 < window {
            start = (end + 1).saturating_sub(window).max(1);
        }
        (start..=end).collect()
    }

    #[must_use]
    pub fn go_to_page(&self, page: i64) -> Self {
        paginate(self.total, self.per_page.into(), page)
    }

    /// Changing the page size starts over at the first page.
    #[must_use]
    pub fn change_per_page(&self, per_page: i64) -> Self {
        paginate(self.total, per_page, 1)
    }

    #[must_use]
    pub fn showing_text(&self) -> String {
        match self.total {
            0 => "No results".to_owned(),
            1 => "Showing 1 result".to_owned(),
            total => format!(
                "Showing {from}-{to} of {total} results",
                from = self.from,
                to = self.to
            ),
        }
    }
}

#[cfg(test)]
mod tests;
