// SPDX-License-Identifier: GPL-3.0-only

use std::ops::RangeInclusive;

/// Holds the pagination state of a server paginated list (pages are 1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            current_page: 1,
            total_pages: 1,
        }
    }
}

/// Identifies a pagination action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationAction {
    Back,
    Forward,
    GoTo(u32),
}

impl PaginationConfig {
    /// Applies the given action, returns true if the current page changed
    pub fn apply(&mut self, action: PaginationAction) -> bool {
        let target = match action {
            PaginationAction::Back => {
                if self.current_page <= 1 {
                    return false;
                }
                self.current_page - 1
            }
            PaginationAction::Forward => {
                if self.current_page >= self.total_pages {
                    return false;
                }
                self.current_page + 1
            }
            PaginationAction::GoTo(page) => {
                if page < 1 || page > self.total_pages || page == self.current_page {
                    return false;
                }
                page
            }
        };

        self.current_page = target;
        true
    }

    /// Updates the page count reported by the server, the backend never reports less than one page.
    ///
    /// The cursor is pulled back onto the last page when the list shrank under it.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    pub fn is_first(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Page numbers to render as links
    pub fn pages(&self) -> RangeInclusive<u32> {
        1..=self.total_pages
    }
}
