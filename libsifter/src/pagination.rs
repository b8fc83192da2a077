//! Fixed-size pages over the filtered rows, and a smaller scroll window inside a page.
use std::ops::Range;

use serde::Deserialize;

/// Position within the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based page number.
    pub page: usize,
    /// First visible row, relative to the start of the page.
    pub scroll_index: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            scroll_index: 0,
        }
    }
}

/// Page and window sizes. Both are at least 1; the config loader rejects zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Paging {
    pub page_size: usize,
    pub window_size: usize,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: 100,
            window_size: 20,
        }
    }
}

/// Everything the table needs to draw the current window, in absolute row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: usize,
    pub total_pages: usize,
    pub page_rows: Range<usize>,
    pub window_rows: Range<usize>,
    pub total_rows: usize,
}

impl Paging {
    #[must_use]
    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size)
    }

    /// Absolute row range of a 1-based page, clamped to `total_rows`.
    #[must_use]
    pub fn page_rows(&self, total_rows: usize, page: usize) -> Range<usize> {
        let start = page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(total_rows);
        let end = start.saturating_add(self.page_size).min(total_rows);
        start..end
    }

    #[must_use]
    pub fn page_len(&self, total_rows: usize, page: usize) -> usize {
        self.page_rows(total_rows, page).len()
    }

    /// Largest valid scroll index for a page of `page_len` rows.
    #[must_use]
    pub fn max_scroll(&self, page_len: usize) -> usize {
        page_len.saturating_sub(self.window_size)
    }

    fn last_page(&self, total_rows: usize) -> usize {
        self.total_pages(total_rows).max(1)
    }

    /// Brings a possibly stale position back into range for `total_rows`.
    #[must_use]
    pub fn clamp(&self, state: PageState, total_rows: usize) -> PageState {
        let page = state.page.clamp(1, self.last_page(total_rows));
        let scroll_index = state
            .scroll_index
            .min(self.max_scroll(self.page_len(total_rows, page)));
        PageState { page, scroll_index }
    }

    #[must_use]
    pub fn view(&self, state: PageState, total_rows: usize) -> PageView {
        let state = self.clamp(state, total_rows);
        let page_rows = self.page_rows(total_rows, state.page);
        let window_start = page_rows.start + state.scroll_index;
        let window_end = window_start
            .saturating_add(self.window_size)
            .min(page_rows.end);
        PageView {
            page: state.page,
            total_pages: self.total_pages(total_rows),
            page_rows,
            window_rows: window_start..window_end,
            total_rows,
        }
    }

    #[must_use]
    pub fn can_go_next_page(&self, state: PageState, total_rows: usize) -> bool {
        state.page < self.total_pages(total_rows)
    }

    #[must_use]
    pub fn can_go_previous_page(&self, state: PageState) -> bool {
        state.page > 1
    }

    #[must_use]
    pub fn can_scroll_down(&self, state: PageState, total_rows: usize) -> bool {
        state.scroll_index < self.max_scroll(self.page_len(total_rows, state.page))
    }

    #[must_use]
    pub fn can_scroll_up(&self, state: PageState) -> bool {
        state.scroll_index > 0
    }

    /// Moves to the next page, resetting the window. No-op on the last page.
    #[must_use]
    pub fn next_page(&self, state: PageState, total_rows: usize) -> PageState {
        let state = self.clamp(state, total_rows);
        if self.can_go_next_page(state, total_rows) {
            PageState {
                page: state.page + 1,
                scroll_index: 0,
            }
        } else {
            state
        }
    }

    /// Moves to the previous page, resetting the window. No-op on the first page.
    #[must_use]
    pub fn previous_page(&self, state: PageState, total_rows: usize) -> PageState {
        let state = self.clamp(state, total_rows);
        if self.can_go_previous_page(state) {
            PageState {
                page: state.page - 1,
                scroll_index: 0,
            }
        } else {
            state
        }
    }

    #[must_use]
    pub fn scroll_down(&self, state: PageState, total_rows: usize) -> PageState {
        let state = self.clamp(state, total_rows);
        if self.can_scroll_down(state, total_rows) {
            PageState {
                scroll_index: state.scroll_index + 1,
                ..state
            }
        } else {
            state
        }
    }

    #[must_use]
    pub fn scroll_up(&self, state: PageState, total_rows: usize) -> PageState {
        let state = self.clamp(state, total_rows);
        PageState {
            scroll_index: state.scroll_index.saturating_sub(1),
            ..state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGING: Paging = Paging {
        page_size: 100,
        window_size: 20,
    };

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PAGING.total_pages(0), 0);
        assert_eq!(PAGING.total_pages(1), 1);
        assert_eq!(PAGING.total_pages(100), 1);
        assert_eq!(PAGING.total_pages(101), 2);
        assert_eq!(PAGING.total_pages(250), 3);
    }

    #[test]
    fn pages_concatenate_to_all_rows() {
        for total in [0, 1, 7, 99, 100, 101, 199, 200, 201, 1234] {
            let mut rows = vec![];
            for page in 1..=PAGING.total_pages(total) {
                let range = PAGING.page_rows(total, page);
                assert!(range.len() <= PAGING.page_size);
                rows.extend(range);
            }
            assert_eq!(rows, (0..total).collect::<Vec<_>>());
        }
    }

    #[test]
    fn last_page_is_partial() {
        assert_eq!(PAGING.page_rows(250, 3), 200..250);
        assert_eq!(PAGING.page_len(250, 3), 50);
        assert_eq!(PAGING.page_rows(250, 4), 250..250);
    }

    #[test]
    fn window_clamps_to_short_page() {
        let view = PAGING.view(PageState::default(), 7);
        assert_eq!(view.window_rows, 0..7);
        assert_eq!(view.total_pages, 1);
        assert!(!PAGING.can_scroll_down(PageState::default(), 7));
    }

    #[test]
    fn window_is_relative_to_page_start() {
        let state = PageState {
            page: 2,
            scroll_index: 5,
        };
        let view = PAGING.view(state, 250);
        assert_eq!(view.page_rows, 100..200);
        assert_eq!(view.window_rows, 105..125);
    }

    #[test]
    fn scrolling_stays_within_bounds() {
        let total = 130;
        let mut state = PageState::default();
        for _ in 0..200 {
            state = PAGING.scroll_down(state, total);
            assert!(state.scroll_index <= PAGING.max_scroll(PAGING.page_len(total, state.page)));
        }
        assert_eq!(state.scroll_index, 80);

        state = PAGING.next_page(state, total);
        assert_eq!(state, PageState { page: 2, scroll_index: 0 });
        for _ in 0..50 {
            state = PAGING.scroll_down(state, total);
        }
        assert_eq!(state.scroll_index, 10);

        for _ in 0..50 {
            state = PAGING.scroll_up(state, total);
        }
        assert_eq!(state.scroll_index, 0);
    }

    #[test]
    fn page_navigation_clamps() {
        let total = 250;
        let mut state = PageState::default();
        state = PAGING.previous_page(state, total);
        assert_eq!(state.page, 1);
        for _ in 0..10 {
            state = PAGING.next_page(state, total);
        }
        assert_eq!(state.page, 3);
        assert!(!PAGING.can_go_next_page(state, total));
        state = PAGING.previous_page(state, total);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn empty_result_keeps_first_page() {
        let state = PAGING.next_page(PageState::default(), 0);
        assert_eq!(state, PageState::default());
        let view = PAGING.view(state, 0);
        assert_eq!(view.window_rows, 0..0);
        assert_eq!(view.total_pages, 0);
    }

    #[test]
    fn clamp_repairs_stale_position() {
        let stale = PageState {
            page: 9,
            scroll_index: 70,
        };
        assert_eq!(
            PAGING.clamp(stale, 130),
            PageState {
                page: 2,
                scroll_index: 10
            }
        );
    }
}
