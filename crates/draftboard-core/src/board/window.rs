// Virtualized rendering window over the ordered player list.
//
// Only rows in `[start, end)` are materialized. Offsets come in two flavors:
//
//   Uniform  every row is assumed to be `base_row_height` tall when mapping
//            index <-> offset, even if one row is expanded. Matches the
//            board's historical scrolling behavior.
//   Exact    a prefix sum of real row heights, so rows after an expanded row
//            shift by `expanded_row_height - base_row_height`.

use std::ops::Range;

use super::derive::DerivedPlayer;

/// Row heights in terminal lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGeometry {
    pub base_row_height: usize,
    pub expanded_row_height: usize,
}

impl Default for RowGeometry {
    fn default() -> Self {
        RowGeometry {
            base_row_height: 1,
            expanded_row_height: 5,
        }
    }
}

impl RowGeometry {
    fn base(&self) -> usize {
        self.base_row_height.max(1)
    }

    pub fn row_height(&self, player: &DerivedPlayer, expanded_id: Option<&str>) -> usize {
        if expanded_id == Some(player.id()) {
            self.expanded_row_height.max(self.base())
        } else {
            self.base()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetMode {
    #[default]
    Uniform,
    Exact,
}

/// Prefix sums of row heights: `prefix[i]` is the top of row `i` and
/// `prefix[len]` the total height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHeights {
    prefix: Vec<usize>,
}

impl RowHeights {
    pub fn build(list: &[DerivedPlayer], expanded_id: Option<&str>, geometry: RowGeometry) -> Self {
        let mut prefix = Vec::with_capacity(list.len() + 1);
        let mut acc = 0;
        prefix.push(acc);
        for p in list {
            acc += geometry.row_height(p, expanded_id);
            prefix.push(acc);
        }
        RowHeights { prefix }
    }

    pub fn len(&self) -> usize {
        self.prefix.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn top(&self, index: usize) -> usize {
        self.prefix[index.min(self.len())]
    }

    pub fn height(&self, index: usize) -> usize {
        if index >= self.len() {
            return 0;
        }
        self.prefix[index + 1] - self.prefix[index]
    }

    pub fn total(&self) -> usize {
        self.prefix[self.len()]
    }

    /// Index of the row containing `offset`, clamped to the last row.
    pub fn index_at_offset(&self, offset: usize) -> usize {
        if self.is_empty() {
            return 0;
        }
        // First prefix entry strictly greater than offset, minus one.
        let upper = self.prefix.partition_point(|&top| top <= offset);
        upper.saturating_sub(1).min(self.len() - 1)
    }
}

/// The materialized slice of the ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    /// Content offset of each materialized row, `start..end` in order.
    pub row_offsets: Vec<usize>,
    /// Actual height of each materialized row.
    pub row_heights: Vec<usize>,
    /// Sum of every row's height, materialized or not.
    pub total_height: usize,
}

impl Window {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The list index drawn at `line` lines below the top of the viewport,
    /// given rows are drawn back to back at their actual heights.
    pub fn index_at(&self, line: usize) -> Option<usize> {
        let mut top = 0;
        for (k, height) in self.row_heights.iter().enumerate() {
            if line < top + height {
                return Some(self.start + k);
            }
            top += height;
        }
        None
    }
}

/// Compute which rows to materialize for the given scroll position.
pub fn compute_window(
    list: &[DerivedPlayer],
    expanded_id: Option<&str>,
    scroll_offset: usize,
    viewport_rows: usize,
    geometry: RowGeometry,
    mode: OffsetMode,
) -> Window {
    let heights = RowHeights::build(list, expanded_id, geometry);
    let len = list.len();

    let raw_start = match mode {
        OffsetMode::Uniform => scroll_offset / geometry.base(),
        OffsetMode::Exact => heights.index_at_offset(scroll_offset),
    };
    let start = raw_start.min(len.saturating_sub(viewport_rows));
    let end = (start + viewport_rows).min(len);

    let row_offsets = (start..end)
        .map(|i| match mode {
            OffsetMode::Uniform => i * geometry.base(),
            OffsetMode::Exact => heights.top(i),
        })
        .collect();
    let row_heights = (start..end).map(|i| heights.height(i)).collect();

    Window {
        start,
        end,
        row_offsets,
        row_heights,
        total_height: heights.total(),
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(
    list: &[DerivedPlayer],
    expanded_id: Option<&str>,
    viewport_rows: usize,
    geometry: RowGeometry,
    mode: OffsetMode,
) -> usize {
    let viewport_height = viewport_rows * geometry.base();
    match mode {
        OffsetMode::Uniform => (list.len() * geometry.base()).saturating_sub(viewport_height),
        OffsetMode::Exact => RowHeights::build(list, expanded_id, geometry)
            .total()
            .saturating_sub(viewport_height),
    }
}

/// Scroll offset that places row `index` in the middle of the viewport.
pub fn center_offset(
    list: &[DerivedPlayer],
    expanded_id: Option<&str>,
    index: usize,
    viewport_rows: usize,
    geometry: RowGeometry,
    mode: OffsetMode,
) -> usize {
    if list.is_empty() {
        return 0;
    }
    let index = index.min(list.len() - 1);
    let viewport_height = viewport_rows * geometry.base();
    let (top, height) = match mode {
        OffsetMode::Uniform => (index * geometry.base(), geometry.base()),
        OffsetMode::Exact => {
            let heights = RowHeights::build(list, expanded_id, geometry);
            (heights.top(index), heights.height(index))
        }
    };
    let centered = top.saturating_sub(viewport_height.saturating_sub(height) / 2);
    centered.min(max_scroll_offset(list, expanded_id, viewport_rows, geometry, mode))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
