//! Windowing over an ordered sequence of lines or messages.
//!
//! Every function returns an offset in `0..=max_offset(len, window)`, so callers can feed
//! stale offsets back in after the sequence shrinks.

use std::ops::Range;

pub fn max_offset(len: usize, window: usize) -> usize {
    len.saturating_sub(window)
}

pub fn clamp_offset(offset: usize, len: usize, window: usize) -> usize {
    offset.min(max_offset(len, window))
}

pub fn visible_range(offset: usize, len: usize, window: usize) -> Range<usize> {
    let start = clamp_offset(offset, len, window);
    let end = len.min(start.saturating_add(window));
    start..end
}

/// Smallest adjustment of `offset` that brings `target` into the window.
pub fn ensure_visible(target: usize, offset: usize, len: usize, window: usize) -> usize {
    let adjusted = if target < offset {
        target
    } else if window > 0 && target >= offset + window {
        target + 1 - window
    } else {
        offset
    };
    clamp_offset(adjusted, len, window)
}

pub fn scroll_by(offset: usize, delta: isize, len: usize, window: usize) -> usize {
    let moved = if delta.is_negative() {
        offset.saturating_sub(delta.unsigned_abs())
    } else {
        offset.saturating_add(delta.unsigned_abs())
    };
    clamp_offset(moved, len, window)
}

/// Offset that keeps the tail of the sequence in view.
pub fn follow_offset(len: usize, window: usize) -> usize {
    max_offset(len, window)
}

/// Offset plus window size for a single scrollable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    window: usize,
}

impl Viewport {
    pub fn new(window: usize) -> Self {
        Self {
            offset: 0,
            window: window.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn range(&self, len: usize) -> Range<usize> {
        visible_range(self.offset, len, self.window)
    }

    pub fn ensure_visible(&mut self, target: usize, len: usize) {
        self.offset = ensure_visible(target, self.offset, len, self.window);
    }

    pub fn scroll_by(&mut self, delta: isize, len: usize) {
        self.offset = scroll_by(self.offset, delta, len, self.window);
    }

    pub fn page(&mut self, forward: bool, len: usize) {
        let step = self.window as isize;
        self.scroll_by(if forward { step } else { -step }, len);
    }

    pub fn follow(&mut self, len: usize) {
        self.offset = follow_offset(len, self.window);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Items hidden above and below the window.
    pub fn hidden(&self, len: usize) -> (usize, usize) {
        let range = self.range(len);
        (range.start, len - range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_visible, follow_offset, scroll_by, visible_range, Viewport};

    #[test]
    fn range_clamps_stale_offsets() {
        assert_eq!(visible_range(10, 6, 4), 2..6);
        assert_eq!(visible_range(0, 3, 4), 0..3);
        assert_eq!(visible_range(5, 0, 4), 0..0);
    }

    #[test]
    fn ensure_visible_moves_minimally() {
        assert_eq!(ensure_visible(1, 3, 20, 6), 1);
        assert_eq!(ensure_visible(9, 3, 20, 6), 4);
        assert_eq!(ensure_visible(5, 3, 20, 6), 3);
        assert_eq!(ensure_visible(19, 0, 20, 6), 14);
    }

    #[test]
    fn scroll_by_saturates_at_both_ends() {
        assert_eq!(scroll_by(1, -5, 10, 4), 0);
        assert_eq!(scroll_by(1, 50, 10, 4), 6);
        assert_eq!(scroll_by(2, -1, 10, 4), 1);
    }

    #[test]
    fn follow_is_zero_when_everything_fits() {
        assert_eq!(follow_offset(3, 4), 0);
        assert_eq!(follow_offset(6, 4), 2);
    }

    #[test]
    fn viewport_pages_by_window_and_reports_hidden_counts() {
        let mut viewport = Viewport::new(6);
        viewport.page(true, 20);
        assert_eq!(viewport.offset(), 6);
        assert_eq!(viewport.hidden(20), (6, 8));
        viewport.page(true, 20);
        viewport.page(true, 20);
        assert_eq!(viewport.offset(), 14);
        viewport.page(false, 20);
        assert_eq!(viewport.offset(), 8);
    }
}
