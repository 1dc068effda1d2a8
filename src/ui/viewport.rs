//! Scroll state for the note pane.
//!
//! One [`Viewport`] scrolls the wrapped rows of the rendered note, another
//! follows the cursor in edit mode.

use std::ops::Range;

/// Visible window over a list of rows.
///
/// ```
/// use asset_notes::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(40, 10, 25);
/// vp.scroll_down(20);
/// assert_eq!(vp.visible_range(), 15..25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Scroll position as a percentage; 100 when everything fits.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // offset <= max_offset, so the quotient is within 0..=100
        u8::try_from(self.offset * 100 / max_offset).unwrap_or(100)
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.page_step());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_step());
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the minimum amount needed for `line` to be on screen.
    pub const fn ensure_visible(&mut self, line: usize) {
        let height = self.height as usize;
        if height == 0 || line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
    }

    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    pub const fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.clamp();
    }

    const fn page_step(&self) -> usize {
        let h = self.height as usize;
        if h > 1 { h - 1 } else { 1 }
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }

    const fn clamp(&mut self) {
        let max = self.max_offset();
        if self.offset > max {
            self.offset = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_note_fits_without_scrolling() {
        let vp = Viewport::new(40, 10, 3);
        assert_eq!(vp.visible_range(), 0..3);
        assert!(!vp.can_scroll_down());
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_clamps_at_both_ends() {
        let mut vp = Viewport::new(40, 10, 25);
        vp.scroll_down(100);
        assert_eq!(vp.offset(), 15);
        assert_eq!(vp.scroll_percent(), 100);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.scroll_percent(), 0);
    }

    #[test]
    fn test_page_keeps_one_line_of_context() {
        let mut vp = Viewport::new(40, 10, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 9);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_minimally() {
        let mut vp = Viewport::new(40, 5, 50);
        vp.ensure_visible(7);
        assert_eq!(vp.offset(), 3);
        vp.ensure_visible(4);
        assert_eq!(vp.offset(), 3);
        vp.ensure_visible(1);
        assert_eq!(vp.offset(), 1);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = Viewport::new(40, 10, 50);
        vp.go_to_bottom();
        vp.set_total_lines(12);
        assert_eq!(vp.offset(), 2);
        vp.resize(40, 20);
        assert_eq!(vp.offset(), 0);
    }
}
