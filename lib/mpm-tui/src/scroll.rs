/// Vertical scroll position over `total` lines seen through `visible` rows.
///
/// The offset always stays within `0..=total.saturating_sub(visible)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    offset: usize,
    total: usize,
    visible: usize,
}

impl Scroll {
    pub fn new(total: usize, visible: usize) -> Self {
        Self {
            offset: 0,
            total,
            visible,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }

    /// Resize the content or the window, re-clamping the offset
    pub fn set_viewport(&mut self, total: usize, visible: usize) {
        self.total = total;
        self.visible = visible;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset());
    }

    pub fn up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    fn half_page(&self) -> usize {
        (self.visible / 2).max(1)
    }

    pub fn page_down(&mut self) {
        self.down(self.half_page());
    }

    pub fn page_up(&mut self) {
        self.up(self.half_page());
    }

    pub fn home(&mut self) {
        self.offset = 0;
    }

    pub fn end(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn has_more_above(&self) -> bool {
        self.offset > 0
    }

    pub fn has_more_below(&self) -> bool {
        self.offset + self.visible < self.total
    }

    /// Percentage of the scrollable range already passed
    pub fn percent(&self) -> usize {
        match self.max_offset() {
            0 => 0,
            max => self.offset * 100 / max,
        }
    }

    /// Index range of the lines currently on screen
    pub fn window(&self) -> std::ops::Range<usize> {
        let end = (self.offset + self.visible).min(self.total);
        self.offset.min(end)..end
    }
}
