use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Rows of a scrollable list. Items may span several terminal lines.
pub(crate) trait ListAdapter {
    fn len(&self) -> usize;

    fn item_height(&self, _index: usize) -> u16 {
        1
    }

    fn render_item(&self, index: usize, area: Rect, buf: &mut Buffer, highlighted: bool);
}

/// Scroll position of a list whose cursor must stay on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ListViewport {
    first_visible: usize,
}

impl ListViewport {
    #[cfg(test)]
    pub(crate) fn first_visible(&self) -> usize {
        self.first_visible
    }

    /// Adjust the window so `cursor` is fully visible within `height` lines.
    pub(crate) fn scroll_to<A: ListAdapter>(&mut self, adapter: &A, cursor: usize, height: u16) {
        let len = adapter.len();
        if len == 0 || height == 0 {
            self.first_visible = 0;
            return;
        }
        let cursor = cursor.min(len - 1);
        if cursor < self.first_visible {
            self.first_visible = cursor;
            return;
        }
        while self.first_visible < cursor && !self.fits(adapter, cursor, height) {
            self.first_visible += 1;
        }
    }

    /// Lines used from `first_visible` through `target` fit in `height`.
    fn fits<A: ListAdapter>(&self, adapter: &A, target: usize, height: u16) -> bool {
        let used: u32 = (self.first_visible..=target)
            .map(|index| u32::from(adapter.item_height(index).max(1)))
            .sum();
        used <= u32::from(height)
    }

    pub(crate) fn render<A: ListAdapter>(
        &mut self,
        adapter: &A,
        cursor: Option<usize>,
        area: Rect,
        buf: &mut Buffer,
    ) {
        match cursor {
            Some(cursor) => self.scroll_to(adapter, cursor, area.height),
            None => self.first_visible = self.first_visible.min(adapter.len().saturating_sub(1)),
        }
        let mut y = area.y;
        for index in self.first_visible..adapter.len() {
            if y >= area.bottom() {
                break;
            }
            let height = adapter
                .item_height(index)
                .max(1)
                .min(area.bottom() - y);
            let row = Rect::new(area.x, y, area.width, height);
            adapter.render_item(index, row, buf, cursor == Some(index));
            y += height;
        }
    }

    /// Number of whole items visible from the current position.
    pub(crate) fn page_step<A: ListAdapter>(&self, adapter: &A, height: u16) -> usize {
        let mut used = 0u32;
        let mut count = 0;
        for index in self.first_visible..adapter.len() {
            used += u32::from(adapter.item_height(index).max(1));
            if used > u32::from(height) {
                break;
            }
            count += 1;
        }
        count.max(1)
    }
}
