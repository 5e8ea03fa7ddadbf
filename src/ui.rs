//! UiFrame: a thin wrapper around a screen `Buffer` that clamps drawing to the
//! visible area.
//!
//! Widget rectangles are signed and may hang off the screen edge (a dialog
//! dragged past the border). Every draw call goes through here so a widget
//! never has to guard its own writes.
use crate::geometry::Rect as GeoRect;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Drawing surface handed to widgets. Every write is clipped to `area`, so
/// rectangles that drift outside the buffer are cut rather than rejected.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    ///
    /// This powers offscreen rendering paths where components should draw into
    /// their logical window size before being composited onto the visible
    /// terminal buffer.
    pub(crate) fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    #[cfg(test)]
    pub(crate) fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn blit_from(&mut self, src: &Buffer, src_area: Rect) {
        let overlap = src_area.intersection(self.area);
        if overlap.width == 0 || overlap.height == 0 {
            return;
        }
        for y in overlap.y..overlap.y.saturating_add(overlap.height) {
            for x in overlap.x..overlap.x.saturating_add(overlap.width) {
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((x, y)), self.buffer.cell_mut((x, y)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }

    /// Fill a signed, possibly off-screen rectangle with blanks in `style`.
    pub fn fill(&mut self, rect: GeoRect, style: Style) {
        let Some(area) = self.clip_rect(rect.to_area()) else {
            return;
        };
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }

    /// Write `text` at signed screen coordinates, clipped to the frame.
    pub fn print(&mut self, y: i32, x: i32, text: &str, style: Style) {
        if y < 0 || y > i32::from(u16::MAX) {
            return;
        }
        // Drop the part of the string left of column zero.
        let skip = usize::try_from(-x.min(0)).unwrap_or(0);
        let text: String = text.chars().skip(skip).collect();
        let x = x.max(0).min(i32::from(u16::MAX)) as u16;
        safe_set_string(self.buffer, self.area, x, y as u16, &text, style);
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn print_clips_left_of_screen() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 4,
            height: 1,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.print(0, -2, "abcdef", Style::default());
        ui.print(-1, 0, "zz", Style::default());
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "c");
        assert_eq!(buf.cell((3, 0)).unwrap().symbol(), "f");
    }

    #[test]
    fn fill_covers_only_visible_part() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 3,
            height: 3,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        let style = Style::default().bg(ratatui::style::Color::Blue);
        ui.fill(GeoRect::new(-1, -1, 2, 2), style);
        assert_eq!(buf.cell((0, 0)).unwrap().bg, ratatui::style::Color::Blue);
        assert_ne!(buf.cell((1, 1)).unwrap().bg, ratatui::style::Color::Blue);
    }

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = ratatui::layout::Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 2,
        };
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        let cell = buf.cell_mut((1, 0)).expect("cell present");
        let first = cell.symbol().chars().next().unwrap();
        assert_eq!(first, 'h');

        // outside bounds should be ignored (no panic)
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn blit_from_copies_overlapping_region() {
        use ratatui::layout::Rect;

        let dest_area = Rect {
            x: 0,
            y: 0,
            width: 5,
            height: 3,
        };
        let mut dest = Buffer::empty(dest_area);
        for y in dest_area.y..dest_area.y.saturating_add(dest_area.height) {
            for x in dest_area.x..dest_area.x.saturating_add(dest_area.width) {
                if let Some(cell) = dest.cell_mut((x, y)) {
                    cell.set_symbol(".");
                }
            }
        }
        let mut frame = UiFrame::from_parts(dest_area, &mut dest);

        let src_area = Rect {
            x: 3,
            y: 1,
            width: 4,
            height: 3,
        };
        let mut src = Buffer::empty(src_area);
        for y in src_area.y..src_area.y.saturating_add(src_area.height) {
            for x in src_area.x..src_area.x.saturating_add(src_area.width) {
                if let Some(cell) = src.cell_mut((x, y)) {
                    cell.set_symbol("Z");
                }
            }
        }

        frame.blit_from(&src, src_area);

        let buffer = frame.buffer_mut();
        assert_eq!(buffer.cell((3, 1)).unwrap().symbol(), "Z");
        assert_eq!(buffer.cell((4, 2)).unwrap().symbol(), "Z");
        assert_eq!(buffer.cell((2, 1)).unwrap().symbol(), ".");
        assert_eq!(buffer.cell((4, 0)).unwrap().symbol(), ".");
    }

    #[test]
    fn blit_from_respects_non_zero_origins() {
        use ratatui::layout::Rect;

        let dest_area = Rect {
            x: 5,
            y: 5,
            width: 4,
            height: 2,
        };
        let mut dest = Buffer::empty(dest_area);
        for y in dest_area.y..dest_area.y.saturating_add(dest_area.height) {
            for x in dest_area.x..dest_area.x.saturating_add(dest_area.width) {
                if let Some(cell) = dest.cell_mut((x, y)) {
                    cell.set_symbol(".");
                }
            }
        }
        let mut frame = UiFrame::from_parts(dest_area, &mut dest);

        let src_area = Rect {
            x: 6,
            y: 6,
            width: 2,
            height: 1,
        };
        let mut src = Buffer::empty(src_area);
        for y in src_area.y..src_area.y.saturating_add(src_area.height) {
            for x in src_area.x..src_area.x.saturating_add(src_area.width) {
                if let Some(cell) = src.cell_mut((x, y)) {
                    cell.set_symbol("Q");
                }
            }
        }

        frame.blit_from(&src, src_area);

        let buffer = frame.buffer_mut();
        assert_eq!(buffer.cell((6, 6)).unwrap().symbol(), "Q");
        assert_eq!(buffer.cell((7, 6)).unwrap().symbol(), "Q");
        assert_eq!(buffer.cell((5, 5)).unwrap().symbol(), ".");
        assert_eq!(buffer.cell((8, 6)).unwrap().symbol(), ".");
    }
}
