//! Cell geometry shared by every widget.
//!
//! Widget rectangles are stored in absolute screen cells. Coordinates are
//! signed so a dialog dragged partly off-screen keeps its logical origin;
//! drawing clips through [`Rect::to_area`].

use bitflags::bitflags;

/// A rectangle in screen cells: origin `(y, x)` and extent `lines × cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub y: i32,
    pub x: i32,
    pub lines: i32,
    pub cols: i32,
}

impl Rect {
    pub const fn new(y: i32, x: i32, lines: i32, cols: i32) -> Self {
        Self { y, x, lines, cols }
    }

    pub const fn is_empty(&self) -> bool {
        self.lines <= 0 || self.cols <= 0
    }

    /// Shift the origin by `(dy, dx)`; the extent is unchanged.
    pub const fn moved_by(self, dy: i32, dx: i32) -> Self {
        Self {
            y: self.y + dy,
            x: self.x + dx,
            ..self
        }
    }

    /// Grow (or shrink, for negative deltas) the extent.
    pub const fn resized_by(self, dlines: i32, dcols: i32) -> Self {
        Self {
            lines: self.lines + dlines,
            cols: self.cols + dcols,
            ..self
        }
    }

    /// True when the cell `(y, x)` lies inside the rectangle.
    pub const fn contains_cell(&self, y: i32, x: i32) -> bool {
        y >= self.y && y < self.y + self.lines && x >= self.x && x < self.x + self.cols
    }

    /// Convert to a ratatui area, dropping the parts left/above the origin.
    pub fn to_area(self) -> ratatui::layout::Rect {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.cols).max(x0);
        let y1 = (self.y + self.lines).max(y0);
        let clamp = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
        ratatui::layout::Rect {
            x: clamp(x0),
            y: clamp(y0),
            width: clamp(x1 - x0),
            height: clamp(y1 - y0),
        }
    }
}

impl From<ratatui::layout::Rect> for Rect {
    fn from(area: ratatui::layout::Rect) -> Self {
        Self {
            y: i32::from(area.y),
            x: i32::from(area.x),
            lines: i32::from(area.height),
            cols: i32::from(area.width),
        }
    }
}

bitflags! {
    /// How a widget follows its owner when the owner is moved or resized,
    /// and how a top-level dialog is placed on the screen.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PosFlags: u16 {
        const FULLSCREEN = 1 << 0;
        const CENTER_HORZ = 1 << 1;
        const CENTER_VERT = 1 << 2;
        const CENTER = Self::CENTER_HORZ.bits() | Self::CENTER_VERT.bits();
        const TRYUP = 1 << 3;
        const KEEP_LEFT = 1 << 4;
        const KEEP_RIGHT = 1 << 5;
        const KEEP_TOP = 1 << 6;
        const KEEP_BOTTOM = 1 << 7;
        const KEEP_HORZ = Self::KEEP_LEFT.bits() | Self::KEEP_RIGHT.bits();
        const KEEP_VERT = Self::KEEP_TOP.bits() | Self::KEEP_BOTTOM.bits();
        const KEEP_ALL = Self::KEEP_HORZ.bits() | Self::KEEP_VERT.bits();
        const KEEP_DEFAULT = Self::KEEP_LEFT.bits() | Self::KEEP_TOP.bits();
    }
}

/// Place a top-level rectangle on a `screen_lines × screen_cols` screen
/// according to `flags`.
pub fn place_on_screen(flags: PosFlags, rect: Rect, screen_lines: i32, screen_cols: i32) -> Rect {
    if flags.contains(PosFlags::FULLSCREEN) {
        return Rect::new(0, 0, screen_lines, screen_cols);
    }
    let mut placed = rect;
    if flags.contains(PosFlags::CENTER_HORZ) {
        placed.x = (screen_cols - placed.cols) / 2;
    }
    if flags.contains(PosFlags::CENTER_VERT) {
        placed.y = (screen_lines - placed.lines) / 2;
    }
    if flags.contains(PosFlags::TRYUP) {
        if placed.y > 3 {
            placed.y -= 2;
        } else if placed.y == 3 {
            placed.y = 2;
        }
    }
    placed
}

/// Recompute a child's rectangle after its owner moved from `old` to `new`.
///
/// Anchor flags decide whether each axis stretches, follows the far edge,
/// re-centers, or splits the size change evenly.
pub fn follow_owner(flags: PosFlags, child: Rect, old: Rect, new: Rect) -> Rect {
    if flags.contains(PosFlags::FULLSCREEN) {
        return new;
    }
    let shift_x = new.x - old.x;
    let shift_y = new.y - old.y;
    let grow_x = new.cols - old.cols;
    let grow_y = new.lines - old.lines;
    let mut r = child;

    if flags.contains(PosFlags::CENTER_HORZ) {
        r.x = new.x + (new.cols - r.cols) / 2;
    } else if flags.contains(PosFlags::KEEP_HORZ) {
        r.x += shift_x;
        r.cols += grow_x;
    } else if flags.contains(PosFlags::KEEP_LEFT) {
        r.x += shift_x;
    } else if flags.contains(PosFlags::KEEP_RIGHT) {
        r.x += shift_x + grow_x;
    } else {
        r.x += shift_x + grow_x / 2;
    }

    if flags.contains(PosFlags::CENTER_VERT) {
        r.y = new.y + (new.lines - r.lines) / 2;
    } else if flags.contains(PosFlags::KEEP_VERT) {
        r.y += shift_y;
        r.lines += grow_y;
    } else if flags.contains(PosFlags::KEEP_TOP) {
        r.y += shift_y;
    } else if flags.contains(PosFlags::KEEP_BOTTOM) {
        r.y += shift_y + grow_y;
    } else {
        r.y += shift_y + grow_y / 2;
    }
    r
}
