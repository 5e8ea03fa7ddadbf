use std::fmt::Debug;

use crate::geometry::Rect;
use crate::theme::DialogColors;
use crate::ui::{UiFrame, truncate_to_width};

/// Draws the chrome of a dialog frame: background, border and title.
pub trait WindowDecorator: Debug {
    fn render_frame(
        &self,
        canvas: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        colors: &DialogColors,
        focused: bool,
    );

    /// Rows at the top of the frame that start a drag.
    fn drag_rows(&self) -> i32 {
        1
    }
}

/// A single-line box inset one line and two columns from the dialog edge,
/// with the title centered in its top side.
#[derive(Debug, Default)]
pub struct BoxDecorator;

impl BoxDecorator {
    fn border_rect(rect: Rect) -> Rect {
        if rect.lines >= 3 && rect.cols >= 5 {
            Rect::new(rect.y + 1, rect.x + 2, rect.lines - 2, rect.cols - 4)
        } else {
            rect
        }
    }
}

impl WindowDecorator for BoxDecorator {
    fn render_frame(
        &self,
        canvas: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        colors: &DialogColors,
        focused: bool,
    ) {
        canvas.fill(rect, colors.normal);

        let border = Self::border_rect(rect);
        if border.lines < 2 || border.cols < 2 {
            return;
        }
        let style = colors.frame;
        let top = border.y;
        let bottom = border.y + border.lines - 1;
        let left = border.x;
        let right = border.x + border.cols - 1;

        let horizontal = "─".repeat((border.cols - 2) as usize);
        canvas.print(top, left, &format!("┌{horizontal}┐"), style);
        canvas.print(bottom, left, &format!("└{horizontal}┘"), style);
        for y in top + 1..bottom {
            canvas.print(y, left, "│", style);
            canvas.print(y, right, "│", style);
        }

        if title.is_empty() {
            return;
        }
        let room = (border.cols - 4).max(0) as usize;
        let text = format!(" {} ", truncate_to_width(title, room.saturating_sub(2)));
        let width = text.chars().count() as i32;
        let x = left + (border.cols - width) / 2;
        let title_style = if focused { colors.title } else { colors.normal };
        canvas.print(top, x, &text, title_style);
    }
}
