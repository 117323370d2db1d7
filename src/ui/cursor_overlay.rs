//! Cursor dot and trailing ring, drawn over everything else.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::Widget,
};

use crate::core::cursor::HoverKind;
use crate::core::surface::Point;

use super::theme::Theme;
use super::view::PageView;

pub struct CursorOverlay<'a> {
    view: &'a PageView,
}

impl<'a> CursorOverlay<'a> {
    pub fn new(view: &'a PageView) -> Self {
        Self { view }
    }
}

fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < area.x as i32 || y < area.y as i32 || x >= area.right() as i32 || y >= area.bottom() as i32 {
        return;
    }
    if let Some(cell) = buf.cell_mut(Position::new(x as u16, y as u16)) {
        cell.set_char(ch).set_style(style);
    }
}

fn cell_of(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

impl Widget for CursorOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Nothing to follow until the pointer has been seen.
        let Some(dot) = self.view.dot() else {
            return;
        };
        let ring_style = Theme::cursor_ring_style();
        if let Some(ring) = self.view.ring() {
            let (x, y) = cell_of(ring);
            match self.view.hover() {
                HoverKind::None => put(buf, area, x, y, '○', ring_style),
                HoverKind::Small => put(buf, area, x, y, '◎', ring_style),
                HoverKind::Large => {
                    put(buf, area, x - 2, y - 1, '╭', ring_style);
                    put(buf, area, x + 2, y - 1, '╮', ring_style);
                    put(buf, area, x - 2, y + 1, '╰', ring_style);
                    put(buf, area, x + 2, y + 1, '╯', ring_style);
                }
            }
        }
        let (x, y) = cell_of(dot);
        put(buf, area, x, y, '•', Theme::cursor_dot_style());
    }
}
