//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: fixed nav row, scrolling page, bottom status bar.
pub struct AppLayout {
    pub nav_area: Rect,
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // nav bar
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            nav_area: chunks[0],
            page_area: chunks[1],
            status_area: chunks[2],
        }
    }

    /// Nav row plus the page below it, where the nav drop-down may draw.
    pub fn chrome_area(&self) -> Rect {
        self.nav_area.union(self.page_area)
    }
}
