//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! The page document says where things are, the view holds what the motion
//! modules last wrote, and the widgets turn both into cells.

pub mod cursor_overlay;
pub mod document;
pub mod layout;
pub mod page_widget;
pub mod theme;
pub mod view;
