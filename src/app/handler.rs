//! Input handling: maps key, mouse, focus and resize events to state
//! mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::config::Action;
use crate::core::elements::{ElementId, Role};
use crate::core::policy::TabState;
use crate::core::surface::Point;
use crate::core::tilt::TiltKey;
use crate::ui::document::PageDocument;

use super::state::PageState;

/// Rows moved per wheel notch.
const WHEEL_ROWS: i32 = 3;

/// Sections the nav links jump to, in link order.  Links past the end go to
/// the bottom of the page.
const LINK_TARGETS: [Role; 3] = [Role::RevealTarget, Role::TiltStage, Role::StatsContainer];

// ── keys ─────────────────────────────────────────────────────────

/// Process a key event through the configured bindings.
pub fn handle_key(state: &mut PageState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;
    let page = state.viewport_h().saturating_sub(2).max(1) as i32;

    match action {
        Action::ScrollUp => scroll_by(state, -1),
        Action::ScrollDown => scroll_by(state, 1),
        Action::PageUp => scroll_by(state, -page),
        Action::PageDown => scroll_by(state, page),
        Action::Top => scroll_to(state, 0),
        Action::Bottom => scroll_to(state, u16::MAX),
        Action::TiltUp => tilt_key(state, TiltKey::Up),
        Action::TiltDown => tilt_key(state, TiltKey::Down),
        Action::TiltLeft => tilt_key(state, TiltKey::Left),
        Action::TiltRight => tilt_key(state, TiltKey::Right),
        Action::ToggleNav => toggle_nav(state),
        Action::Quit => state.should_quit = true,
    }
}

fn tilt_key(state: &mut PageState, key: TiltKey) {
    match state.modules.tilt.as_mut() {
        Some(tilt) => tilt.on_key(key),
        None => state.status_message = Some("tilt is off in this layout".into()),
    }
}

pub fn toggle_nav(state: &mut PageState) {
    state.nav_open = !state.nav_open;
    state.view.mark_dirty();
}

// ── scrolling ────────────────────────────────────────────────────

pub fn scroll_by(state: &mut PageState, delta: i32) {
    let target = (state.scroll_y as i32 + delta).max(0);
    scroll_to(state, target.min(u16::MAX as i32) as u16);
}

/// Move the page and report the new offset to the trigger service.
pub fn scroll_to(state: &mut PageState, y: u16) {
    let y = y.min(state.max_scroll());
    if y == state.scroll_y {
        return;
    }
    state.scroll_y = y;
    let events = state.triggers.update(y as f64);
    state.dispatch_scroll_events(events);
    state.view.mark_dirty();
    repoint(state);
}

// ── mouse ────────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut PageState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            pointer_moved(state, mouse.column, mouse.row);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            pointer_moved(state, mouse.column, mouse.row);
            click(state, mouse.column, mouse.row);
        }
        MouseEventKind::ScrollDown => {
            state.pointer = Some((mouse.column, mouse.row));
            scroll_by(state, WHEEL_ROWS);
        }
        MouseEventKind::ScrollUp => {
            state.pointer = Some((mouse.column, mouse.row));
            scroll_by(state, -WHEEL_ROWS);
        }
        _ => {}
    }
}

/// Element under screen cell `(col, row)`: the nav first, then the page.
fn element_at(state: &PageState, col: u16, row: u16) -> Option<ElementId> {
    let layout = state.layout();
    let chrome = layout.chrome_area();
    let at = Position::new(col, row);

    if layout.nav_area.contains(at) || (state.nav_open && chrome.contains(at)) {
        if let Some(block) = state
            .doc
            .hit_test_nav(col - chrome.x, row - chrome.y, state.nav_open)
        {
            return Some(block.id);
        }
    }
    if layout.page_area.contains(at) {
        let doc_y = row - layout.page_area.y + state.scroll_y;
        return state
            .doc
            .hit_test(col - layout.page_area.x, doc_y)
            .map(|b| b.id);
    }
    None
}

pub fn pointer_moved(state: &mut PageState, col: u16, row: u16) {
    state.pointer = Some((col, row));
    let at = Point::new(col as f64, row as f64);
    let hovered = element_at(state, col, row);
    let role = hovered.and_then(|id| state.doc.elements.role_of(id));
    let stage = state.stage_bounds();

    if let Some(cursor) = state.modules.cursor.as_mut() {
        cursor.on_pointer_move(at, &mut state.view);
        cursor.on_pointer_over(role, &mut state.view);
    }
    if let (Some(tilt), Some(stage)) = (state.modules.tilt.as_mut(), stage) {
        tilt.pointer_moved(at, stage);
    }

    if hovered != state.hovered {
        state.hovered = hovered;
        state.view.mark_dirty();
    }
}

/// The page moved under a resting pointer: hit-test its last cell again.
fn repoint(state: &mut PageState) {
    if let Some((col, row)) = state.pointer {
        pointer_moved(state, col, row);
    }
}

fn click(state: &mut PageState, col: u16, row: u16) {
    let Some(id) = element_at(state, col, row) else {
        return;
    };
    let Some(role) = state.doc.elements.role_of(id) else {
        return;
    };
    match role {
        Role::NavToggle => toggle_nav(state),
        Role::NavLink => {
            let index = state.doc.all(Role::NavLink).position(|b| b.id == id);
            let target = index
                .and_then(|i| LINK_TARGETS.get(i))
                .and_then(|&role| state.doc.first(role))
                .map(|b| b.rect.y.saturating_sub(1));
            state.nav_open = false;
            scroll_to(state, target.unwrap_or(u16::MAX));
            state.view.mark_dirty();
        }
        Role::Button => {
            if let Some(stage) = state.doc.first(Role::TiltStage) {
                let y = stage.rect.y.saturating_sub(1);
                scroll_to(state, y);
            }
        }
        Role::PlayControl | Role::Thumbnail => {
            state.status_message = Some("demo clips are not bundled with this build".into());
            state.view.mark_dirty();
        }
        _ => {}
    }
}

// ── focus ────────────────────────────────────────────────────────

/// Terminal focus stands in for tab visibility.
pub fn handle_focus(state: &mut PageState, gained: bool) {
    let tab = if gained {
        TabState::Foreground
    } else {
        TabState::Background
    };
    if tab == state.tab {
        return;
    }
    state.tab = tab;
    tracing::debug!(?tab, "visibility changed");

    let visible = tab.is_visible();
    if let Some(cursor) = state.modules.cursor.as_mut() {
        cursor.set_tab_visible(visible, &mut state.registry);
    }
    if let Some(tilt) = state.modules.tilt.as_mut() {
        tilt.set_tab_visible(visible, &mut state.registry);
    }
    if visible {
        state.decor.resume();
    } else {
        state.decor.pause();
    }
}

// ── resize ───────────────────────────────────────────────────────

/// Terminal resized.  Crossing the breakpoint reloads the page; otherwise
/// the layout is rebuilt and the triggers re-measured.
pub fn handle_resize(state: &mut PageState, width: u16, height: u16) {
    let area = Rect::new(0, 0, width, height);
    if state.breakpoint.crossed(state.area.width, width) {
        tracing::info!(from = state.area.width, to = width, "breakpoint crossed, reloading page");
        let tab = state.tab;
        let pointer = state.pointer;
        state.teardown();
        *state = PageState::boot(
            state.config.clone(),
            state.prefs,
            state.breakpoint,
            area,
            state.now_ms,
        );
        if !tab.is_visible() {
            handle_focus(state, false);
        }
        state.pointer = pointer;
        repoint(state);
        return;
    }

    state.area = area;
    if width != state.doc.width {
        state.doc = PageDocument::build(width, state.env.narrow);
    }
    let clamped = state.scroll_y.min(state.max_scroll());
    if clamped != state.scroll_y {
        state.scroll_y = clamped;
        let events = state.triggers.update(clamped as f64);
        state.dispatch_scroll_events(events);
    }
    state.refresh_triggers();
    state.view.mark_dirty();
    repoint(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame;
    use crate::app::state::tests::boot;
    use crate::core::scheduler::{TickSource, VirtualClock};
    use crate::core::cursor::HoverKind;
    use crate::core::reveal::RevealPhase;

    fn key(state: &mut PageState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn mouse(state: &mut PageState, kind: MouseEventKind, column: u16, row: u16) {
        handle_mouse(
            state,
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    #[test]
    fn bound_keys_scroll_and_quit() {
        let mut state = boot(120, false);
        key(&mut state, KeyCode::Char('j'));
        key(&mut state, KeyCode::Char('j'));
        assert_eq!(state.scroll_y, 2);
        key(&mut state, KeyCode::Char('k'));
        assert_eq!(state.scroll_y, 1);
        key(&mut state, KeyCode::End);
        assert_eq!(state.scroll_y, state.max_scroll());
        key(&mut state, KeyCode::Home);
        assert_eq!(state.scroll_y, 0);
        key(&mut state, KeyCode::Char('k'));
        assert_eq!(state.scroll_y, 0);

        key(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn arrow_keys_drive_the_tilt_targets() {
        let mut state = boot(120, false);
        key(&mut state, KeyCode::Right);
        key(&mut state, KeyCode::Up);
        let springs = state.modules.tilt.as_ref().unwrap().springs();
        assert_eq!(springs.tilt_y.target, 4.0);
        assert_eq!(springs.tilt_x.target, 2.0 + 4.0);
    }

    #[test]
    fn tilt_keys_report_when_tilt_is_off() {
        let mut state = boot(60, false);
        key(&mut state, KeyCode::Left);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn scrolling_reveals_each_card_once() {
        let mut state = boot(120, false);
        let card = state.doc.first(Role::RevealTarget).unwrap().id;
        let remaining = state.modules.reveal.as_ref().unwrap().remaining();
        assert_eq!(state.view.reveal_phase(card), RevealPhase::Hidden);

        key(&mut state, KeyCode::End);
        assert_eq!(state.view.reveal_phase(card), RevealPhase::Revealing);
        assert_eq!(state.modules.reveal.as_ref().unwrap().remaining(), 0);
        assert!(remaining > 0);

        key(&mut state, KeyCode::Home);
        key(&mut state, KeyCode::End);
        assert_ne!(state.view.reveal_phase(card), RevealPhase::Hidden);
        assert_eq!(state.triggers.len(), 1, "only the tilt trigger survives");
    }

    #[test]
    fn stage_leaving_the_viewport_stops_the_tilt_loop() {
        let mut state = boot(120, false);
        assert_eq!(state.registry.live_for("tilt"), 1);
        key(&mut state, KeyCode::End);
        assert_eq!(state.registry.live_for("tilt"), 0);
        key(&mut state, KeyCode::Home);
        assert_eq!(state.registry.live_for("tilt"), 1);
    }

    #[test]
    fn focus_loss_pauses_cursor_tilt_and_decor() {
        let mut state = boot(120, false);
        handle_focus(&mut state, false);
        assert_eq!(state.registry.live_for("cursor"), 0);
        assert_eq!(state.registry.live_for("tilt"), 0);
        assert!(state.decor.is_paused());

        handle_focus(&mut state, true);
        assert_eq!(state.registry.live_for("cursor"), 1);
        assert_eq!(state.registry.live_for("tilt"), 1);
        assert!(!state.decor.is_paused());
    }

    #[test]
    fn pointer_over_the_card_hovers_and_tilts() {
        let mut state = boot(120, false);
        let card = state.doc.first(Role::TiltCard).unwrap().rect;
        let page_y = state.layout().page_area.y;
        scroll_to(&mut state, 20);
        let (col, row) = (card.x + 2, card.y - 20 + page_y + 2);
        mouse(&mut state, MouseEventKind::Moved, col, row);

        assert_eq!(state.view.hover(), HoverKind::Large);
        assert!(state.modules.tilt.as_ref().unwrap().is_hovering());
        assert_eq!(state.view.dot(), Some(Point::new(col as f64, row as f64)));

        mouse(&mut state, MouseEventKind::Moved, 0, page_y);
        assert_eq!(state.view.hover(), HoverKind::None);
        assert!(!state.modules.tilt.as_ref().unwrap().is_hovering());
    }

    fn tilt_hover_matches_stage(state: &PageState) {
        let (col, row) = state.pointer.unwrap();
        let inside = state
            .stage_bounds()
            .unwrap()
            .contains(Point::new(col as f64, row as f64));
        assert_eq!(state.modules.tilt.as_ref().unwrap().is_hovering(), inside);
    }

    #[test]
    fn scrolling_under_a_resting_pointer_updates_hover() {
        let mut state = boot(120, false);
        let card = state.doc.first(Role::TiltCard).unwrap().rect;
        let page_y = state.layout().page_area.y;
        scroll_to(&mut state, 20);
        mouse(&mut state, MouseEventKind::Moved, card.x + 2, card.y - 20 + page_y + 2);
        assert!(state.modules.tilt.as_ref().unwrap().is_hovering());
        tilt_hover_matches_stage(&state);

        scroll_by(&mut state, 15);
        tilt_hover_matches_stage(&state);
        let tilt = state.modules.tilt.as_ref().unwrap();
        assert!(!tilt.is_hovering());
        assert_eq!(tilt.springs().tilt_x.target, 2.0);
        assert_eq!(tilt.springs().tilt_y.target, 0.0);
        assert_ne!(state.view.hover(), HoverKind::Large);

        scroll_by(&mut state, -15);
        tilt_hover_matches_stage(&state);
        assert!(state.modules.tilt.as_ref().unwrap().is_hovering());
        assert_eq!(state.view.hover(), HoverKind::Large);
    }

    #[test]
    fn card_settles_to_idle_once_scrolled_off_the_pointer() {
        let mut state = boot(120, false);
        let mut clock = VirtualClock::sixty_fps();
        let card = state.doc.first(Role::TiltCard).unwrap().rect;
        let page_y = state.layout().page_area.y;
        scroll_to(&mut state, 20);
        mouse(&mut state, MouseEventKind::Moved, card.x + 2, card.y - 20 + page_y + 2);
        for _ in 0..30 {
            frame::on_frame(&mut state, clock.next_frame());
        }

        key(&mut state, KeyCode::Char('j'));
        key(&mut state, KeyCode::Char('j'));
        // Two rows down the pointer is still on the card.
        tilt_hover_matches_stage(&state);
        assert!(!state.modules.tilt.as_ref().unwrap().is_idle());

        scroll_by(&mut state, 13);
        // The stage is still partly on screen, so its loop keeps running.
        assert_eq!(state.registry.live_for("tilt"), 1);
        for _ in 0..400 {
            frame::on_frame(&mut state, clock.next_frame());
        }
        assert!(state.modules.tilt.as_ref().unwrap().is_idle());
    }

    #[test]
    fn same_class_resize_rechecks_the_resting_pointer() {
        let mut state = boot(120, false);
        let stage = state.doc.first(Role::TiltStage).unwrap().rect;
        let page_y = state.layout().page_area.y;
        // Near the right edge of the stage, which moves left as the page narrows.
        let (col, row) = (stage.x + stage.width - 3, stage.y + page_y + 2);
        mouse(&mut state, MouseEventKind::Moved, col, row);
        assert!(state.modules.tilt.as_ref().unwrap().is_hovering());

        handle_resize(&mut state, 100, 30);
        assert!(state.modules.tilt.is_some());
        tilt_hover_matches_stage(&state);
        assert!(!state.modules.tilt.as_ref().unwrap().is_hovering());
    }

    #[test]
    fn nav_toggle_and_links() {
        let mut state = boot(120, false);
        let toggle = state.doc.first(Role::NavToggle).unwrap().rect;
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), toggle.x + 1, 0);
        assert!(state.nav_open);

        let showcase = state.doc.all(Role::NavLink).nth(1).unwrap().rect;
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), showcase.x + 1, showcase.y);
        assert!(!state.nav_open);
        let stage = state.doc.first(Role::TiltStage).unwrap().rect;
        assert_eq!(state.scroll_y, stage.y - 1);

        key(&mut state, KeyCode::Char('m'));
        assert!(state.nav_open);
    }

    #[test]
    fn wheel_scrolls_three_rows() {
        let mut state = boot(120, false);
        mouse(&mut state, MouseEventKind::ScrollDown, 5, 5);
        assert_eq!(state.scroll_y, 3);
        mouse(&mut state, MouseEventKind::ScrollUp, 5, 5);
        mouse(&mut state, MouseEventKind::ScrollUp, 5, 5);
        assert_eq!(state.scroll_y, 0);
    }

    #[test]
    fn resize_within_layout_class_keeps_modules() {
        let mut state = boot(120, false);
        key(&mut state, KeyCode::Char('j'));
        handle_resize(&mut state, 110, 30);
        assert!(state.modules.tilt.is_some());
        assert_eq!(state.doc.width, 110);
        assert_eq!(state.scroll_y, 1);
    }

    #[test]
    fn resize_across_breakpoint_reloads() {
        let mut state = boot(120, false);
        key(&mut state, KeyCode::Char('j'));
        handle_resize(&mut state, 60, 30);

        assert!(state.env.narrow);
        assert!(state.modules.tilt.is_none());
        assert_eq!(state.scroll_y, 0);
        assert_eq!(state.registry.live_for("cursor"), 1);
        assert_eq!(state.registry.live_for("tilt"), 0);
    }
}
