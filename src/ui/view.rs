//! Terminal-side presentation state.
//!
//! [`PageView`] is the [`Surface`] the motion modules write to.  It only
//! records values; `page_widget` and `cursor_overlay` read them back at draw
//! time.  Any write sets the dirty flag so the main loop knows to redraw.

use std::collections::HashMap;

use crate::core::countup::ease_out_cubic;
use crate::core::cursor::HoverKind;
use crate::core::elements::ElementId;
use crate::core::reveal::{RevealPhase, TRANSITION_MS};
use crate::core::surface::{Point, Surface};
use crate::core::tilt::TiltFrame;

#[derive(Debug, Default)]
pub struct PageView {
    dot: Option<Point>,
    ring: Option<Point>,
    hover: HoverKind,
    tilt: Option<TiltFrame>,
    /// Reveal phase and the time it was entered.
    reveals: HashMap<ElementId, (RevealPhase, f64)>,
    stats: HashMap<ElementId, String>,
    entrance: HashMap<ElementId, f64>,
    now_ms: f64,
    dirty: bool,
}

impl PageView {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    /// Frame time used to stamp reveal transitions.
    pub fn set_clock(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn dot(&self) -> Option<Point> {
        self.dot
    }

    pub fn ring(&self) -> Option<Point> {
        self.ring
    }

    pub fn hover(&self) -> HoverKind {
        self.hover
    }

    pub fn tilt(&self) -> Option<&TiltFrame> {
        self.tilt.as_ref()
    }

    /// Elements nobody hid are plainly visible.
    pub fn reveal_phase(&self, id: ElementId) -> RevealPhase {
        self.reveals
            .get(&id)
            .map_or(RevealPhase::Revealed, |&(phase, _)| phase)
    }

    /// Eased transition progress of a reveal target in `[0, 1]`.
    pub fn reveal_progress(&self, id: ElementId) -> f64 {
        match self.reveals.get(&id) {
            None | Some((RevealPhase::Revealed, _)) => 1.0,
            Some((RevealPhase::Hidden, _)) => 0.0,
            Some((RevealPhase::Revealing, since)) => {
                ease_out_cubic(((self.now_ms - since) / TRANSITION_MS).clamp(0.0, 1.0))
            }
        }
    }

    /// True while any reveal transition is on screen.
    pub fn is_transitioning(&self) -> bool {
        self.reveals
            .values()
            .any(|(phase, _)| *phase == RevealPhase::Revealing)
    }

    pub fn stat_text(&self, id: ElementId) -> Option<&str> {
        self.stats.get(&id).map(String::as_str)
    }

    /// Entrance progress; fragments that never entered are settled.
    pub fn entrance(&self, id: ElementId) -> f64 {
        self.entrance.get(&id).copied().unwrap_or(1.0)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Surface for PageView {
    fn place_dot(&mut self, at: Point) {
        if self.dot != Some(at) {
            self.dot = Some(at);
            self.dirty = true;
        }
    }

    // Written every frame by the follower; a settled ring costs no redraw.
    fn place_ring(&mut self, at: Point) {
        if self.ring != Some(at) {
            self.ring = Some(at);
            self.dirty = true;
        }
    }

    fn set_cursor_hover(&mut self, hover: HoverKind) {
        self.hover = hover;
        self.dirty = true;
    }

    fn apply_tilt(&mut self, frame: &TiltFrame) {
        self.tilt = Some(frame.clone());
        self.dirty = true;
    }

    fn set_reveal(&mut self, id: ElementId, phase: RevealPhase) {
        self.reveals.insert(id, (phase, self.now_ms));
        self.dirty = true;
    }

    fn set_stat_text(&mut self, id: ElementId, text: &str) {
        self.stats.insert(id, text.to_string());
        self.dirty = true;
    }

    fn set_entrance(&mut self, id: ElementId, progress: f64) {
        self.entrance.insert(id, progress);
        self.dirty = true;
    }
}
