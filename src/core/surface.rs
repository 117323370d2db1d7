//! Presentation writes.
//!
//! Modules compute their next visual state with pure `advance` functions and
//! then hand it to a [`Surface`].  The terminal UI implements the trait; tests
//! use [`testing::RecordingSurface`] to count writes.

use super::cursor::HoverKind;
use super::elements::ElementId;
use super::reveal::RevealPhase;
use super::tilt::TiltFrame;

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x < self.left + self.width
            && p.y >= self.top
            && p.y < self.top + self.height
    }

    /// Position of `p` mapped to `[-1, 1]` on both axes (centre = 0).
    pub fn normalize(&self, p: Point) -> (f64, f64) {
        let (fx, fy) = self.fraction(p);
        (fx * 2.0 - 1.0, fy * 2.0 - 1.0)
    }

    /// Position of `p` as a percentage of the box, clamped to `[0, 100]`.
    pub fn percent(&self, p: Point) -> (f64, f64) {
        let (fx, fy) = self.fraction(p);
        (fx * 100.0, fy * 100.0)
    }

    fn fraction(&self, p: Point) -> (f64, f64) {
        let fx = if self.width > 0.0 {
            (p.x - self.left) / self.width
        } else {
            0.5
        };
        let fy = if self.height > 0.0 {
            (p.y - self.top) / self.height
        } else {
            0.5
        };
        (fx.clamp(0.0, 1.0), fy.clamp(0.0, 1.0))
    }
}

/// Sink for everything the motion modules display.
pub trait Surface {
    /// Zero-latency cursor dot.
    fn place_dot(&mut self, at: Point);
    /// Spring-trailing cursor ring.
    fn place_ring(&mut self, at: Point);
    fn set_cursor_hover(&mut self, hover: HoverKind);
    fn apply_tilt(&mut self, frame: &TiltFrame);
    fn set_reveal(&mut self, id: ElementId, phase: RevealPhase);
    fn set_stat_text(&mut self, id: ElementId, text: &str);
    /// Entrance progress of a hero fragment, `0.0` hidden to `1.0` settled.
    fn set_entrance(&mut self, id: ElementId, progress: f64);
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Surface that remembers the last value of everything and counts writes.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub writes: usize,
        pub dot: Option<Point>,
        pub ring: Option<Point>,
        pub hover: Option<HoverKind>,
        pub tilt: Option<TiltFrame>,
        pub reveals: HashMap<ElementId, RevealPhase>,
        pub reveal_log: Vec<(ElementId, RevealPhase)>,
        pub stats: HashMap<ElementId, String>,
        pub stat_log: Vec<(ElementId, String)>,
        pub entrance: HashMap<ElementId, f64>,
    }

    impl Surface for RecordingSurface {
        fn place_dot(&mut self, at: Point) {
            self.writes += 1;
            self.dot = Some(at);
        }

        fn place_ring(&mut self, at: Point) {
            self.writes += 1;
            self.ring = Some(at);
        }

        fn set_cursor_hover(&mut self, hover: HoverKind) {
            self.writes += 1;
            self.hover = Some(hover);
        }

        fn apply_tilt(&mut self, frame: &TiltFrame) {
            self.writes += 1;
            self.tilt = Some(frame.clone());
        }

        fn set_reveal(&mut self, id: ElementId, phase: RevealPhase) {
            self.writes += 1;
            self.reveals.insert(id, phase);
            self.reveal_log.push((id, phase));
        }

        fn set_stat_text(&mut self, id: ElementId, text: &str) {
            self.writes += 1;
            self.stats.insert(id, text.to_string());
            self.stat_log.push((id, text.to_string()));
        }

        fn set_entrance(&mut self, id: ElementId, progress: f64) {
            self.writes += 1;
            self.entrance.insert(id, progress);
        }
    }
}
