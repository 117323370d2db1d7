//! Tilt card: pointer/keyboard driven pseudo-3D rotation.
//!
//! Input sets target angles and a glare position; the frame step springs the
//! displayed values toward them and derives glare, shadow and parallax from
//! the result.  The loop runs only while the stage is in the viewport and the
//! tab is in the foreground.  At rest, once both axes are within
//! [`SETTLE_EPSILON`] of their targets, a frame does no work at all.

use super::elements::{PageElements, Role};
use super::policy::{Environment, SetupSkipped};
use super::scheduler::{FrameLoop, FrameRegistry, FrameTime};
use super::scroll::{Anchor, ScrollEvent, ScrollTriggers, ThresholdSpec, TriggerId, TriggerOptions};
use super::spring::SpringState;
use super::surface::{Bounds, Point, Surface};

pub const MAX_TILT: f64 = 16.0;
/// Resting tilt around the x axis; the card leans back slightly.
pub const REST_TILT_X: f64 = 2.0;
pub const KEY_STEP: f64 = 4.0;
pub const HOVER_FACTOR: f64 = 0.06;
pub const REST_FACTOR: f64 = 0.04;
pub const GLARE_FACTOR: f64 = 0.07;
pub const SETTLE_EPSILON: f64 = 0.01;

const GLARE_HOVER_INTENSITY: f64 = 0.35;
const GLARE_REST_INTENSITY: f64 = 0.12;
const SHADOW_SCALE: f64 = 0.8;
const SHADOW_DEPTH: f64 = 18.0;
const SHADOW_BASE_OPACITY: f64 = 0.25;
const SHADOW_TILT_OPACITY: f64 = 0.15;
/// Offset per degree for each decorative layer, front to back.
const PARALLAX_SCALES: [f64; 3] = [1.6, 1.0, -0.7];

/// Arrow-key nudges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltKey {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glare {
    pub x_pct: f64,
    pub y_pct: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

/// Everything one frame writes to the card and its layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltFrame {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub glare: Glare,
    pub shadow: Shadow,
    /// One offset per parallax layer present on the page.
    pub parallax: Vec<Point>,
}

/// The four springs of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSprings {
    pub tilt_x: SpringState,
    pub tilt_y: SpringState,
    pub glare_x: SpringState,
    pub glare_y: SpringState,
}

impl TiltFrame {
    /// The frame a card shows at rest, with `layers` parallax layers.
    pub fn resting(layers: usize) -> Self {
        let layers = layers.min(PARALLAX_SCALES.len());
        Self {
            rotate_x: REST_TILT_X,
            rotate_y: 0.0,
            glare: glare_for(50.0, 50.0, false),
            shadow: shadow_for(REST_TILT_X, 0.0),
            parallax: PARALLAX_SCALES[..layers]
                .iter()
                .map(|&s| parallax_for(REST_TILT_X, 0.0, s))
                .collect(),
        }
    }
}

impl TiltSprings {
    fn resting() -> Self {
        Self {
            tilt_x: SpringState::at(REST_TILT_X),
            tilt_y: SpringState::at(0.0),
            glare_x: SpringState::at(50.0),
            glare_y: SpringState::at(50.0),
        }
    }
}

/// The tilt-card module.
#[derive(Debug)]
pub struct TiltCard {
    springs: TiltSprings,
    hovering: bool,
    in_viewport: bool,
    tab_visible: bool,
    parallax_layers: usize,
    trigger: TriggerId,
    frame_loop: FrameLoop,
    frames_run: u64,
}

impl TiltCard {
    /// Set up the card.  The loop is not started here; it waits for the
    /// stage to enter the viewport.
    pub fn init(
        env: &Environment,
        elements: &PageElements,
        triggers: &mut ScrollTriggers,
    ) -> Result<Self, SetupSkipped> {
        if env.narrow {
            return Err(SetupSkipped::NarrowViewport);
        }
        if env.reduced_motion {
            return Err(SetupSkipped::ReducedMotion);
        }
        let stage = elements
            .first(Role::TiltStage)
            .ok_or(SetupSkipped::MissingElement(Role::TiltStage))?;
        if elements.first(Role::TiltCard).is_none() {
            return Err(SetupSkipped::MissingElement(Role::TiltCard));
        }

        let parallax_layers = elements
            .all(Role::ParallaxLayer)
            .count()
            .min(PARALLAX_SCALES.len());
        let trigger = triggers.register(
            stage,
            ThresholdSpec {
                start: Anchor::top_at(1.0),
                end: Anchor::bottom_at(0.0),
            },
            TriggerOptions { once: false },
        );

        Ok(Self {
            springs: TiltSprings::resting(),
            hovering: false,
            in_viewport: false,
            tab_visible: true,
            parallax_layers,
            trigger,
            frame_loop: FrameLoop::new("tilt"),
            frames_run: 0,
        })
    }

    // ── input ──────────────────────────────────────────────────

    /// Pointer moved somewhere on the page.  Inside the stage it drives the
    /// targets; leaving the stage resets them.
    pub fn pointer_moved(&mut self, at: Point, stage: Bounds) {
        if !stage.contains(at) {
            if self.hovering {
                self.pointer_left();
            }
            return;
        }
        self.hovering = true;
        let (nx, ny) = stage.normalize(at);
        let (gx, gy) = stage.percent(at);
        self.springs.tilt_x.set_target(-ny * MAX_TILT + REST_TILT_X);
        self.springs.tilt_y.set_target(nx * MAX_TILT);
        self.springs.glare_x.set_target(gx);
        self.springs.glare_y.set_target(gy);
    }

    /// Pointer left the stage: everything heads back to rest.
    pub fn pointer_left(&mut self) {
        self.hovering = false;
        self.springs.tilt_x.set_target(REST_TILT_X);
        self.springs.tilt_y.set_target(0.0);
        self.springs.glare_x.set_target(50.0);
        self.springs.glare_y.set_target(50.0);
    }

    pub fn on_key(&mut self, key: TiltKey) {
        let (spring, delta) = match key {
            TiltKey::Left => (&mut self.springs.tilt_y, -KEY_STEP),
            TiltKey::Right => (&mut self.springs.tilt_y, KEY_STEP),
            TiltKey::Up => (&mut self.springs.tilt_x, KEY_STEP),
            TiltKey::Down => (&mut self.springs.tilt_x, -KEY_STEP),
        };
        let next = (spring.target + delta).clamp(-MAX_TILT, MAX_TILT);
        spring.set_target(next);
    }

    // ── visibility ─────────────────────────────────────────────

    /// Scroll crossing delivered by the trigger service.
    pub fn on_trigger(&mut self, id: TriggerId, event: ScrollEvent, registry: &mut FrameRegistry) {
        if id != self.trigger {
            return;
        }
        match event {
            ScrollEvent::Enter | ScrollEvent::EnterBack => self.set_in_viewport(true, registry),
            ScrollEvent::Leave | ScrollEvent::LeaveBack => self.set_in_viewport(false, registry),
        }
    }

    pub fn set_in_viewport(&mut self, visible: bool, registry: &mut FrameRegistry) {
        self.in_viewport = visible;
        self.sync_loop(registry);
    }

    pub fn set_tab_visible(&mut self, visible: bool, registry: &mut FrameRegistry) {
        self.tab_visible = visible;
        self.sync_loop(registry);
    }

    fn sync_loop(&mut self, registry: &mut FrameRegistry) {
        if self.in_viewport && self.tab_visible {
            self.frame_loop.start(registry);
        } else {
            self.frame_loop.stop(registry);
        }
    }

    // ── frame ──────────────────────────────────────────────────

    /// True when a frame would do nothing.
    pub fn is_idle(&self) -> bool {
        !self.hovering
            && self.springs.tilt_x.is_settled(SETTLE_EPSILON)
            && self.springs.tilt_y.is_settled(SETTLE_EPSILON)
    }

    /// Advance all springs one frame and derive the outputs.  Returns `None`
    /// without touching any state when idle.
    pub fn advance(&mut self) -> Option<TiltFrame> {
        if self.is_idle() {
            return None;
        }
        let factor = if self.hovering { HOVER_FACTOR } else { REST_FACTOR };
        let rotate_x = self.springs.tilt_x.advance(factor);
        let rotate_y = self.springs.tilt_y.advance(factor);
        let glare_x = self.springs.glare_x.advance(GLARE_FACTOR);
        let glare_y = self.springs.glare_y.advance(GLARE_FACTOR);

        Some(TiltFrame {
            rotate_x,
            rotate_y,
            glare: glare_for(glare_x, glare_y, self.hovering),
            shadow: shadow_for(rotate_x, rotate_y),
            parallax: PARALLAX_SCALES[..self.parallax_layers]
                .iter()
                .map(|&s| parallax_for(rotate_x, rotate_y, s))
                .collect(),
        })
    }

    /// Frame callback.
    pub fn on_frame(&mut self, _frame: FrameTime, registry: &FrameRegistry, surface: &mut dyn Surface) {
        if !self.frame_loop.is_running(registry) {
            return;
        }
        self.frames_run += 1;
        if let Some(frame) = self.advance() {
            surface.apply_tilt(&frame);
        }
    }

    pub fn teardown(&mut self, registry: &mut FrameRegistry) {
        self.frame_loop.stop(registry);
        tracing::debug!(frames = self.frames_run, "tilt card torn down");
    }

    #[cfg(test)]
    pub fn springs(&self) -> TiltSprings {
        self.springs
    }

    #[cfg(test)]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[cfg(test)]
    pub fn is_running(&self, registry: &FrameRegistry) -> bool {
        self.frame_loop.is_running(registry)
    }

    #[cfg(test)]
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}

// ───────────────────────────────────────── derived outputs ───

fn glare_for(x_pct: f64, y_pct: f64, hovering: bool) -> Glare {
    Glare {
        x_pct,
        y_pct,
        intensity: if hovering {
            GLARE_HOVER_INTENSITY
        } else {
            GLARE_REST_INTENSITY
        },
    }
}

fn shadow_for(rotate_x: f64, rotate_y: f64) -> Shadow {
    let lean = (rotate_x.hypot(rotate_y) / MAX_TILT).min(1.0);
    Shadow {
        offset_x: -rotate_y * SHADOW_SCALE,
        offset_y: SHADOW_DEPTH + rotate_x * SHADOW_SCALE,
        opacity: SHADOW_BASE_OPACITY + lean * SHADOW_TILT_OPACITY,
    }
}

fn parallax_for(rotate_x: f64, rotate_y: f64, scale: f64) -> Point {
    Point::new(rotate_y * scale, -rotate_x * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::{TickSource, VirtualClock};
    use crate::core::surface::testing::RecordingSurface;

    fn page(layers: usize) -> PageElements {
        let mut els = PageElements::new();
        els.add(Role::TiltStage);
        els.add(Role::TiltCard);
        els.add(Role::Glare);
        els.add(Role::Shadow);
        for _ in 0..layers {
            els.add(Role::ParallaxLayer);
        }
        els
    }

    fn card(registry: &mut FrameRegistry) -> TiltCard {
        let mut triggers = ScrollTriggers::default();
        let mut card = TiltCard::init(&Environment::full_motion(), &page(3), &mut triggers).unwrap();
        card.set_in_viewport(true, registry);
        card
    }

    #[test]
    fn pointer_scenario_converges_to_expected_angles() {
        let mut registry = FrameRegistry::new();
        let mut surface = RecordingSurface::default();
        let mut clock = VirtualClock::sixty_fps();
        let mut card = card(&mut registry);

        let stage = Bounds::new(0.0, 0.0, 400.0, 300.0);
        card.pointer_moved(Point::new(100.0, 100.0), stage);

        let springs = card.springs();
        assert!((springs.tilt_x.target - (16.0 / 3.0 + 2.0)).abs() < 1e-9);
        assert_eq!(springs.tilt_y.target, -8.0);
        assert_eq!(springs.glare_x.target, 25.0);

        for _ in 0..400 {
            card.on_frame(clock.next_frame(), &registry, &mut surface);
        }
        let frame = surface.tilt.clone().unwrap();
        assert!((frame.rotate_x - 7.333).abs() < 0.01);
        assert!((frame.rotate_y - -8.0).abs() < 0.01);
        assert_eq!(frame.parallax.len(), 3);
        assert_eq!(frame.glare.intensity, GLARE_HOVER_INTENSITY);
    }

    #[test]
    fn keyboard_nudges_clamp_at_max_tilt() {
        let mut registry = FrameRegistry::new();
        let mut card = card(&mut registry);

        for expected in [4.0, 8.0, 12.0, 16.0] {
            card.on_key(TiltKey::Right);
            assert_eq!(card.springs().tilt_y.target, expected);
        }
        card.on_key(TiltKey::Right);
        assert_eq!(card.springs().tilt_y.target, MAX_TILT);

        for _ in 0..10 {
            card.on_key(TiltKey::Down);
        }
        assert_eq!(card.springs().tilt_x.target, -MAX_TILT);
    }

    #[test]
    fn idle_frames_mutate_and_write_nothing() {
        let mut registry = FrameRegistry::new();
        let mut surface = RecordingSurface::default();
        let mut clock = VirtualClock::sixty_fps();
        let mut card = card(&mut registry);

        card.on_key(TiltKey::Left);
        let mut frames = 0;
        while !card.is_idle() {
            card.on_frame(clock.next_frame(), &registry, &mut surface);
            frames += 1;
            assert!(frames < 2_000, "never settled");
        }

        let settled = card.springs();
        let writes = surface.writes;
        for _ in 0..100 {
            card.on_frame(clock.next_frame(), &registry, &mut surface);
        }
        assert_eq!(card.springs(), settled);
        assert_eq!(surface.writes, writes);

        // A new target wakes it up again.
        card.on_key(TiltKey::Right);
        card.on_frame(clock.next_frame(), &registry, &mut surface);
        assert_eq!(surface.writes, writes + 1);
    }

    #[test]
    fn hovering_never_idles() {
        let mut registry = FrameRegistry::new();
        let mut card = card(&mut registry);
        let stage = Bounds::new(0.0, 0.0, 40.0, 20.0);

        card.pointer_moved(Point::new(20.0, 10.0), stage);
        for _ in 0..1_000 {
            card.advance();
        }
        assert!(!card.is_idle());
        assert!(card.advance().is_some());
    }

    #[test]
    fn leaving_the_stage_resets_targets() {
        let mut registry = FrameRegistry::new();
        let mut card = card(&mut registry);
        let stage = Bounds::new(10.0, 10.0, 40.0, 20.0);

        card.pointer_moved(Point::new(12.0, 12.0), stage);
        assert!(card.is_hovering());
        card.pointer_moved(Point::new(80.0, 5.0), stage);

        let s = card.springs();
        assert!(!card.is_hovering());
        assert_eq!(
            (s.tilt_x.target, s.tilt_y.target, s.glare_x.target, s.glare_y.target),
            (REST_TILT_X, 0.0, 50.0, 50.0)
        );
    }

    #[test]
    fn loop_follows_viewport_and_tab_visibility() {
        let mut registry = FrameRegistry::new();
        let mut triggers = ScrollTriggers::default();
        let mut card = TiltCard::init(&Environment::full_motion(), &page(0), &mut triggers).unwrap();
        let trigger = card.trigger;
        assert!(!card.is_running(&registry));

        card.on_trigger(trigger, ScrollEvent::Enter, &mut registry);
        assert!(card.is_running(&registry));
        card.on_trigger(trigger, ScrollEvent::EnterBack, &mut registry);
        assert_eq!(registry.live_for("tilt"), 1);

        card.set_tab_visible(false, &mut registry);
        assert!(!card.is_running(&registry));
        card.set_tab_visible(true, &mut registry);
        assert!(card.is_running(&registry));

        card.on_trigger(trigger, ScrollEvent::Leave, &mut registry);
        assert!(!card.is_running(&registry));
        // Tab returning does not restart a loop for an off-screen stage.
        card.set_tab_visible(false, &mut registry);
        card.set_tab_visible(true, &mut registry);
        assert_eq!(registry.live_count(), 0);

        card.on_trigger(trigger, ScrollEvent::EnterBack, &mut registry);
        assert_eq!(registry.live_for("tilt"), 1);
    }

    #[test]
    fn skipped_when_narrow_or_reduced_motion() {
        let mut triggers = ScrollTriggers::default();
        let narrow = Environment {
            narrow: true,
            ..Environment::full_motion()
        };
        let reduced = Environment {
            reduced_motion: true,
            ..Environment::full_motion()
        };
        assert_eq!(
            TiltCard::init(&narrow, &page(3), &mut triggers).err(),
            Some(SetupSkipped::NarrowViewport)
        );
        assert_eq!(
            TiltCard::init(&reduced, &page(3), &mut triggers).err(),
            Some(SetupSkipped::ReducedMotion)
        );
        assert_eq!(triggers.len(), 0);
    }

    #[test]
    fn derived_outputs_follow_tilt() {
        let shadow = shadow_for(0.0, 0.0);
        assert_eq!(shadow.offset_x, 0.0);
        assert_eq!(shadow.offset_y, SHADOW_DEPTH);
        assert_eq!(shadow.opacity, SHADOW_BASE_OPACITY);

        let leaning = shadow_for(MAX_TILT, 0.0);
        assert_eq!(leaning.opacity, SHADOW_BASE_OPACITY + SHADOW_TILT_OPACITY);

        assert_eq!(parallax_for(2.0, -4.0, 1.0), Point::new(-4.0, -2.0));

        let rest = TiltFrame::resting(5);
        assert_eq!(rest.parallax.len(), PARALLAX_SCALES.len());
        assert_eq!(rest.rotate_x, REST_TILT_X);
        assert_eq!(rest.glare.intensity, GLARE_REST_INTENSITY);
    }
}
