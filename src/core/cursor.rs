//! Pointer follower: an instant dot and a spring-trailing ring.
//!
//! The dot is written straight from each pointer-move event.  The ring only
//! learns the new target there; its displayed position is advanced once per
//! frame with a fixed damping factor.  The two speeds are the effect.

use super::elements::{PageElements, Role};
use super::policy::{Environment, SetupSkipped};
use super::scheduler::{FrameLoop, FrameRegistry, FrameTime};
use super::spring::SpringState;
use super::surface::{Point, Surface};

/// Share of the remaining ring distance covered per frame.
pub const RING_DAMPING: f64 = 0.12;

/// Cursor emphasis derived from the hovered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverKind {
    #[default]
    None,
    Small,
    Large,
}

impl HoverKind {
    /// Classify the element under the pointer.
    pub fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::TiltStage | Role::TiltCard | Role::PlayControl | Role::Thumbnail) => {
                HoverKind::Large
            }
            Some(Role::NavLink | Role::NavToggle | Role::Button) => HoverKind::Small,
            _ => HoverKind::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerState {
    Running,
    Paused,
}

/// The cursor module.
#[derive(Debug)]
pub struct PointerFollower {
    ring_x: SpringState,
    ring_y: SpringState,
    damping: f64,
    hover: HoverKind,
    state: FollowerState,
    frame_loop: FrameLoop,
    frames_run: u64,
}

impl PointerFollower {
    /// Set up the follower and start its loop.
    ///
    /// Skipped on devices that cannot hover, under reduced motion, or when
    /// either cursor element is missing.  Nothing is registered in that case.
    pub fn init(
        env: &Environment,
        elements: &PageElements,
        registry: &mut FrameRegistry,
    ) -> Result<Self, SetupSkipped> {
        if !env.hover_capable {
            return Err(SetupSkipped::NoHover);
        }
        if env.reduced_motion {
            return Err(SetupSkipped::ReducedMotion);
        }
        for role in [Role::CursorDot, Role::CursorRing] {
            if elements.first(role).is_none() {
                return Err(SetupSkipped::MissingElement(role));
            }
        }

        let mut follower = Self {
            ring_x: SpringState::at(0.0),
            ring_y: SpringState::at(0.0),
            damping: RING_DAMPING,
            hover: HoverKind::None,
            state: FollowerState::Running,
            frame_loop: FrameLoop::new("cursor"),
            frames_run: 0,
        };
        follower.frame_loop.start(registry);
        Ok(follower)
    }

    /// Pointer moved: place the dot now, retarget the ring.
    pub fn on_pointer_move(&mut self, at: Point, surface: &mut dyn Surface) {
        surface.place_dot(at);
        self.ring_x.set_target(at.x);
        self.ring_y.set_target(at.y);
    }

    /// Pointer entered an element; re-classify hover with no interpolation.
    pub fn on_pointer_over(&mut self, role: Option<Role>, surface: &mut dyn Surface) -> HoverKind {
        let hover = HoverKind::for_role(role);
        if hover != self.hover {
            self.hover = hover;
            surface.set_cursor_hover(hover);
        }
        hover
    }

    /// Tab visibility changed.  Backgrounding cancels the loop; returning
    /// starts a fresh one from wherever the ring was left.
    pub fn set_tab_visible(&mut self, visible: bool, registry: &mut FrameRegistry) {
        match (visible, self.state) {
            (false, FollowerState::Running) => {
                self.frame_loop.stop(registry);
                self.state = FollowerState::Paused;
                tracing::debug!(frames = self.frames_run, "cursor paused");
            }
            (true, FollowerState::Paused) => {
                self.frame_loop.start(registry);
                self.state = FollowerState::Running;
                tracing::debug!("cursor resumed");
            }
            _ => {}
        }
    }

    /// Advance the ring one frame and return its new position.
    pub fn advance(&mut self) -> Point {
        Point::new(
            self.ring_x.advance(self.damping),
            self.ring_y.advance(self.damping),
        )
    }

    /// Frame callback.
    pub fn on_frame(&mut self, _frame: FrameTime, registry: &FrameRegistry, surface: &mut dyn Surface) {
        if !self.frame_loop.is_running(registry) {
            return;
        }
        self.frames_run += 1;
        let ring = self.advance();
        surface.place_ring(ring);
    }

    /// Cancel the loop for good (page teardown).
    pub fn teardown(&mut self, registry: &mut FrameRegistry) {
        self.frame_loop.stop(registry);
    }

    #[cfg(test)]
    pub fn state(&self) -> FollowerState {
        self.state
    }

    #[cfg(test)]
    pub fn hover(&self) -> HoverKind {
        self.hover
    }

    #[cfg(test)]
    pub fn ring(&self) -> Point {
        Point::new(self.ring_x.current, self.ring_y.current)
    }

    #[cfg(test)]
    /// Frames whose step actually ran.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}
