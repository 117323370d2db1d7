//! Hero entrance: a fire-once staggered timeline.
//!
//! Each hero fragment gets an entry offset by [`STAGGER_MS`] from the
//! previous one and eases in over [`FRAGMENT_MS`].  The timeline plays once
//! from the first frame after boot and then drops its loop.

use super::countup::ease_out_cubic;
use super::elements::{ElementId, PageElements, Role};
use super::policy::{Environment, SetupSkipped};
use super::scheduler::{FrameLoop, FrameRegistry, FrameTime};
use super::surface::Surface;

pub const FRAGMENT_MS: f64 = 700.0;
pub const STAGGER_MS: f64 = 120.0;

/// An entry in the timeline.
#[derive(Debug)]
struct Entry {
    element: ElementId,
    /// Offset in milliseconds from timeline start.
    offset_ms: f64,
}

#[derive(Debug)]
pub struct Entrance {
    entries: Vec<Entry>,
    started_at: Option<f64>,
    frame_loop: FrameLoop,
}

impl Entrance {
    /// Hide the hero fragments and schedule the timeline.
    pub fn play(
        env: &Environment,
        elements: &PageElements,
        registry: &mut FrameRegistry,
        surface: &mut dyn Surface,
    ) -> Result<Self, SetupSkipped> {
        if env.reduced_motion {
            return Err(SetupSkipped::ReducedMotion);
        }
        let entries: Vec<Entry> = elements
            .all(Role::HeroFragment)
            .enumerate()
            .map(|(i, element)| Entry {
                element,
                offset_ms: i as f64 * STAGGER_MS,
            })
            .collect();
        if entries.is_empty() {
            return Err(SetupSkipped::MissingElement(Role::HeroFragment));
        }
        for entry in &entries {
            surface.set_entrance(entry.element, 0.0);
        }

        let mut frame_loop = FrameLoop::new("entrance");
        frame_loop.start(registry);
        Ok(Self {
            entries,
            started_at: None,
            frame_loop,
        })
    }

    /// Total length of the timeline.
    pub fn duration_ms(&self) -> f64 {
        self.entries
            .last()
            .map_or(0.0, |e| e.offset_ms + FRAGMENT_MS)
    }

    /// Frame callback.  The first frame defines time zero.
    pub fn on_frame(&mut self, frame: FrameTime, registry: &mut FrameRegistry, surface: &mut dyn Surface) {
        if !self.frame_loop.is_running(registry) {
            return;
        }
        let started_at = *self.started_at.get_or_insert(frame.now_ms);
        let elapsed = frame.now_ms - started_at;

        for entry in &self.entries {
            let local = ((elapsed - entry.offset_ms) / FRAGMENT_MS).clamp(0.0, 1.0);
            surface.set_entrance(entry.element, ease_out_cubic(local));
        }
        if elapsed >= self.duration_ms() {
            self.frame_loop.stop(registry);
        }
    }

    #[cfg(test)]
    pub fn is_running(&self, registry: &FrameRegistry) -> bool {
        self.frame_loop.is_running(registry)
    }

    pub fn teardown(&mut self, registry: &mut FrameRegistry) {
        self.frame_loop.stop(registry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::{TickSource, VirtualClock};
    use crate::core::surface::testing::RecordingSurface;

    fn hero(fragments: usize) -> PageElements {
        let mut els = PageElements::new();
        for _ in 0..fragments {
            els.add(Role::HeroFragment);
        }
        els
    }

    #[test]
    fn staggered_fragments_finish_and_loop_ends() {
        let mut registry = FrameRegistry::new();
        let mut surface = RecordingSurface::default();
        let mut entrance =
            Entrance::play(&Environment::full_motion(), &hero(3), &mut registry, &mut surface)
                .unwrap();
        assert_eq!(entrance.duration_ms(), 2.0 * STAGGER_MS + FRAGMENT_MS);

        let mut clock = VirtualClock::new(50.0);
        entrance.on_frame(clock.next_frame(), &mut registry, &mut surface);
        entrance.on_frame(clock.next_frame(), &mut registry, &mut surface);
        // At 50ms only the first fragment has started.
        assert!(surface.entrance[&ElementId(0)] > 0.0);
        assert_eq!(surface.entrance[&ElementId(2)], 0.0);

        while entrance.is_running(&registry) {
            entrance.on_frame(clock.next_frame(), &mut registry, &mut surface);
        }
        for i in 0..3 {
            assert_eq!(surface.entrance[&ElementId(i)], 1.0);
        }
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn reduced_motion_leaves_fragments_untouched() {
        let mut registry = FrameRegistry::new();
        let mut surface = RecordingSurface::default();
        let env = Environment {
            reduced_motion: true,
            ..Environment::full_motion()
        };
        let result = Entrance::play(&env, &hero(3), &mut registry, &mut surface);
        assert!(result.is_err());
        assert_eq!(registry.live_count(), 0);
        assert!(surface.entrance.is_empty());
    }
}
