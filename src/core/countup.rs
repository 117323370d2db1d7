//! Stat count-up: a one-shot, time-based eased counter.
//!
//! When the stats container first comes into view every stat counts from 0
//! to its declared target over [`DURATION_MS`] with a cubic ease-out.  The
//! loop stops itself on the frame that displays the final value.

use super::elements::{ElementId, PageElements, Role, StatDecl};
use super::policy::{Environment, SetupSkipped};
use super::scheduler::{FrameLoop, FrameRegistry, FrameTime};
use super::scroll::{Anchor, ScrollEvent, ScrollTriggers, ThresholdSpec, TriggerId, TriggerOptions};
use super::surface::Surface;

pub const DURATION_MS: f64 = 2200.0;
/// Viewport fraction the container's top must reach.
pub const START_AT: f64 = 0.80;

/// Cubic ease-out on `p` in `[0, 1]`.
pub fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

/// Displayed value `elapsed_ms` into the animation.
///
/// Exactly `target` once the duration has elapsed.
pub fn value_at(target: u64, elapsed_ms: f64, duration_ms: f64) -> u64 {
    let p = (elapsed_ms / duration_ms).clamp(0.0, 1.0);
    if p >= 1.0 {
        return target;
    }
    let value = (target as f64 * ease_out_cubic(p)).floor() as u64;
    value.min(target)
}

fn display(value: u64, suffix: &str) -> String {
    format!("{value}{suffix}")
}

#[derive(Debug)]
struct StatItem {
    element: ElementId,
    decl: StatDecl,
}

/// The count-up module for one stats container.
#[derive(Debug)]
pub struct StatCountUp {
    stats: Vec<StatItem>,
    trigger: TriggerId,
    fired: bool,
    started_at: Option<f64>,
    frame_loop: FrameLoop,
}

impl StatCountUp {
    /// Register the container's crossing and show every stat at zero.
    /// Stats with a missing, malformed or non-positive target are left
    /// alone.
    pub fn init(
        env: &Environment,
        elements: &PageElements,
        triggers: &mut ScrollTriggers,
        surface: &mut dyn Surface,
    ) -> Result<Self, SetupSkipped> {
        if env.reduced_motion {
            return Err(SetupSkipped::ReducedMotion);
        }
        let container = elements
            .first(Role::StatsContainer)
            .ok_or(SetupSkipped::MissingElement(Role::StatsContainer))?;

        let stats = collect_stats(elements);
        if stats.is_empty() {
            return Err(SetupSkipped::MissingElement(Role::Stat));
        }
        for item in &stats {
            surface.set_stat_text(item.element, &display(0, &item.decl.suffix));
        }

        let trigger = triggers.register(
            container,
            ThresholdSpec {
                start: Anchor::top_at(START_AT),
                end: Anchor::bottom_at(0.0),
            },
            TriggerOptions { once: true },
        );

        Ok(Self {
            stats,
            trigger,
            fired: false,
            started_at: None,
            frame_loop: FrameLoop::new("countup"),
        })
    }

    /// Scroll crossing delivered by the trigger service.
    pub fn on_trigger(
        &mut self,
        id: TriggerId,
        event: ScrollEvent,
        now_ms: f64,
        registry: &mut FrameRegistry,
    ) {
        if id != self.trigger || event != ScrollEvent::Enter || self.fired {
            return;
        }
        self.fired = true;
        self.started_at = Some(now_ms);
        self.frame_loop.start(registry);
        tracing::debug!(stats = self.stats.len(), "count-up started");
    }

    /// Frame callback.  Stops its own loop after writing the final values.
    pub fn on_frame(&mut self, frame: FrameTime, registry: &mut FrameRegistry, surface: &mut dyn Surface) {
        if !self.frame_loop.is_running(registry) {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };
        let elapsed = frame.now_ms - started_at;
        for item in &self.stats {
            let value = value_at(item.decl.target, elapsed, DURATION_MS);
            surface.set_stat_text(item.element, &display(value, &item.decl.suffix));
        }
        if elapsed >= DURATION_MS {
            self.frame_loop.stop(registry);
            tracing::debug!("count-up finished");
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

/// Show every valid stat at its final value with no animation (reduced
/// motion).
pub fn show_final(elements: &PageElements, surface: &mut dyn Surface) {
    for item in collect_stats(elements) {
        surface.set_stat_text(item.element, &display(item.decl.target, &item.decl.suffix));
    }
}

fn collect_stats(elements: &PageElements) -> Vec<StatItem> {
    elements
        .all(Role::Stat)
        .filter_map(|element| match elements.stat_decl(element)? {
            Ok(decl) => Some(StatItem { element, decl }),
            Err(err) => {
                tracing::debug!(element = element.0, %err, "stat skipped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::scheduler::{TickSource, VirtualClock};
    use crate::core::surface::testing::RecordingSurface;

    fn page() -> PageElements {
        let mut els = PageElements::new();
        els.add(Role::StatsContainer);
        els.add_stat("120", Some("+"));
        els.add_stat("0", None);
        els.add_stat("abc", None);
        els.add_stat("98", Some("%"));
        els
    }

    #[test]
    fn value_boundaries() {
        assert_eq!(value_at(500, 0.0, DURATION_MS), 0);
        assert_eq!(value_at(500, DURATION_MS, DURATION_MS), 500);
        assert_eq!(value_at(500, DURATION_MS * 3.0, DURATION_MS), 500);
        assert_eq!(value_at(500, -10.0, DURATION_MS), 0);
    }

    #[test]
    fn value_is_non_decreasing() {
        for target in [1, 7, 98, 1_000, 1_234_567] {
            let mut last = 0;
            for step in 0..=2200 {
                let v = value_at(target, step as f64, DURATION_MS);
                assert!(v >= last, "target {target} dipped at {step}ms");
                assert!(v <= target);
                last = v;
            }
            assert_eq!(last, target);
        }
    }

    #[test]
    fn invalid_targets_are_skipped() {
        let mut triggers = ScrollTriggers::default();
        let mut surface = RecordingSurface::default();
        StatCountUp::init(&Environment::full_motion(), &page(), &mut triggers, &mut surface)
            .unwrap();

        assert_eq!(surface.stats.len(), 2);
        assert_eq!(surface.stats[&ElementId(1)], "0+");
        assert_eq!(surface.stats[&ElementId(4)], "0%");
    }

    #[test]
    fn runs_once_and_self_terminates_on_target() {
        let mut registry = FrameRegistry::new();
        let mut triggers = ScrollTriggers::default();
        let mut surface = RecordingSurface::default();
        let mut stats =
            StatCountUp::init(&Environment::full_motion(), &page(), &mut triggers, &mut surface)
                .unwrap();
        let trigger = stats.trigger;

        stats.on_trigger(trigger, ScrollEvent::Enter, 0.0, &mut registry);
        assert!(stats.is_running(&registry));

        let mut clock = VirtualClock::new(100.0);
        let mut frames = 0;
        while stats.is_running(&registry) {
            stats.on_frame(clock.next_frame(), &mut registry, &mut surface);
            frames += 1;
            assert!(frames < 100);
        }
        // Frames at 0, 100, ..., 2200 ms.
        assert_eq!(frames, 23);
        assert_eq!(surface.stats[&ElementId(1)], "120+");
        assert_eq!(surface.stats[&ElementId(4)], "98%");
        assert_eq!(registry.live_count(), 0);

        // A second crossing does not restart it.
        stats.on_trigger(trigger, ScrollEvent::Enter, 5_000.0, &mut registry);
        assert!(!stats.is_running(&registry));
    }

    #[test]
    fn reduced_motion_shows_final_values() {
        let mut surface = RecordingSurface::default();
        show_final(&page(), &mut surface);
        assert_eq!(surface.stats[&ElementId(1)], "120+");
        assert_eq!(surface.stats[&ElementId(4)], "98%");
        assert_eq!(surface.stats.len(), 2);
    }
}
