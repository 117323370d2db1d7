//! Scroll-position triggers.
//!
//! A small stand-in for a scroll observation service.  Each registration
//! watches one element between a start and an end anchor and reports
//! [`ScrollEvent`]s when the scroll offset moves it between the
//! before/active/after zones.  Events come back as `(TriggerId, ScrollEvent)`
//! pairs; the caller routes them to whichever module owns the id.
//!
//! Nothing fires until [`ScrollTriggers::refresh`] has measured the layout.

use slotmap::{new_key_type, SlotMap};

use super::elements::ElementId;

new_key_type! {
    /// Identity of one trigger registration.
    pub struct TriggerId;
}

/// Which edge of the element an anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// "Element edge meets this fraction of the viewport height."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub edge: Edge,
    pub viewport: f64,
}

impl Anchor {
    pub fn top_at(viewport: f64) -> Self {
        Self {
            edge: Edge::Top,
            viewport,
        }
    }

    pub fn bottom_at(viewport: f64) -> Self {
        Self {
            edge: Edge::Bottom,
            viewport,
        }
    }

    /// Scroll offset at which this anchor is reached.
    fn scroll_offset(&self, span: (f64, f64), viewport_h: f64) -> f64 {
        let edge = match self.edge {
            Edge::Top => span.0,
            Edge::Bottom => span.1,
        };
        edge - self.viewport * viewport_h
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSpec {
    pub start: Anchor,
    pub end: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerOptions {
    /// Kill the registration after its first `Enter`.
    pub once: bool,
}

/// Directional crossing reported for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    /// Start passed while scrolling down.
    Enter,
    /// End passed while scrolling down.
    Leave,
    /// End passed while scrolling up.
    EnterBack,
    /// Start passed while scrolling up.
    LeaveBack,
}

/// Global tuning, set once at boot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Scroll moves smaller than this (in rows) are ignored.
    pub min_delta: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { min_delta: 0.5 }
    }
}

/// Vertical extent of elements in document coordinates.
pub trait ElementGeometry {
    /// `(top, bottom)` of `id`, or `None` if it is not laid out.
    fn vertical_span(&self, id: ElementId) -> Option<(f64, f64)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Before,
    Active,
    After,
}

#[derive(Debug)]
struct Trigger {
    element: ElementId,
    spec: ThresholdSpec,
    once: bool,
    /// `(start, end)` scroll offsets once measured.
    range: Option<(f64, f64)>,
    zone: Zone,
}

impl Trigger {
    fn zone_at(&self, scroll_y: f64) -> Zone {
        match self.range {
            Some((start, _)) if scroll_y < start => Zone::Before,
            Some((_, end)) if scroll_y > end => Zone::After,
            Some(_) => Zone::Active,
            None => Zone::Before,
        }
    }
}

/// Registry of scroll triggers for one page.
#[derive(Debug, Default)]
pub struct ScrollTriggers {
    triggers: SlotMap<TriggerId, Trigger>,
    config: ScrollConfig,
    scroll_y: f64,
}

impl ScrollTriggers {
    pub fn new(config: ScrollConfig) -> Self {
        let mut triggers = Self::default();
        triggers.configure(config);
        triggers
    }

    /// Replace the global tuning.  Takes effect on the next update.
    pub fn configure(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn register(
        &mut self,
        element: ElementId,
        spec: ThresholdSpec,
        options: TriggerOptions,
    ) -> TriggerId {
        self.triggers.insert(Trigger {
            element,
            spec,
            once: options.once,
            range: None,
            zone: Zone::Before,
        })
    }

    pub fn kill(&mut self, id: TriggerId) {
        self.triggers.remove(id);
    }

    /// Live registrations.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[cfg(test)]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Re-measure every registration against the current layout and report
    /// whatever crossings that implies at the current scroll offset.
    pub fn refresh(
        &mut self,
        geometry: &dyn ElementGeometry,
        viewport_h: f64,
    ) -> Vec<(TriggerId, ScrollEvent)> {
        for trigger in self.triggers.values_mut() {
            trigger.range = geometry.vertical_span(trigger.element).map(|span| {
                let start = trigger.spec.start.scroll_offset(span, viewport_h);
                let end = trigger.spec.end.scroll_offset(span, viewport_h);
                (start, end.max(start))
            });
        }
        self.evaluate()
    }

    /// The page scrolled to `scroll_y`.
    pub fn update(&mut self, scroll_y: f64) -> Vec<(TriggerId, ScrollEvent)> {
        if (scroll_y - self.scroll_y).abs() < self.config.min_delta {
            return Vec::new();
        }
        self.scroll_y = scroll_y;
        self.evaluate()
    }

    fn evaluate(&mut self) -> Vec<(TriggerId, ScrollEvent)> {
        let mut events = Vec::new();
        let mut spent = Vec::new();

        for (id, trigger) in self.triggers.iter_mut() {
            let zone = trigger.zone_at(self.scroll_y);
            let crossed = transition(trigger.zone, zone);
            trigger.zone = zone;
            for &event in crossed {
                events.push((id, event));
                if trigger.once && event == ScrollEvent::Enter {
                    spent.push(id);
                    break;
                }
            }
        }

        for id in spent {
            self.kill(id);
        }
        if !events.is_empty() {
            tracing::trace!(scroll_y = self.scroll_y, count = events.len(), "scroll crossings");
        }
        events
    }
}

/// Events produced by moving between two zones, in crossing order.
fn transition(from: Zone, to: Zone) -> &'static [ScrollEvent] {
    use ScrollEvent::*;
    match (from, to) {
        (Zone::Before, Zone::Active) => &[Enter],
        (Zone::Before, Zone::After) => &[Enter, Leave],
        (Zone::Active, Zone::After) => &[Leave],
        (Zone::Active, Zone::Before) => &[LeaveBack],
        (Zone::After, Zone::Active) => &[EnterBack],
        (Zone::After, Zone::Before) => &[EnterBack, LeaveBack],
        _ => &[],
    }
}
