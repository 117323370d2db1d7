//! One-shot scroll reveals.
//!
//! Every reveal target starts hidden and is revealed the first time its top
//! crosses [`REVEAL_AT`] of the viewport height while scrolling down.  The
//! transition hint is held for [`TRANSITION_MS`] and then released.  Later
//! crossings in either direction are ignored for the element's lifetime.

use super::elements::{ElementId, PageElements, Role};
use super::policy::{Environment, SetupSkipped};
use super::scroll::{Anchor, ScrollEvent, ScrollTriggers, ThresholdSpec, TriggerId, TriggerOptions};
use super::surface::Surface;

/// Viewport fraction the element's top must reach.
pub const REVEAL_AT: f64 = 0.88;
/// Length of the reveal transition.
pub const TRANSITION_MS: f64 = 900.0;

/// Visual state of a reveal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    /// Revealed, transition still running (rendering hint held).
    Revealing,
    /// Revealed, hint released.
    Revealed,
}

#[derive(Debug)]
struct RevealTarget {
    element: ElementId,
    trigger: TriggerId,
    fired: bool,
}

/// The reveal module for all marked elements on the page.
#[derive(Debug)]
pub struct ScrollReveal {
    targets: Vec<RevealTarget>,
    /// Elements whose hint is released at the given time.
    pending: Vec<(ElementId, f64)>,
}

impl ScrollReveal {
    /// Hide every reveal target and register its crossing.  Under reduced
    /// motion nothing is hidden or registered.
    pub fn init(
        env: &Environment,
        elements: &PageElements,
        triggers: &mut ScrollTriggers,
        surface: &mut dyn Surface,
    ) -> Result<Self, SetupSkipped> {
        if env.reduced_motion {
            return Err(SetupSkipped::ReducedMotion);
        }
        let ids: Vec<ElementId> = elements.all(Role::RevealTarget).collect();
        if ids.is_empty() {
            return Err(SetupSkipped::MissingElement(Role::RevealTarget));
        }

        let spec = ThresholdSpec {
            start: Anchor::top_at(REVEAL_AT),
            end: Anchor::bottom_at(0.0),
        };
        let targets = ids
            .into_iter()
            .map(|element| {
                surface.set_reveal(element, RevealPhase::Hidden);
                RevealTarget {
                    element,
                    trigger: triggers.register(element, spec, TriggerOptions { once: true }),
                    fired: false,
                }
            })
            .collect();

        Ok(Self {
            targets,
            pending: Vec::new(),
        })
    }

    /// Scroll crossing delivered by the trigger service.  Returns `true` if
    /// this call revealed an element.
    pub fn on_trigger(
        &mut self,
        id: TriggerId,
        event: ScrollEvent,
        now_ms: f64,
        surface: &mut dyn Surface,
    ) -> bool {
        if event != ScrollEvent::Enter {
            return false;
        }
        let Some(target) = self.targets.iter_mut().find(|t| t.trigger == id) else {
            return false;
        };
        if target.fired {
            return false;
        }
        target.fired = true;
        surface.set_reveal(target.element, RevealPhase::Revealing);
        self.pending.push((target.element, now_ms + TRANSITION_MS));
        tracing::debug!(element = target.element.0, "revealed");
        true
    }

    /// Release transition hints whose time has come.
    pub fn poll(&mut self, now_ms: f64, surface: &mut dyn Surface) {
        self.pending.retain(|&(element, release_at)| {
            if now_ms >= release_at {
                surface.set_reveal(element, RevealPhase::Revealed);
                false
            } else {
                true
            }
        });
    }

    #[cfg(test)]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.targets
            .iter()
            .any(|t| t.element == element && t.fired)
    }

    #[cfg(test)]
    /// Targets not yet revealed.
    pub fn remaining(&self) -> usize {
        self.targets.iter().filter(|t| !t.fired).count()
    }
}
