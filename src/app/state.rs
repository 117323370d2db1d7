//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&PageState` (rendering) or `&mut PageState` (event
//! handling and frames).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    countup::{self, StatCountUp},
    cursor::PointerFollower,
    elements::{ElementId, Role},
    entrance::Entrance,
    policy::{Breakpoint, DecorClock, Environment, MotionPrefs, SetupSkipped, TabState},
    reveal::ScrollReveal,
    scheduler::FrameRegistry,
    scroll::{ScrollConfig, ScrollEvent, ScrollTriggers, TriggerId},
    surface::Bounds,
    tilt::TiltCard,
};
use crate::ui::{document::PageDocument, layout::AppLayout, view::PageView};

/// The motion modules of one page.  `None` means the module declined setup.
#[derive(Debug, Default)]
pub struct Modules {
    pub cursor: Option<PointerFollower>,
    pub tilt: Option<TiltCard>,
    pub reveal: Option<ScrollReveal>,
    pub stats: Option<StatCountUp>,
    pub entrance: Option<Entrance>,
}

impl Modules {
    /// How many modules set themselves up.
    pub fn active(&self) -> usize {
        [
            self.cursor.is_some(),
            self.tilt.is_some(),
            self.reveal.is_some(),
            self.stats.is_some(),
            self.entrance.is_some(),
        ]
        .into_iter()
        .filter(|&b| b)
        .count()
    }
}

/// Top-level application state.
pub struct PageState {
    /// Settings loaded at startup (bindings, fps).
    pub config: AppConfig,
    /// Motion preferences the page was booted with.
    pub prefs: MotionPrefs,
    pub breakpoint: Breakpoint,
    /// Flags probed at boot; fixed until the next reload.
    pub env: Environment,
    /// The laid-out page.
    pub doc: PageDocument,
    /// Presentation values written by the modules.
    pub view: PageView,
    pub registry: FrameRegistry,
    pub triggers: ScrollTriggers,
    pub modules: Modules,
    /// Footer marquee clock.
    pub decor: DecorClock,
    pub tab: TabState,
    /// First visible document row.
    pub scroll_y: u16,
    /// Full terminal area.
    pub area: Rect,
    pub nav_open: bool,
    /// Element under the pointer, for hover styling.
    pub hovered: Option<ElementId>,
    /// Last screen cell the pointer was seen at.
    pub pointer: Option<(u16, u16)>,
    /// Time of the most recent frame.
    pub now_ms: f64,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

fn setup<T>(module: &str, result: Result<T, SetupSkipped>) -> Option<T> {
    match result {
        Ok(m) => Some(m),
        Err(reason) => {
            tracing::debug!(module, %reason, "setup skipped");
            None
        }
    }
}

impl PageState {
    /// Build the page for `area` at time `now_ms` and set every module up.
    /// Equivalent to a full page load.
    pub fn boot(
        config: AppConfig,
        prefs: MotionPrefs,
        breakpoint: Breakpoint,
        area: Rect,
        now_ms: f64,
    ) -> Self {
        let env = Environment::probe(prefs, area.width, breakpoint);
        tracing::info!(
            width = area.width,
            reduced_motion = env.reduced_motion,
            hover = env.hover_capable,
            narrow = env.narrow,
            "page boot"
        );

        let doc = PageDocument::build(area.width, env.narrow);
        let mut view = PageView::new();
        view.set_clock(now_ms);
        let mut registry = FrameRegistry::new();
        let mut triggers = ScrollTriggers::new(ScrollConfig::default());

        let els = &doc.elements;
        let modules = Modules {
            cursor: setup("cursor", PointerFollower::init(&env, els, &mut registry)),
            tilt: setup("tilt", TiltCard::init(&env, els, &mut triggers)),
            reveal: setup("reveal", ScrollReveal::init(&env, els, &mut triggers, &mut view)),
            stats: setup("countup", StatCountUp::init(&env, els, &mut triggers, &mut view)),
            entrance: setup("entrance", Entrance::play(&env, els, &mut registry, &mut view)),
        };
        if env.reduced_motion {
            countup::show_final(els, &mut view);
        }
        let decor = if env.reduced_motion {
            DecorClock::frozen()
        } else {
            DecorClock::default()
        };

        let mut state = Self {
            config,
            prefs,
            breakpoint,
            env,
            doc,
            view,
            registry,
            triggers,
            modules,
            decor,
            tab: TabState::Foreground,
            scroll_y: 0,
            area,
            nav_open: false,
            hovered: None,
            pointer: None,
            now_ms,
            should_quit: false,
            status_message: None,
        };
        state.refresh_triggers();
        tracing::debug!(
            modules = state.modules.active(),
            loops = state.registry.live_count(),
            triggers = state.triggers.len(),
            "page ready"
        );
        state
    }

    /// Cancel every loop the page owns.
    pub fn teardown(&mut self) {
        let Self {
            modules, registry, ..
        } = self;
        if let Some(m) = modules.cursor.as_mut() {
            m.teardown(registry);
        }
        if let Some(m) = modules.tilt.as_mut() {
            m.teardown(registry);
        }
        if let Some(m) = modules.stats.as_mut() {
            m.teardown(registry);
        }
        if let Some(m) = modules.entrance.as_mut() {
            m.teardown(registry);
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.area)
    }

    /// Rows of document visible at once.
    pub fn viewport_h(&self) -> u16 {
        self.layout().page_area.height
    }

    pub fn max_scroll(&self) -> u16 {
        self.doc.max_scroll(self.viewport_h())
    }

    /// Re-measure the layout and deliver whatever crossings it implies.
    pub fn refresh_triggers(&mut self) {
        let events = self
            .triggers
            .refresh(&self.doc, self.viewport_h() as f64);
        self.dispatch_scroll_events(events);
    }

    /// Route trigger events to the module that owns each id.
    pub fn dispatch_scroll_events(&mut self, events: Vec<(TriggerId, ScrollEvent)>) {
        let Self {
            modules,
            registry,
            view,
            now_ms,
            ..
        } = self;
        for (id, event) in events {
            tracing::debug!(?event, "scroll trigger");
            if let Some(tilt) = modules.tilt.as_mut() {
                tilt.on_trigger(id, event, registry);
            }
            if let Some(reveal) = modules.reveal.as_mut() {
                reveal.on_trigger(id, event, *now_ms, view);
            }
            if let Some(stats) = modules.stats.as_mut() {
                stats.on_trigger(id, event, *now_ms, registry);
            }
        }
    }

    /// Screen-space bounds of the tilt stage at the current scroll offset.
    pub fn stage_bounds(&self) -> Option<Bounds> {
        let stage = self.doc.first(Role::TiltStage)?;
        let page = self.layout().page_area;
        let r = stage.rect;
        Some(Bounds::new(
            (page.x + r.x) as f64,
            page.y as f64 + r.y as f64 - self.scroll_y as f64,
            r.width as f64,
            r.height as f64,
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::reveal::RevealPhase;

    pub(crate) fn prefs(reduced_motion: bool) -> MotionPrefs {
        MotionPrefs {
            reduced_motion,
            hover_capable: true,
        }
    }

    pub(crate) fn boot(width: u16, reduced_motion: bool) -> PageState {
        PageState::boot(
            AppConfig::default(),
            prefs(reduced_motion),
            Breakpoint::default(),
            Rect::new(0, 0, width, 30),
            0.0,
        )
    }

    #[test]
    fn full_motion_boot_sets_everything_up() {
        let state = boot(120, false);
        assert_eq!(state.modules.active(), 5);
        assert_eq!(state.registry.live_for("cursor"), 1);
        assert_eq!(state.registry.live_for("entrance"), 1);
        // The stats and the stage are inside the first screen already.
        assert_eq!(state.registry.live_for("countup"), 1);
        assert_eq!(state.registry.live_for("tilt"), 1);

        let first = state.doc.first(Role::RevealTarget).unwrap();
        assert_eq!(state.view.reveal_phase(first.id), RevealPhase::Hidden);
    }

    #[test]
    fn reduced_motion_boot_is_static_and_complete() {
        let state = boot(120, true);
        assert_eq!(state.modules.active(), 0);
        assert_eq!(state.registry.live_count(), 0);
        assert_eq!(state.triggers.len(), 0);

        let stat = state.doc.first(Role::Stat).unwrap();
        assert_eq!(state.view.stat_text(stat.id), Some("120fps"));
        let card = state.doc.first(Role::RevealTarget).unwrap();
        assert_eq!(state.view.reveal_phase(card.id), RevealPhase::Revealed);
    }

    #[test]
    fn narrow_boot_skips_only_tilt() {
        let state = boot(60, false);
        assert!(state.env.narrow);
        assert!(state.modules.tilt.is_none());
        assert_eq!(state.modules.active(), 4);
    }

    #[test]
    fn no_hover_skips_the_cursor() {
        let state = PageState::boot(
            AppConfig::default(),
            MotionPrefs {
                reduced_motion: false,
                hover_capable: false,
            },
            Breakpoint::default(),
            Rect::new(0, 0, 120, 30),
            0.0,
        );
        assert!(state.modules.cursor.is_none());
        assert_eq!(state.registry.live_for("cursor"), 0);
    }

    #[test]
    fn teardown_cancels_every_loop() {
        let mut state = boot(120, false);
        assert!(state.registry.live_count() > 0);
        state.teardown();
        assert_eq!(state.registry.live_count(), 0);
    }

    #[test]
    fn stage_bounds_follow_scroll() {
        let mut state = boot(120, false);
        let before = state.stage_bounds().unwrap();
        state.scroll_y = 5;
        let after = state.stage_bounds().unwrap();
        assert_eq!(before.top - after.top, 5.0);
        assert_eq!(before.left, after.left);
    }
}
