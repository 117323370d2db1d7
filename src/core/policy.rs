//! Boot-time environment flags and the visibility policy built on them.
//!
//! [`Environment`] is read once when the page boots.  Module constructors
//! consult it and return a [`SetupSkipped`] reason instead of registering
//! anything when their effect is not wanted.

use thiserror::Error;

use super::elements::Role;

/// Default narrow/wide threshold, in terminal columns.
pub const DEFAULT_BREAKPOINT_COLS: u16 = 90;

/// Flags read once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub reduced_motion: bool,
    pub hover_capable: bool,
    pub narrow: bool,
}

impl Environment {
    /// Probe the environment from user preferences and the current width.
    pub fn probe(prefs: MotionPrefs, width: u16, breakpoint: Breakpoint) -> Self {
        Self {
            reduced_motion: prefs.reduced_motion,
            hover_capable: prefs.hover_capable,
            narrow: breakpoint.is_narrow(width),
        }
    }

    /// Everything enabled, wide layout.
    #[cfg(test)]
    pub fn full_motion() -> Self {
        Self {
            reduced_motion: false,
            hover_capable: true,
            narrow: false,
        }
    }
}

/// User-level motion preferences (CLI flags merged with the config file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionPrefs {
    pub reduced_motion: bool,
    pub hover_capable: bool,
}

/// Why a module declined to set itself up.  Never surfaced as an error to
/// the user; the page simply has one animation fewer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SetupSkipped {
    #[error("reduced motion requested")]
    ReducedMotion,
    #[error("input device cannot hover")]
    NoHover,
    #[error("narrow viewport layout")]
    NarrowViewport,
    #[error("required element missing: {0:?}")]
    MissingElement(Role),
}

// ───────────────────────────────────────── breakpoint ────────

/// Fixed width separating the narrow and wide layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub cols: u16,
}

impl Breakpoint {
    pub fn new(cols: u16) -> Self {
        Self { cols }
    }

    pub fn is_narrow(&self, width: u16) -> bool {
        width < self.cols
    }

    /// True when a resize from `old` to `new` switches layout class.  The
    /// page is rebuilt from scratch in that case.
    pub fn crossed(&self, old: u16, new: u16) -> bool {
        self.is_narrow(old) != self.is_narrow(new)
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT_COLS)
    }
}

// ───────────────────────────────────────── tab state ─────────

/// Foreground/background state of the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabState {
    #[default]
    Foreground,
    Background,
}

impl TabState {
    pub fn is_visible(self) -> bool {
        self == TabState::Foreground
    }
}

// ───────────────────────────────────────── decoration ────────

/// Playback clock for the ambient decorative animation (footer marquee).
///
/// Pausing keeps the accumulated position; resuming continues from it
/// without jumping over the time spent in the background.
#[derive(Debug, Clone, Default)]
pub struct DecorClock {
    elapsed_ms: f64,
    last_ms: Option<f64>,
    paused: bool,
    frozen: bool,
}

impl DecorClock {
    /// A clock that never advances (reduced motion).
    pub fn frozen() -> Self {
        Self {
            frozen: true,
            ..Self::default()
        }
    }

    /// Feed the current frame time.  Returns `true` if the position moved.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if self.frozen || self.paused {
            self.last_ms = None;
            return false;
        }
        let moved = match self.last_ms {
            Some(last) if now_ms > last => {
                self.elapsed_ms += now_ms - last;
                true
            }
            _ => false,
        };
        self.last_ms = Some(now_ms);
        moved
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.last_ms = None;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}
