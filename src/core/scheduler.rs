//! Frame scheduling: the shared per-frame facility and per-module loops.
//!
//! [`FrameRegistry`] plays the role of the platform's recurring frame
//! callback: it only records which loops are live.  Each module owns one
//! [`FrameLoop`], which holds at most one [`LoopHandle`] and makes
//! `start`/`stop` idempotent.  Handles are generational slotmap keys, so a
//! handle cancelled by `stop` can never be mistaken for the fresh one a later
//! `start` creates.
//!
//! Time comes from a [`TickSource`]: [`WallClock`] in the binary,
//! [`VirtualClock`] wherever a deterministic frame sequence is needed.

use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Opaque identity of one live recurring frame callback.
    pub struct LoopHandle;
}

// ───────────────────────────────────────── registry ──────────

/// Registry of live frame callbacks, one entry per running module loop.
#[derive(Debug, Default)]
pub struct FrameRegistry {
    live: SlotMap<LoopHandle, &'static str>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, owner: &'static str) -> LoopHandle {
        self.live.insert(owner)
    }

    fn cancel(&mut self, handle: LoopHandle) -> bool {
        self.live.remove(handle).is_some()
    }

    pub fn is_live(&self, handle: LoopHandle) -> bool {
        self.live.contains_key(handle)
    }

    /// Number of callback streams currently scheduled.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live streams registered by `owner`.
    #[cfg(test)]
    pub fn live_for(&self, owner: &str) -> usize {
        self.live.values().filter(|o| **o == owner).count()
    }
}

// ───────────────────────────────────────── per-module loop ───

/// Start/stop lifecycle for one module's recurring step callback.
#[derive(Debug)]
pub struct FrameLoop {
    owner: &'static str,
    handle: Option<LoopHandle>,
}

impl FrameLoop {
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            handle: None,
        }
    }

    /// Schedule the loop.  Returns `false` (and does nothing) when a live
    /// handle already exists.
    pub fn start(&mut self, registry: &mut FrameRegistry) -> bool {
        if self.is_running(registry) {
            return false;
        }
        let handle = registry.register(self.owner);
        self.handle = Some(handle);
        tracing::debug!(owner = self.owner, "frame loop started");
        true
    }

    /// Cancel the loop.  Safe to call when already stopped.
    pub fn stop(&mut self, registry: &mut FrameRegistry) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        let cancelled = registry.cancel(handle);
        if cancelled {
            tracing::debug!(owner = self.owner, "frame loop stopped");
        }
        cancelled
    }

    /// True while this loop's handle is scheduled.  A module's step must
    /// check this before doing any work for a frame.
    pub fn is_running(&self, registry: &FrameRegistry) -> bool {
        self.handle.is_some_and(|h| registry.is_live(h))
    }

    #[cfg(test)]
    pub fn handle(&self) -> Option<LoopHandle> {
        self.handle
    }
}

// ───────────────────────────────────────── tick sources ──────

/// Timestamp handed to every live loop for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Monotonic frame counter, starting at 0.
    pub index: u64,
    /// Milliseconds since the tick source was created.
    pub now_ms: f64,
}

/// Anything that can produce the next frame timestamp.
pub trait TickSource {
    fn next_frame(&mut self) -> FrameTime;
}

/// Real elapsed time, measured from construction.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
    index: u64,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            index: 0,
        }
    }

    /// Milliseconds since construction, without producing a frame.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl TickSource for WallClock {
    fn next_frame(&mut self) -> FrameTime {
        let frame = FrameTime {
            index: self.index,
            now_ms: self.now_ms(),
        };
        self.index += 1;
        frame
    }
}

/// Fixed-step virtual time: frame `n` is at `n * step_ms`.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct VirtualClock {
    step_ms: f64,
    index: u64,
}

#[cfg(test)]
impl VirtualClock {
    pub fn new(step_ms: f64) -> Self {
        Self { step_ms, index: 0 }
    }

    /// A 60 fps virtual clock.
    pub fn sixty_fps() -> Self {
        Self::new(1000.0 / 60.0)
    }
}

#[cfg(test)]
impl TickSource for VirtualClock {
    fn next_frame(&mut self) -> FrameTime {
        let frame = FrameTime {
            index: self.index,
            now_ms: self.index as f64 * self.step_ms,
        };
        self.index += 1;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_start_keeps_one_stream() {
        let mut registry = FrameRegistry::new();
        let mut frame_loop = FrameLoop::new("test");

        assert!(frame_loop.start(&mut registry));
        let first = frame_loop.handle();
        assert!(!frame_loop.start(&mut registry));

        assert_eq!(frame_loop.handle(), first);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn double_stop_is_safe() {
        let mut registry = FrameRegistry::new();
        let mut frame_loop = FrameLoop::new("test");
        frame_loop.start(&mut registry);

        assert!(frame_loop.stop(&mut registry));
        assert!(!frame_loop.stop(&mut registry));
        assert_eq!(registry.live_count(), 0);
        assert!(!frame_loop.is_running(&registry));
    }

    #[test]
    fn restart_yields_fresh_handle_and_retires_the_old_one() {
        let mut registry = FrameRegistry::new();
        let mut frame_loop = FrameLoop::new("test");

        frame_loop.start(&mut registry);
        let old = frame_loop.handle().unwrap();
        frame_loop.stop(&mut registry);
        frame_loop.start(&mut registry);
        let fresh = frame_loop.handle().unwrap();

        assert_ne!(old, fresh);
        assert!(!registry.is_live(old));
        assert!(registry.is_live(fresh));
        assert_eq!(registry.live_for("test"), 1);
    }

    #[test]
    fn loops_are_independent() {
        let mut registry = FrameRegistry::new();
        let mut a = FrameLoop::new("a");
        let mut b = FrameLoop::new("b");
        a.start(&mut registry);
        b.start(&mut registry);
        a.stop(&mut registry);

        assert!(!a.is_running(&registry));
        assert!(b.is_running(&registry));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn virtual_clock_is_deterministic() {
        let mut clock = VirtualClock::new(10.0);
        let frames: Vec<FrameTime> = (0..3).map(|_| clock.next_frame()).collect();
        assert_eq!(
            frames,
            vec![
                FrameTime { index: 0, now_ms: 0.0 },
                FrameTime { index: 1, now_ms: 10.0 },
                FrameTime { index: 2, now_ms: 20.0 },
            ]
        );
    }
}
