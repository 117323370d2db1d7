//! Per-frame dispatch.
//!
//! Every tick of the main loop hands one [`FrameTime`] to each module.  The
//! modules decide for themselves whether their loop is live; a module whose
//! loop was cancelled does nothing.

use crate::core::scheduler::FrameTime;

use super::state::PageState;

pub fn on_frame(state: &mut PageState, frame: FrameTime) {
    state.now_ms = frame.now_ms;

    let PageState {
        modules,
        registry,
        view,
        decor,
        ..
    } = state;
    view.set_clock(frame.now_ms);

    if decor.advance(frame.now_ms) {
        view.mark_dirty();
    }
    if let Some(reveal) = modules.reveal.as_mut() {
        reveal.poll(frame.now_ms, view);
    }
    if let Some(cursor) = modules.cursor.as_mut() {
        cursor.on_frame(frame, registry, view);
    }
    if let Some(tilt) = modules.tilt.as_mut() {
        tilt.on_frame(frame, registry, view);
    }
    if let Some(stats) = modules.stats.as_mut() {
        stats.on_frame(frame, registry, view);
    }
    if let Some(entrance) = modules.entrance.as_mut() {
        entrance.on_frame(frame, registry, view);
    }
    // Reveal fades are computed at draw time from the clock.
    if view.is_transitioning() {
        view.mark_dirty();
    }
}
