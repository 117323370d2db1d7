//! Motion core: springs, frame loops, scroll triggers and the effect
//! modules built on them.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Modules
//! write through the [`surface::Surface`] trait and take time from a
//! [`scheduler::TickSource`], so every effect can be driven frame by frame
//! in tests.

pub mod countup;
pub mod cursor;
pub mod elements;
pub mod entrance;
pub mod policy;
pub mod reveal;
pub mod scheduler;
pub mod scroll;
pub mod spring;
pub mod surface;
pub mod tilt;
