//! Application orchestration: page state, frame dispatch and input handling.

pub mod event;
pub mod frame;
pub mod handler;
pub mod state;
