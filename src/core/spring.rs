//! Spring interpolation with exponential ease-out.
//!
//! Every animated scalar (ring x/y, tilt x/y, glare x/y) is a [`SpringState`]:
//! input handlers move its `target`, and once per frame the `current` value
//! closes a fixed fraction of the remaining gap.  Because the fraction is in
//! `(0, 1]` the value approaches monotonically and never overshoots.

/// Advance `current` one frame toward `target`.
///
/// `factor` is the share of the remaining distance covered this frame.  When
/// the gap is so small that the step would round back to `current`, the value
/// lands on `target` instead, so every call with `current != target` makes
/// strict progress.
pub fn step(current: f64, target: f64, factor: f64) -> f64 {
    let next = current + (target - current) * factor;
    if next == current {
        target
    } else {
        next
    }
}

/// One independently animated scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub current: f64,
    pub target: f64,
}

impl SpringState {
    /// A spring resting at `value`.
    pub fn at(value: f64) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Move the target.  `current` is left alone until the next frame.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Run one interpolation step and return the new current value.
    pub fn advance(&mut self, factor: f64) -> f64 {
        self.current = step(self.current, self.target, factor);
        self.current
    }

    /// Absolute distance left to travel.
    pub fn gap(&self) -> f64 {
        (self.target - self.current).abs()
    }

    /// True when the remaining gap is below `epsilon`.
    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.gap() < epsilon
    }
}
