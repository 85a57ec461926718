pub mod controller;
pub mod keyboard;
pub mod timers;

#[cfg(test)]
mod tests;

pub use controller::{RadialMenu, Response};
pub use keyboard::{Key, UnknownKey};
pub use timers::{Timer, TimerKind};

/// A click-entered level confirms once the pointer is within `inner..=outer * slack`.
pub const CONFIRM_RING_SLACK: f64 = 1.2;
