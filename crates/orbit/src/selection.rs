use crate::config::MenuConfig;
use crate::edge::FlipState;
use crate::geometry::{Point, angle_from_center, distance, distribute_angles, get_closest_item_index};

/// Farthest hover under finite selection, relative to the outer radius.
pub const HOVER_LIMIT_FACTOR: f64 = 1.5;

/// Inner and outer radius of the ring currently being interacted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inner: f64,
    pub outer: f64,
}

impl Ring {
    pub fn new(inner: f64, outer: f64) -> Self {
        Self { inner, outer }
    }

    pub fn mid(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }
}

pub fn effective_deadzone(ring: Ring, config: &MenuConfig) -> f64 {
    if config.infinite_selection {
        config.center_deadzone.max(ring.inner)
    } else {
        ring.inner
    }
}

/// Hit-tests `pointer` against the `item_count` sectors of `ring`.
///
/// Past the dead-zone the answer depends on the angle only, unless finite
/// selection or `infinite_threshold` bounds the distance.
pub fn resolve_selection(
    pointer: Point,
    center: Point,
    ring: Ring,
    config: &MenuConfig,
    flip: &FlipState,
    item_count: usize,
) -> Option<usize> {
    if item_count == 0 {
        return None;
    }

    let dist = distance(center, pointer);
    if dist < effective_deadzone(ring, config) {
        return None;
    }
    if !config.infinite_selection && dist > ring.outer * HOVER_LIMIT_FACTOR {
        return None;
    }
    if config.infinite_selection
        && config.infinite_threshold > 0.0
        && dist > config.infinite_threshold
    {
        return None;
    }

    let angle = flip.mirror_angle(angle_from_center(center, pointer));
    let angles = distribute_angles(item_count, config.start_angle, config.sweep_angle);
    get_closest_item_index(angle, &angles)
}
