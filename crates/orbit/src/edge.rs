use crate::geometry::{Point, normalize_angle};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeFlags {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl EdgeFlags {
    pub fn any(&self) -> bool {
        self.top || self.right || self.bottom || self.left
    }
}

/// Room left between the center and each viewport edge, padding excluded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeSpace {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeState {
    pub constrained: EdgeFlags,
    pub available: EdgeSpace,
    /// Shift that moves the center back inside the viewport.
    pub offset: Point,
}

impl EdgeState {
    pub fn is_constrained(&self) -> bool {
        self.constrained.any()
    }
}

pub fn detect_edge_constraints(
    center: Point,
    required_radius: f64,
    viewport: Viewport,
    padding: f64,
) -> EdgeState {
    let available = EdgeSpace {
        top: center.y - padding,
        right: viewport.width - center.x - padding,
        bottom: viewport.height - center.y - padding,
        left: center.x - padding,
    };

    let constrained = EdgeFlags {
        top: available.top < required_radius,
        right: available.right < required_radius,
        bottom: available.bottom < required_radius,
        left: available.left < required_radius,
    };

    // When both sides of an axis are short the viewport is simply too small;
    // the first branch wins and nothing fits anyway.
    let offset_x = if constrained.left {
        required_radius - available.left
    } else if constrained.right {
        available.right - required_radius
    } else {
        0.0
    };
    let offset_y = if constrained.top {
        required_radius - available.top
    } else if constrained.bottom {
        available.bottom - required_radius
    } else {
        0.0
    };

    EdgeState {
        constrained,
        available,
        offset: Point::new(offset_x, offset_y),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FlipMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipState {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl FlipState {
    pub fn mode(&self) -> FlipMode {
        match (self.flip_x, self.flip_y) {
            (false, false) => FlipMode::None,
            (true, false) => FlipMode::Horizontal,
            (false, true) => FlipMode::Vertical,
            (true, true) => FlipMode::Both,
        }
    }

    /// `(scale_x, scale_y)` a renderer applies around the menu center.
    pub fn scale(&self) -> (f64, f64) {
        (
            if self.flip_x { -1.0 } else { 1.0 },
            if self.flip_y { -1.0 } else { 1.0 },
        )
    }

    /// Mirrors an angle across the flipped axes. The mapping is its own
    /// inverse, so it converts layout angles to screen angles and back.
    pub fn mirror_angle(&self, angle: f64) -> f64 {
        let mut mirrored = angle;
        if self.flip_x {
            mirrored = PI - mirrored;
        }
        if self.flip_y {
            mirrored = -mirrored;
        }
        normalize_angle(mirrored)
    }
}

/// Mirrors the layout along an axis whose far edge is clipped, but only when
/// the opposite side actually has more room.
pub fn calculate_smart_flip(edge: &EdgeState) -> FlipState {
    let (c, a) = (&edge.constrained, &edge.available);
    FlipState {
        flip_x: c.right && a.left > a.right,
        flip_y: c.bottom && a.top > a.bottom,
    }
}
