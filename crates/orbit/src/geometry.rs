use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Pointer velocity in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { vx: 0.0, vy: 0.0 };

    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Component of the velocity pointing away from the center along `angle`.
    pub fn radial_component(&self, angle: f64) -> f64 {
        self.vx * angle.cos() + self.vy * angle.sin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub radius: f64,
    pub angle: f64,
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

pub fn angle_from_center(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Shortest signed rotation from `b` to `a`, in `(-PI, PI]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_angle(a - b)
}

/// Center angle of each of `count` sectors spread over `sweep` starting at `start`.
///
/// A single item sits exactly on `start`; otherwise every item is centered in
/// its own `sweep / count` wide sector.
pub fn distribute_angles(count: usize, start: f64, sweep: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = sweep / count as f64;
            (0..count)
                .map(|i| start + step * i as f64 + step / 2.0)
                .collect()
        }
    }
}

/// Index of the angle closest to `pointer_angle`; ties go to the first one.
pub fn get_closest_item_index(pointer_angle: f64, item_angles: &[f64]) -> Option<usize> {
    item_angles
        .iter()
        .map(|&a| angle_difference(pointer_angle, a).abs())
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, diff)| match best {
            Some((_, best_diff)) if best_diff <= diff => best,
            _ => Some((i, diff)),
        })
        .map(|(i, _)| i)
}

pub fn to_polar(center: Point, point: Point) -> Polar {
    Polar {
        radius: distance(center, point),
        angle: angle_from_center(center, point),
    }
}

pub fn to_cartesian(center: Point, polar: Polar) -> Point {
    Point::new(
        center.x + polar.radius * polar.angle.cos(),
        center.y + polar.radius * polar.angle.sin(),
    )
}

#[cfg(test)]
pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
