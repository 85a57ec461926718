use crate::config::MenuConfig;
use crate::edge::FlipState;
use crate::geometry::{Point, Polar, distribute_angles, to_cartesian};
use crate::selection::Ring;

/// Where a renderer should draw one sector of the active ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorGeometry {
    pub index: usize,
    /// Screen-space angle of the sector's center line, flip applied.
    pub mid_angle: f64,
    /// Half of the sector's angular span once the gap is taken out.
    pub half_width: f64,
    pub ring: Ring,
    /// Label position, halfway between the ring's inner and outer edge.
    pub anchor: Point,
}

impl SectorGeometry {
    pub fn start_angle(&self) -> f64 {
        self.mid_angle - self.half_width
    }

    pub fn end_angle(&self) -> f64 {
        self.mid_angle + self.half_width
    }

    pub fn layout(
        count: usize,
        center: Point,
        ring: Ring,
        config: &MenuConfig,
        flip: &FlipState,
    ) -> Vec<Self> {
        // a lone item owns the whole sweep
        let span = match count {
            0 => return Vec::new(),
            1 => config.sweep_angle,
            _ => config.sweep_angle / count as f64,
        };
        let half_width = ((span - config.gap) / 2.0).max(0.0);

        distribute_angles(count, config.start_angle, config.sweep_angle)
            .into_iter()
            .enumerate()
            .map(|(index, angle)| {
                let mid_angle = flip.mirror_angle(angle);
                Self {
                    index,
                    mid_angle,
                    half_width,
                    ring,
                    anchor: to_cartesian(
                        center,
                        Polar {
                            radius: ring.mid(),
                            angle: mid_angle,
                        },
                    ),
                }
            })
            .collect()
    }
}
