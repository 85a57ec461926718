use crate::geometry::{Point, Velocity};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MAX_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: Point,
    pub timestamp: Instant,
}

/// A trail sample whose opacity fades to zero at the end of the trail window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub position: Point,
    pub timestamp: Instant,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct MotionTracker {
    samples: VecDeque<MotionSample>,
    capacity: usize,
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(MAX_SAMPLES)
    }
}

impl MotionTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, position: Point, timestamp: Instant) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(MotionSample {
            position,
            timestamp,
        });
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&MotionSample> {
        self.samples.back()
    }

    pub fn samples(&self) -> impl DoubleEndedIterator<Item = &MotionSample> {
        self.samples.iter()
    }

    pub fn velocity(&self) -> Velocity {
        let mut recent = self.samples.iter().rev();
        match (recent.next(), recent.next()) {
            (Some(last), Some(prev)) => calculate_velocity(prev, last),
            _ => Velocity::ZERO,
        }
    }

    pub fn trail(
        &self,
        now: Instant,
        duration: Duration,
        max_points: usize,
    ) -> impl Iterator<Item = TracePoint> + '_ {
        generate_trace_trail(self.samples.iter(), now, duration, max_points)
    }
}

pub fn calculate_velocity(prev: &MotionSample, last: &MotionSample) -> Velocity {
    let dt = match last.timestamp.checked_duration_since(prev.timestamp) {
        Some(dt) if !dt.is_zero() => dt.as_secs_f64(),
        _ => return Velocity::ZERO,
    };
    Velocity::new(
        (last.position.x - prev.position.x) / dt,
        (last.position.y - prev.position.y) / dt,
    )
}

/// Walks samples newest first, keeping those younger than `duration`.
///
/// The iterator is computed from scratch on each call; nothing is cached
/// between frames.
pub fn generate_trace_trail<'a, I>(
    samples: I,
    now: Instant,
    duration: Duration,
    max_points: usize,
) -> impl Iterator<Item = TracePoint> + 'a
where
    I: IntoIterator<Item = &'a MotionSample>,
    I::IntoIter: DoubleEndedIterator + 'a,
{
    let window = duration.as_secs_f64();
    samples
        .into_iter()
        .rev()
        .filter_map(move |sample| {
            let age = now.saturating_duration_since(sample.timestamp).as_secs_f64();
            (window > 0.0 && age <= window).then(|| TracePoint {
                position: sample.position,
                timestamp: sample.timestamp,
                opacity: 1.0 - age / window,
            })
        })
        .take(max_points)
}
