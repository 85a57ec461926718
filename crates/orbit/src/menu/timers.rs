use std::time::Instant;
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TimerKind {
    SpringLoad,
    BackDwell,
    ErrorClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub deadline: Instant,
    pub generation: u64,
}

/// One cancellable deadline per timer kind. Scheduling a kind replaces its
/// previous deadline; every schedule gets a fresh generation.
#[derive(Debug, Default)]
pub struct Timers {
    spring_load: Option<Timer>,
    back_dwell: Option<Timer>,
    error_clear: Option<Timer>,
    generation: u64,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<Timer> {
        match kind {
            TimerKind::SpringLoad => &mut self.spring_load,
            TimerKind::BackDwell => &mut self.back_dwell,
            TimerKind::ErrorClear => &mut self.error_clear,
        }
    }

    pub fn get(&self, kind: TimerKind) -> Option<Timer> {
        match kind {
            TimerKind::SpringLoad => self.spring_load,
            TimerKind::BackDwell => self.back_dwell,
            TimerKind::ErrorClear => self.error_clear,
        }
    }

    pub fn schedule(&mut self, kind: TimerKind, deadline: Instant) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        *self.slot(kind) = Some(Timer {
            deadline,
            generation,
        });
        log::trace!("timer {} armed (gen {})", kind, generation);
        generation
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let cancelled = self.slot(kind).take().is_some();
        if cancelled {
            log::trace!("timer {} cancelled", kind);
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        for kind in TimerKind::iter() {
            self.cancel(kind);
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        TimerKind::iter()
            .filter_map(|kind| self.get(kind))
            .map(|timer| timer.deadline)
            .min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerKind, Timer)> {
        let mut due = Vec::new();
        for kind in TimerKind::iter() {
            let slot = self.slot(kind);
            if matches!(slot, Some(timer) if timer.deadline <= now)
                && let Some(timer) = slot.take()
            {
                due.push((kind, timer));
            }
        }
        due.sort_by_key(|(_, timer)| (timer.deadline, timer.generation));
        due
    }
}
