//! Time sources for lifecycle timestamps.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of the "now" recorded in entity metadata.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A wall clock that never repeats or goes backwards.
///
/// Each reading is `max(wall clock, previous reading + 1ns)`, so two writes
/// through the same clock always get distinct, ordered timestamps even when
/// the system clock is coarse or steps back.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::nanoseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}
