//! Time source for staleness checks.
use std::{cell::Cell, rc::Rc};

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant, so a test can keep
/// a handle after moving the clock into a cache.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move every clone of this clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
