#![forbid(unsafe_code)]

//! Deterministic one-shot timer queue.
//!
//! The queue never reads a clock. The host pops due timers up to a target
//! instant with [`TimerQueue::pop_due`], and may schedule new timers while
//! doing so; a timer scheduled from inside a firing is measured from that
//! firing's deadline, so recurring work stays strictly sequential and never
//! overlaps.
//!
//! # Invariants
//!
//! 1. Timers fire in deadline order; equal deadlines fire in scheduling order.
//! 2. A cancelled timer never fires.
//! 3. `now()` never moves backwards.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle identifying a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw numeric id, for logging.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K> {
    /// Handle the timer was scheduled under.
    pub id: TimerId,
    /// Instant the timer was due.
    pub deadline: Duration,
    /// Routing key supplied when scheduling.
    pub key: K,
}

/// Queue of pending one-shot timers keyed by deadline.
#[derive(Debug)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), K>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<K> TimerQueue<K> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            timers: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current queue time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `key` to fire `delay` after the current queue time.
    pub fn schedule_after(&mut self, delay: Duration, key: K) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay), key)
    }

    /// Schedule `key` to fire at an absolute deadline (clamped to `now`).
    pub fn schedule_at(&mut self, deadline: Duration, key: K) -> TimerId {
        let deadline = deadline.max(self.now);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert((deadline, id), key);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending timer, returning its key if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<K> {
        let deadline = self.deadlines.remove(&id)?;
        self.timers.remove(&(deadline, id))
    }

    /// Whether the timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// Queue time moves to the fired timer's deadline, so timers scheduled
    /// by the caller in response are measured from it.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let (&(deadline, id), _) = self.timers.first_key_value()?;
        if deadline > until {
            return None;
        }
        let key = self.timers.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some(Fired { id, deadline, key })
    }

    /// Move queue time forward to `until` (after draining due timers).
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Cancel every pending timer. Returns how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let n = self.timers.len();
        self.timers.clear();
        self.deadlines.clear();
        n
    }
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
