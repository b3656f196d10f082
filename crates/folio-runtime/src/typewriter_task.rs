#![forbid(unsafe_code)]

//! Timer-driven host for a [`Typewriter`].
//!
//! The task keeps at most one timer pending. Each firing performs a single
//! tick and schedules the next one from the firing's deadline, using the
//! delay chosen by the new phase. [`TypewriterTask::teardown`] cancels the
//! pending timer; after it, stale firings are ignored and nothing changes.
//!
//! # Lifecycle
//!
//! 1. [`TypewriterTask::new`]: wrap a configured typewriter.
//! 2. [`TypewriterTask::mount`]: schedule the first tick.
//! 3. [`TypewriterTask::on_timer`]: call for every firing routed to this task.
//! 4. [`TypewriterTask::teardown`]: cancel the pending tick.

use folio_core::typewriter::{Typewriter, TypewriterPhase};

use crate::subscription::{Signal, Subscription};
use crate::timer::{TimerId, TimerQueue};

/// Lifecycle state of a [`TypewriterTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created, no timer scheduled yet.
    Idle,
    /// A tick is scheduled.
    Mounted,
    /// Torn down; no further ticks.
    TornDown,
}

/// Drives a typewriter from a [`TimerQueue`].
#[derive(Debug)]
pub struct TypewriterTask {
    typewriter: Typewriter,
    pending: Option<TimerId>,
    state: TaskState,
    text: Signal<String>,
}

impl TypewriterTask {
    /// Wrap a typewriter. Nothing is scheduled until [`mount`](Self::mount).
    pub fn new(typewriter: Typewriter) -> Self {
        Self {
            typewriter,
            pending: None,
            state: TaskState::Idle,
            text: Signal::new(),
        }
    }

    /// Schedule the first tick. Mounting twice, or after teardown, does nothing.
    pub fn mount<K>(&mut self, timers: &mut TimerQueue<K>, key: K) {
        if self.state != TaskState::Idle {
            tracing::debug!(state = ?self.state, "typewriter mount ignored");
            return;
        }
        self.state = TaskState::Mounted;
        self.schedule(timers, key);
        tracing::debug!(
            phrases = self.typewriter.phrase_count(),
            "typewriter mounted"
        );
    }

    /// Handle a timer firing. Returns `true` if the displayed text changed.
    ///
    /// Firings that do not match the pending timer (stale or foreign) are ignored.
    pub fn on_timer<K>(&mut self, fired: TimerId, timers: &mut TimerQueue<K>, key: K) -> bool {
        if self.state != TaskState::Mounted || self.pending != Some(fired) {
            tracing::trace!(timer = fired.get(), "ignoring stale typewriter timer");
            return false;
        }
        self.pending = None;

        let before = self.typewriter.displayed().len();
        let index_before = self.typewriter.phrase_index();
        let phase_before = self.typewriter.phase();
        let phase = self.typewriter.tick();
        if phase != phase_before {
            tracing::debug!(
                from = ?phase_before,
                to = ?phase,
                phrase_index = self.typewriter.phrase_index(),
                "typewriter phase change"
            );
        }
        let changed = before != self.typewriter.displayed().len()
            || index_before != self.typewriter.phrase_index();

        self.schedule(timers, key);
        if changed {
            self.text.emit(&self.typewriter.displayed().to_owned());
        }
        changed
    }

    /// Cancel the pending tick. Idempotent.
    pub fn teardown<K>(&mut self, timers: &mut TimerQueue<K>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        if self.state != TaskState::TornDown {
            tracing::debug!(ticks = self.typewriter.ticks(), "typewriter torn down");
        }
        self.state = TaskState::TornDown;
    }

    fn schedule<K>(&mut self, timers: &mut TimerQueue<K>, key: K) {
        let delay = self.typewriter.next_delay();
        self.pending = Some(timers.schedule_after(delay, key));
    }

    /// Subscribe to displayed-text changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_text(&self, listener: impl FnMut(&String) + 'static) -> Subscription {
        self.text.subscribe(listener)
    }

    /// Text currently on display.
    pub fn displayed(&self) -> &str {
        self.typewriter.displayed()
    }

    /// Current phase of the underlying state machine.
    pub fn phase(&self) -> TypewriterPhase {
        self.typewriter.phase()
    }

    /// The underlying state machine.
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Handle of the pending tick, if any.
    #[inline]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::typewriter::TypewriterTiming;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn task() -> TypewriterTask {
        TypewriterTask::new(
            Typewriter::new(["Frontend Developer", "UI Designer"], TypewriterTiming::default())
                .unwrap(),
        )
    }

    /// Fire every timer due up to `until`, routing to the task.
    fn run_until(task: &mut TypewriterTask, timers: &mut TimerQueue<()>, until: Duration) -> u32 {
        let mut fired = 0;
        while let Some(f) = timers.pop_due(until) {
            task.on_timer(f.id, timers, ());
            fired += 1;
        }
        timers.settle(until);
        fired
    }

    #[test]
    fn frontend_developer_timeline() {
        let mut timers = TimerQueue::new();
        let mut task = task();
        task.mount(&mut timers, ());

        // 19 typing ticks at 100ms.
        assert_eq!(run_until(&mut task, &mut timers, Duration::from_millis(1900)), 19);
        assert_eq!(task.displayed(), "Frontend Developer");
        assert_eq!(task.phase(), TypewriterPhase::PausingBeforeDelete);

        // Pause of 1000ms, then 19 deleting ticks at 50ms.
        run_until(&mut task, &mut timers, Duration::from_millis(2900));
        assert_eq!(task.phase(), TypewriterPhase::Deleting);
        assert_eq!(run_until(&mut task, &mut timers, Duration::from_millis(3850)), 19);
        assert_eq!(task.displayed(), "");
        assert_eq!(task.typewriter().phrase_index(), 1);
    }

    #[test]
    fn zero_timing_drains_in_bounded_steps() {
        let mut timers = TimerQueue::new();
        let mut task = TypewriterTask::new(
            Typewriter::new(
                ["ab"],
                TypewriterTiming::new(Duration::ZERO, Duration::ZERO, Duration::ZERO),
            )
            .unwrap(),
        );
        task.mount(&mut timers, ());

        // One tick per nanosecond, then the queue catches up with the target.
        let until = Duration::from_micros(100);
        assert_eq!(run_until(&mut task, &mut timers, until), 100_000);
        assert_eq!(timers.now(), until);
        assert_eq!(timers.len(), 1);
        assert!(timers.next_deadline().unwrap() > until);
    }

    #[test]
    fn single_pending_timer() {
        let mut timers = TimerQueue::new();
        let mut task = task();
        task.mount(&mut timers, ());
        for ms in (0..5000).step_by(37) {
            run_until(&mut task, &mut timers, Duration::from_millis(ms));
            assert_eq!(timers.len(), 1);
        }
    }

    #[test]
    fn teardown_cancels_and_freezes() {
        let mut timers = TimerQueue::new();
        let mut task = task();
        task.mount(&mut timers, ());
        run_until(&mut task, &mut timers, Duration::from_millis(500));
        let snapshot = task.displayed().to_owned();
        let pending = task.pending_timer().unwrap();

        task.teardown(&mut timers);
        assert!(timers.is_empty());
        assert_eq!(task.state(), TaskState::TornDown);
        assert_eq!(run_until(&mut task, &mut timers, Duration::from_secs(60)), 0);
        assert_eq!(task.displayed(), snapshot);

        // A stale handle delivered late is ignored.
        assert!(!task.on_timer(pending, &mut timers, ()));
        assert!(timers.is_empty());

        // Remount after teardown is refused.
        task.mount(&mut timers, ());
        assert!(timers.is_empty());
        task.teardown(&mut timers);
    }

    #[test]
    fn text_signal_emits_each_change() {
        let mut timers = TimerQueue::new();
        let mut task = task();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            task.on_text(move |t| seen.borrow_mut().push(t.clone()))
        };
        task.mount(&mut timers, ());
        run_until(&mut task, &mut timers, Duration::from_millis(300));
        assert_eq!(*seen.borrow(), ["F", "Fr", "Fro"]);
    }

    #[test]
    fn foreign_timer_ignored() {
        let mut timers = TimerQueue::new();
        let mut task = task();
        let other = timers.schedule_after(Duration::from_millis(1), ());
        task.mount(&mut timers, ());
        let fired = timers.pop_due(Duration::from_millis(1)).unwrap();
        assert_eq!(fired.id, other);
        assert!(!task.on_timer(fired.id, &mut timers, ()));
        assert_eq!(task.displayed(), "");
    }
}
