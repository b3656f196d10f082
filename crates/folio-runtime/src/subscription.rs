#![forbid(unsafe_code)]

//! Single-threaded signals with explicit subscription handles.
//!
//! A [`Signal`] broadcasts values to registered listeners. Registering
//! returns a [`Subscription`]; calling [`Subscription::dispose`] (or dropping
//! the handle) removes the listener so it never runs again.
//!
//! # Invariants
//!
//! 1. A disposed listener is never invoked, even if disposal happens while
//!    the signal is emitting.
//! 2. Listeners registered during an emission are not invoked by that emission.
//! 3. Disposing twice, or after the signal itself is gone, is a no-op.
//!
//! # Failure Modes
//!
//! - Re-entrant emission that would call a listener already running on the
//!   stack skips that listener (logged at warn) instead of panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A unique identifier for a subscription within one signal.
pub type SubId = u64;

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Listeners<T> {
    next_id: SubId,
    entries: Vec<(SubId, Listener<T>)>,
}

impl<T> Listeners<T> {
    fn contains(&self, id: SubId) -> bool {
        self.entries.iter().any(|(i, _)| *i == id)
    }
}

/// Broadcasts values to listeners on the current thread.
///
/// Cloning a signal yields another handle to the same listener set.
pub struct Signal<T> {
    inner: Rc<RefCell<Listeners<T>>>,
}

impl<T: 'static> Signal<T> {
    /// Create a signal with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Listeners {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener.
    ///
    /// The listener stays registered until the returned handle is disposed
    /// or dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, listener));
            id
        };
        tracing::trace!(sub_id = id, "listener subscribed");

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(i, _)| *i != id);
                tracing::trace!(sub_id = id, "listener disposed");
            }
        })
    }

    /// Deliver `value` to every listener. Returns how many were invoked.
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<(SubId, Listener<T>)> = self.inner.borrow().entries.clone();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            match listener.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut *f)(value);
                    delivered += 1;
                }
                Err(_) => {
                    tracing::warn!(sub_id = id, "skipping re-entrant signal delivery");
                }
            }
        }
        delivered
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.inner.try_borrow().map(|l| l.entries.len()).ok();
        f.debug_struct("Signal").field("listeners", &count).finish()
    }
}

/// Handle for a registered listener.
///
/// Disposing is explicit via [`dispose`](Self::dispose); dropping the handle
/// disposes as well.
pub struct Subscription {
    id: SubId,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(id: SubId, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Identifier of the listener within its signal.
    #[inline]
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Whether the subscription has not been disposed yet.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Unregister the listener. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emit_reaches_all_listeners() {
        let signal = Signal::<i32>::new();
        let sum = Rc::new(Cell::new(0));
        let s1 = {
            let sum = Rc::clone(&sum);
            signal.subscribe(move |v| sum.set(sum.get() + v))
        };
        let s2 = {
            let sum = Rc::clone(&sum);
            signal.subscribe(move |v| sum.set(sum.get() + 10 * v))
        };
        assert_eq!(signal.emit(&2), 2);
        assert_eq!(sum.get(), 22);
        assert_ne!(s1.id(), s2.id());
    }

    #[test]
    fn dispose_stops_delivery() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let mut sub = {
            let hits = Rc::clone(&hits);
            signal.subscribe(move |_| hits.set(hits.get() + 1))
        };
        signal.emit(&());
        sub.dispose();
        assert!(!sub.is_active());
        signal.emit(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.listener_count(), 0);
        sub.dispose();
    }

    #[test]
    fn drop_disposes() {
        let signal = Signal::<()>::new();
        {
            let _sub = signal.subscribe(|_| {});
            assert_eq!(signal.listener_count(), 1);
        }
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn dispose_during_emit_skips_later_listener() {
        let signal = Signal::<()>::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let _killer = {
            let victim = Rc::clone(&victim);
            signal.subscribe(move |_| {
                if let Some(mut sub) = victim.borrow_mut().take() {
                    sub.dispose();
                }
            })
        };
        let sub = {
            let hits = Rc::clone(&hits);
            signal.subscribe(move |_| hits.set(hits.get() + 1))
        };
        *victim.borrow_mut() = Some(sub);

        assert_eq!(signal.emit(&()), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn subscribe_during_emit_waits_for_next_emit() {
        let signal = Signal::<()>::new();
        let late_hits = Rc::new(Cell::new(0));
        let holder: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let _adder = {
            let signal = signal.clone();
            let holder = Rc::clone(&holder);
            let late_hits = Rc::clone(&late_hits);
            signal.clone().subscribe(move |_| {
                let late_hits = Rc::clone(&late_hits);
                let sub = signal.subscribe(move |_| late_hits.set(late_hits.get() + 1));
                holder.borrow_mut().push(sub);
            })
        };
        signal.emit(&());
        assert_eq!(late_hits.get(), 0);
        signal.emit(&());
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn dispose_after_signal_dropped_is_noop() {
        let signal = Signal::<()>::new();
        let mut sub = signal.subscribe(|_| {});
        drop(signal);
        sub.dispose();
        assert!(!sub.is_active());
    }
}
