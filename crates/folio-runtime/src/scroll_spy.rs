#![forbid(unsafe_code)]

//! Scroll-spy bound to a scroll signal.
//!
//! [`ScrollSpy::attach`] measures once (the mount pass), subscribes to the
//! scroll signal, and re-measures on every notification. The returned object
//! owns the subscription; [`ScrollSpy::dispose`] unsubscribes so later scroll
//! notifications have no effect.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::scroll_spy::{ActiveSectionTracker, SectionMeasure};

use crate::subscription::{Signal, Subscription};

/// Notification that the document scrolled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChanged {
    /// New vertical scroll offset.
    pub y: f64,
}

/// An [`ActiveSectionTracker`] subscribed to scroll notifications.
pub struct ScrollSpy {
    tracker: Rc<RefCell<ActiveSectionTracker>>,
    measure: Rc<dyn SectionMeasure>,
    changes: Signal<String>,
    subscription: Subscription,
}

impl ScrollSpy {
    /// Run the mount pass and subscribe to `scroll`.
    pub fn attach<M: SectionMeasure + 'static>(
        tracker: ActiveSectionTracker,
        scroll: &Signal<ScrollChanged>,
        measure: M,
    ) -> Self {
        let tracker = Rc::new(RefCell::new(tracker));
        let measure: Rc<dyn SectionMeasure> = Rc::new(measure);
        let changes = Signal::new();

        Self::pass(&tracker, &*measure, &changes);

        let subscription = scroll.subscribe({
            let tracker = Rc::clone(&tracker);
            let measure = Rc::clone(&measure);
            let changes = changes.clone();
            move |event: &ScrollChanged| {
                tracing::trace!(y = event.y, "scroll-spy pass");
                Self::pass(&tracker, &*measure, &changes);
            }
        });

        {
            let t = tracker.borrow();
            tracing::debug!(
                sections = t.registry().len(),
                activation_line = t.activation_line(),
                active = ?t.active_id(),
                "scroll-spy attached"
            );
        }

        Self {
            tracker,
            measure,
            changes,
            subscription,
        }
    }

    fn pass(
        tracker: &RefCell<ActiveSectionTracker>,
        measure: &dyn SectionMeasure,
        changes: &Signal<String>,
    ) {
        let changed = tracker.borrow_mut().update(measure);
        let stats = tracker.borrow().last_pass();
        if stats.skipped > 0 {
            tracing::trace!(skipped = stats.skipped, "unmeasurable sections skipped");
        }
        if !changed {
            return;
        }
        let active = tracker.borrow().active_id().map(str::to_owned);
        if let Some(id) = active {
            tracing::debug!(section = %id, "active section changed");
            changes.emit(&id);
        }
    }

    /// Re-measure outside of a scroll notification (e.g. after a resize).
    ///
    /// Does nothing once disposed.
    pub fn refresh(&self) {
        if self.subscription.is_active() {
            Self::pass(&self.tracker, &*self.measure, &self.changes);
        }
    }

    /// Id of the active section.
    pub fn active_id(&self) -> Option<String> {
        self.tracker.borrow().active_id().map(str::to_owned)
    }

    /// Whether `id` is the active section.
    pub fn is_active(&self, id: &str) -> bool {
        self.tracker.borrow().is_active(id)
    }

    /// Number of measurement passes performed.
    pub fn passes(&self) -> u64 {
        self.tracker.borrow().passes()
    }

    /// Subscribe to active-section changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change(&self, listener: impl FnMut(&String) + 'static) -> Subscription {
        self.changes.subscribe(listener)
    }

    /// Unsubscribe from scroll notifications. Idempotent.
    pub fn dispose(&mut self) {
        if self.subscription.is_active() {
            tracing::debug!("scroll-spy disposed");
        }
        self.subscription.dispose();
    }

    /// Whether the spy still listens to scroll notifications.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }
}

impl std::fmt::Debug for ScrollSpy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSpy")
            .field("active", &self.active_id())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::geometry::Extent;
    use folio_core::scroll_spy::ScrollSpyConfig;
    use folio_core::section::{Section, SectionRegistry};
    use std::cell::Cell;

    /// Page-absolute layout whose scroll offset is set by the test.
    struct Page {
        scroll: Cell<f64>,
        spans: Vec<(&'static str, f64, f64)>,
    }

    impl SectionMeasure for Page {
        fn measure(&self, id: &str) -> Option<Extent> {
            let (_, top, bottom) = self.spans.iter().find(|(s, _, _)| *s == id)?;
            Some(Extent::from_page(*top, bottom - top, self.scroll.get()))
        }
    }

    fn setup() -> (Rc<Page>, Signal<ScrollChanged>, ScrollSpy) {
        let registry = SectionRegistry::new(vec![
            Section::new("a", "A"),
            Section::new("b", "B"),
            Section::new("c", "C"),
        ])
        .unwrap();
        let page = Rc::new(Page {
            scroll: Cell::new(0.0),
            spans: vec![("a", 0.0, 500.0), ("b", 500.0, 1200.0), ("c", 1200.0, 2000.0)],
        });
        let scroll = Signal::new();
        let tracker = ActiveSectionTracker::new(registry, ScrollSpyConfig::default()).unwrap();
        let spy = ScrollSpy::attach(tracker, &scroll, Rc::clone(&page));
        (page, scroll, spy)
    }

    fn scroll_to(page: &Page, signal: &Signal<ScrollChanged>, y: f64) {
        page.scroll.set(y);
        signal.emit(&ScrollChanged { y });
    }

    #[test]
    fn mount_pass_measures_immediately() {
        let (_page, _scroll, spy) = setup();
        assert_eq!(spy.active_id().as_deref(), Some("a"));
        assert_eq!(spy.passes(), 1);
    }

    #[test]
    fn follows_scroll() {
        let (page, scroll, spy) = setup();
        scroll_to(&page, &scroll, 450.0);
        assert!(spy.is_active("b"));
        scroll_to(&page, &scroll, 1500.0);
        assert!(spy.is_active("c"));
    }

    #[test]
    fn change_listener_fires_on_change_only() {
        let (page, scroll, spy) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            spy.on_change(move |id| seen.borrow_mut().push(id.clone()))
        };
        for y in [10.0, 20.0, 600.0, 700.0, 1300.0, 9000.0] {
            scroll_to(&page, &scroll, y);
        }
        assert_eq!(*seen.borrow(), ["b", "c"]);
    }

    #[test]
    fn dispose_stops_tracking() {
        let (page, scroll, mut spy) = setup();
        spy.dispose();
        assert!(!spy.is_attached());
        assert_eq!(scroll.listener_count(), 0);
        scroll_to(&page, &scroll, 1500.0);
        spy.refresh();
        assert_eq!(spy.active_id().as_deref(), Some("a"));
        assert_eq!(spy.passes(), 1);
    }

    #[test]
    fn refresh_remeasures() {
        let (page, _scroll, spy) = setup();
        page.scroll.set(900.0);
        spy.refresh();
        assert_eq!(spy.active_id().as_deref(), Some("b"));
    }
}
