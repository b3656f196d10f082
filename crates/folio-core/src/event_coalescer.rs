#![forbid(unsafe_code)]

//! Event coalescing for high-frequency page events.
//!
//! Browsers fire scroll notifications many times per frame. Navbar flags
//! and reveal passes only care about the latest offset, so [`EventCoalescer`]
//! keeps:
//! - the most recent scroll offset
//! - the most recent viewport size
//!
//! Other events (clicks) pass through immediately. The caller is
//! responsible for flushing pending events before acting on a pass-through
//! event, so ordering relative to clicks is preserved.
//!
//! The active-section tracker is not a coalescing consumer: it keeps the
//! last matched section when an offset matches nothing, so the offsets it
//! passed through matter.
//!
//! # Usage
//!
//! ```
//! use folio_core::event::PageEvent;
//! use folio_core::event_coalescer::EventCoalescer;
//!
//! let mut coalescer = EventCoalescer::new();
//! assert!(coalescer.push(PageEvent::scroll(10.0)).is_none());
//! assert!(coalescer.push(PageEvent::scroll(40.0)).is_none());
//!
//! let click = coalescer.push(PageEvent::ToggleMenu);
//! assert_eq!(click, Some(PageEvent::ToggleMenu));
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending, vec![PageEvent::scroll(40.0)]);
//! ```

use crate::event::PageEvent;
use crate::geometry::Viewport;

/// Coalesces scroll and resize storms into their latest values.
///
/// All operations are O(1); at most two events are held.
#[derive(Debug, Clone, Default)]
pub struct EventCoalescer {
    /// Latest viewport size.
    pending_resize: Option<Viewport>,
    /// Latest scroll offset and how many notifications it replaced.
    pending_scroll: Option<ScrollState>,
}

#[derive(Debug, Clone, Copy)]
struct ScrollState {
    y: f64,
    count: u32,
}

impl EventCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` for events that should be handled immediately,
    /// `None` when the event was absorbed into pending state.
    pub fn push(&mut self, event: PageEvent) -> Option<PageEvent> {
        match event {
            PageEvent::Scroll { y } => {
                let count = self.pending_scroll.map_or(0, |s| s.count);
                self.pending_scroll = Some(ScrollState {
                    y,
                    count: count.saturating_add(1),
                });
                None
            }
            PageEvent::Resize(viewport) => {
                self.pending_resize = Some(viewport);
                None
            }
            other => Some(other),
        }
    }

    /// Flush pending events: resize first (layout depends on it), then scroll.
    pub fn flush(&mut self) -> Vec<PageEvent> {
        let mut out = Vec::with_capacity(2);
        if let Some(viewport) = self.pending_resize.take() {
            out.push(PageEvent::Resize(viewport));
        }
        if let Some(scroll) = self.pending_scroll.take() {
            out.push(PageEvent::Scroll { y: scroll.y });
        }
        out
    }

    /// Whether any event is pending.
    pub fn has_pending(&self) -> bool {
        self.pending_resize.is_some() || self.pending_scroll.is_some()
    }

    /// Number of scroll notifications merged into the pending one.
    pub fn pending_scroll_count(&self) -> u32 {
        self.pending_scroll.map_or(0, |s| s.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_scroll_wins() {
        let mut c = EventCoalescer::new();
        for y in [1.0, 2.0, 3.0] {
            assert!(c.push(PageEvent::scroll(y)).is_none());
        }
        assert_eq!(c.pending_scroll_count(), 3);
        assert_eq!(c.flush(), vec![PageEvent::scroll(3.0)]);
        assert!(!c.has_pending());
        assert_eq!(c.pending_scroll_count(), 0);
    }

    #[test]
    fn resize_flushes_before_scroll() {
        let mut c = EventCoalescer::new();
        c.push(PageEvent::scroll(5.0));
        c.push(PageEvent::Resize(Viewport::new(10.0, 20.0)));
        c.push(PageEvent::Resize(Viewport::new(30.0, 40.0)));
        assert_eq!(
            c.flush(),
            vec![
                PageEvent::Resize(Viewport::new(30.0, 40.0)),
                PageEvent::scroll(5.0)
            ]
        );
    }

    #[test]
    fn clicks_pass_through() {
        let mut c = EventCoalescer::new();
        assert_eq!(
            c.push(PageEvent::Navigate("about".into())),
            Some(PageEvent::Navigate("about".into()))
        );
        assert_eq!(c.push(PageEvent::ToggleTheme), Some(PageEvent::ToggleTheme));
        assert!(c.flush().is_empty());
    }
}
