#![forbid(unsafe_code)]

//! `folio-web` runs the portfolio page behaviour on a host-driven loop.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes scroll, resize and click
//!   events and reports where each section sits on the page.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! No DOM binding lives here; a thin glue layer turns [`WebOutputs`] into
//! class names, text and scroll calls.

pub mod step_program;

use core::time::Duration;
use std::collections::{HashMap, VecDeque};

use folio_core::event::PageEvent;
use folio_core::geometry::{Extent, Viewport};
use folio_core::icon::{MenuIcon, ThemeIcon};
use folio_core::nav::NavTarget;
use folio_core::scroll_spy::SectionMeasure;
use folio_core::section::SectionError;
use folio_core::theme::Theme;
use folio_core::typewriter::TypewriterError;
use folio_runtime::StorageError;

pub use step_program::{Changed, PageProgram, StepResult};

/// Web backend error type.
#[derive(Debug)]
pub enum WebBackendError {
    /// `step` was called before `init`.
    NotInitialized,
    /// `init` was called twice.
    AlreadyInitialized,
    /// The configured sections are unusable.
    Section(SectionError),
    /// The configured phrases are unusable.
    Typewriter(TypewriterError),
    /// A preference could not be persisted.
    Storage(StorageError),
}

impl core::fmt::Display for WebBackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "page program used before init()"),
            Self::AlreadyInitialized => write!(f, "page program initialised twice"),
            Self::Section(e) => write!(f, "section configuration: {e}"),
            Self::Typewriter(e) => write!(f, "typewriter configuration: {e}"),
            Self::Storage(e) => write!(f, "preference storage: {e}"),
        }
    }
}

impl std::error::Error for WebBackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Section(e) => Some(e),
            Self::Typewriter(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::NotInitialized | Self::AlreadyInitialized => None,
        }
    }
}

impl From<SectionError> for WebBackendError {
    fn from(e: SectionError) -> Self {
        Self::Section(e)
    }
}

impl From<TypewriterError> for WebBackendError {
    fn from(e: TypewriterError) -> Self {
        Self::Typewriter(e)
    }
}

impl From<StorageError> for WebBackendError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[inline]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Host-driven event queue plus the current viewport.
#[derive(Debug, Clone)]
pub struct WebEventSource {
    viewport: Viewport,
    queue: VecDeque<PageEvent>,
}

impl WebEventSource {
    /// Create an empty queue for a viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            queue: VecDeque::new(),
        }
    }

    /// Current viewport.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the current viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Push an event into the queue.
    pub fn push_event(&mut self, event: PageEvent) {
        self.queue.push_back(event);
    }

    /// Pop the oldest event.
    pub fn read_event(&mut self) -> Option<PageEvent> {
        self.queue.pop_front()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = PageEvent> + '_ {
        self.queue.drain(..)
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Section positions in page coordinates plus the current scroll offset.
///
/// The host reports each section's top and height relative to the document
/// and the program turns them into viewport extents for the current scroll.
/// A section that was never reported is unmeasurable.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    sections: HashMap<String, (f64, f64)>,
    scroll_y: f64,
}

impl PageLayout {
    /// Empty layout at scroll offset 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record where a section sits on the page.
    pub fn set_section(&mut self, id: impl Into<String>, page_top: f64, height: f64) {
        self.sections.insert(id.into(), (page_top, height));
    }

    /// Builder form of [`set_section`](Self::set_section).
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, page_top: f64, height: f64) -> Self {
        self.set_section(id, page_top, height);
        self
    }

    /// Forget a section (it unmounted).
    pub fn remove_section(&mut self, id: &str) -> bool {
        self.sections.remove(id).is_some()
    }

    /// Current scroll offset.
    #[inline]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Update the scroll offset.
    pub fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Number of measured sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no section has been reported.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl SectionMeasure for PageLayout {
    fn measure(&self, id: &str) -> Option<Extent> {
        let (top, height) = self.sections.get(id)?;
        Some(Extent::from_page(*top, *height, self.scroll_y))
    }
}

/// Navbar values for the host to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavOutputs {
    /// The page is past the scrolled threshold; the navbar gets its solid style.
    pub scrolled: bool,
    /// The back-to-top button is shown.
    pub back_to_top_visible: bool,
    /// The mobile menu is open.
    pub menu_open: bool,
    /// Icon on the mobile menu button.
    pub menu_icon: MenuIcon,
}

impl Default for NavOutputs {
    fn default() -> Self {
        Self {
            scrolled: false,
            back_to_top_visible: false,
            menu_open: false,
            menu_icon: MenuIcon::Menu,
        }
    }
}

/// Entrance state of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOutput {
    /// Section id.
    pub id: String,
    /// The section has entered the viewport at least once.
    pub revealed: bool,
    /// Current opacity, `0.0` until revealed.
    pub opacity: f32,
    /// Current downward offset in pixels, sliding towards `0.0`.
    pub offset_px: f32,
}

/// Captured page outputs for host consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct WebOutputs {
    /// Section whose nav link is highlighted.
    pub active_section: Option<String>,
    /// Hero typewriter text (the caret is drawn by the host).
    pub typed_text: String,
    /// Current theme.
    pub theme: Theme,
    /// Class for the document root.
    pub root_class: Option<&'static str>,
    /// Icon on the theme toggle.
    pub theme_icon: ThemeIcon,
    /// Navbar chrome.
    pub nav: NavOutputs,
    /// Per-section entrance values, page order.
    pub reveal: Vec<RevealOutput>,
    /// Pending smooth-scroll request from a nav click.
    pub scroll_request: Option<NavTarget>,
}

impl Default for WebOutputs {
    fn default() -> Self {
        Self {
            active_section: None,
            typed_text: String::new(),
            theme: Theme::Dark,
            root_class: Theme::Dark.root_class(),
            theme_icon: Theme::Dark.toggle_icon(),
            nav: NavOutputs::default(),
            reveal: Vec::new(),
            scroll_request: None,
        }
    }
}

impl WebOutputs {
    /// Entrance values of a section.
    pub fn reveal_for(&self, id: &str) -> Option<&RevealOutput> {
        self.reveal.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        c.advance(Duration::from_millis(5));
        assert_eq!(c.now(), Duration::from_millis(15));

        c.set(Duration::from_millis(3));
        assert_eq!(c.now(), Duration::from_millis(15));

        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }

    #[test]
    fn web_event_source_fifo_queue() {
        let mut ev = WebEventSource::new(Viewport::new(1280.0, 800.0));
        assert_eq!(ev.pending(), 0);

        ev.push_event(PageEvent::scroll(10.0));
        ev.push_event(PageEvent::ToggleMenu);
        assert_eq!(ev.read_event(), Some(PageEvent::scroll(10.0)));
        assert_eq!(ev.drain_events().collect::<Vec<_>>(), vec![PageEvent::ToggleMenu]);
        assert_eq!(ev.read_event(), None);
    }

    #[test]
    fn page_layout_measures_relative_to_scroll() {
        let mut layout = PageLayout::new().with_section("about", 800.0, 600.0);
        layout.set_scroll(700.0);
        assert_eq!(layout.measure("about"), Some(Extent::new(100.0, 700.0)));
        assert_eq!(layout.measure("missing"), None);
        assert!(layout.remove_section("about"));
        assert!(layout.is_empty());
    }

    #[test]
    fn default_outputs_are_dark() {
        let out = WebOutputs::default();
        assert_eq!(out.root_class, Some("dark"));
        assert_eq!(out.theme_icon, ThemeIcon::Sun);
        assert_eq!(out.reveal_for("home"), None);
    }
}
