#![forbid(unsafe_code)]

//! Navigation bar chrome: scrolled styling, back-to-top button, mobile menu.

use crate::icon::MenuIcon;
use crate::section::SectionRegistry;

/// Scroll offset past which the navbar switches to its "scrolled" style.
pub const DEFAULT_SCROLLED_THRESHOLD: f64 = 50.0;
/// Scroll offset past which the back-to-top button appears.
pub const DEFAULT_BACK_TO_TOP_THRESHOLD: f64 = 300.0;

/// Thresholds for [`NavState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    /// Default: 50.0
    pub scrolled_threshold: f64,
    /// Default: 300.0
    pub back_to_top_threshold: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: DEFAULT_SCROLLED_THRESHOLD,
            back_to_top_threshold: DEFAULT_BACK_TO_TOP_THRESHOLD,
        }
    }
}

/// Where a nav click should scroll to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    /// Section id.
    pub id: String,
    /// Anchor href, e.g. `#projects`.
    pub href: String,
}

/// Navbar state derived from scroll position and user clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    config: NavConfig,
    menu_open: bool,
    scrolled: bool,
    back_to_top_visible: bool,
}

impl NavState {
    /// Create nav state at the top of the page with the menu closed.
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            menu_open: false,
            scrolled: false,
            back_to_top_visible: false,
        }
    }

    /// Recompute scroll-derived flags. Returns `true` if any flag changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > self.config.scrolled_threshold;
        let back_to_top = scroll_y > self.config.back_to_top_threshold;
        let changed = scrolled != self.scrolled || back_to_top != self.back_to_top_visible;
        self.scrolled = scrolled;
        self.back_to_top_visible = back_to_top;
        changed
    }

    /// Open or close the mobile menu.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Close the mobile menu.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Handle a click on a nav link.
    ///
    /// The menu closes regardless; an unknown id yields no scroll target.
    pub fn navigate(&mut self, registry: &SectionRegistry, id: &str) -> Option<NavTarget> {
        self.menu_open = false;
        registry.get(id).map(|section| NavTarget {
            id: section.id.clone(),
            href: section.href(),
        })
    }

    /// Whether the mobile menu is open.
    #[inline]
    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Icon for the mobile menu button.
    pub fn menu_icon(&self) -> MenuIcon {
        if self.menu_open {
            MenuIcon::Close
        } else {
            MenuIcon::Menu
        }
    }

    /// Whether the page has scrolled past the navbar threshold.
    #[inline]
    pub fn scrolled(&self) -> bool {
        self.scrolled
    }

    /// Whether the back-to-top button should be shown.
    #[inline]
    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top_visible
    }
}

impl Default for NavState {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}
