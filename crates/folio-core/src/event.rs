#![forbid(unsafe_code)]

//! Canonical page events pushed by the host.

use crate::geometry::Viewport;

/// An input notification from the hosting page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The document scrolled; `y` is the new vertical scroll offset.
    Scroll { y: f64 },
    /// The viewport changed size.
    Resize(Viewport),
    /// A nav link for the given section id was clicked.
    Navigate(String),
    /// The mobile menu button was clicked.
    ToggleMenu,
    /// The theme toggle was clicked.
    ToggleTheme,
}

impl PageEvent {
    /// Convenience constructor for scroll events.
    #[inline]
    pub const fn scroll(y: f64) -> Self {
        Self::Scroll { y }
    }

    /// Whether this event may be merged with a later one of the same kind.
    #[inline]
    pub const fn is_coalescable(&self) -> bool {
        matches!(self, Self::Scroll { .. } | Self::Resize(_))
    }
}
