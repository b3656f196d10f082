#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels as `f64`, matching what a browser reports from
//! `getBoundingClientRect` and `scrollY`.

/// Vertical bounds of a measured element, relative to the viewport top.
///
/// `top` may be negative once the element has scrolled past the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Top edge in viewport coordinates.
    pub top: f64,
    /// Bottom edge in viewport coordinates.
    pub bottom: f64,
}

impl Extent {
    /// Create a new extent.
    #[inline]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Project a page-absolute span into the viewport at the given scroll offset.
    #[inline]
    pub fn from_page(page_top: f64, height: f64, scroll_y: f64) -> Self {
        let top = page_top - scroll_y;
        Self::new(top, top + height)
    }

    /// Height in pixels (never negative).
    #[inline]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Both edges are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite()
    }

    /// Whether a horizontal line at `y` falls within the extent (edges inclusive).
    #[inline]
    pub fn contains_line(&self, y: f64) -> bool {
        self.top <= y && self.bottom >= y
    }

    /// Whether the extent overlaps the span `[start, end]` (edges inclusive).
    #[inline]
    pub fn intersects_span(&self, start: f64, end: f64) -> bool {
        self.top <= end && self.bottom >= start
    }

    /// Shift both edges by `dy`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dy: f64) -> Self {
        Self::new(self.top + dy, self.bottom + dy)
    }
}

/// Visible area of the hosting page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertical span `[margin, height - margin]` used for in-view checks.
    ///
    /// A margin larger than half the height collapses to the midpoint.
    pub fn inset_span(&self, margin: f64) -> (f64, f64) {
        let height = self.height.max(0.0);
        let margin = margin.clamp(0.0, height / 2.0);
        (margin, height - margin)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}
