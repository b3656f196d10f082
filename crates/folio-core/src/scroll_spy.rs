#![forbid(unsafe_code)]

//! Scroll-spy: decide which page section is "current".
//!
//! # Algorithm
//!
//! On every measurement pass, sections are visited in page order and each is
//! measured relative to the viewport. A section matches when the activation
//! line (a fixed offset from the viewport top) lies within its vertical extent:
//!
//! ```text
//! extent.top <= line && extent.bottom >= line
//! ```
//!
//! The first match wins. When nothing matches, the previously active section
//! is kept.
//!
//! # Invariants
//!
//! 1. At most one section is active at any time.
//! 2. Once a section is active, a pass never resets the state to none.
//! 3. Sections that cannot be measured are skipped for that pass and never match.
//!
//! # Performance
//!
//! A pass is O(n) in the number of sections and allocates nothing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::Extent;
use crate::section::{Section, SectionError, SectionRegistry};

/// Default distance of the activation line from the viewport top, in pixels.
pub const DEFAULT_ACTIVATION_LINE: f64 = 100.0;

/// Measures sections relative to the viewport.
///
/// Returns `None` when the element is not mounted (or otherwise cannot be
/// measured right now).
pub trait SectionMeasure {
    /// Viewport-relative extent of the section with the given id.
    fn measure(&self, id: &str) -> Option<Extent>;
}

impl<M: SectionMeasure + ?Sized> SectionMeasure for Rc<M> {
    fn measure(&self, id: &str) -> Option<Extent> {
        (**self).measure(id)
    }
}

impl<M: SectionMeasure + ?Sized> SectionMeasure for RefCell<M> {
    fn measure(&self, id: &str) -> Option<Extent> {
        self.borrow().measure(id)
    }
}

impl SectionMeasure for HashMap<String, Extent> {
    fn measure(&self, id: &str) -> Option<Extent> {
        self.get(id).copied()
    }
}

/// Adapter turning a closure into a [`SectionMeasure`].
#[derive(Debug, Clone, Copy)]
pub struct MeasureFn<F>(pub F);

impl<F: Fn(&str) -> Option<Extent>> SectionMeasure for MeasureFn<F> {
    fn measure(&self, id: &str) -> Option<Extent> {
        (self.0)(id)
    }
}

/// Configuration for [`ActiveSectionTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSpyConfig {
    /// Activation line offset from the viewport top, in pixels.
    /// Default: 100.0
    pub activation_line: f64,
    /// Section considered active before the first matching pass.
    /// Default: none
    pub initial_section: Option<String>,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            activation_line: DEFAULT_ACTIVATION_LINE,
            initial_section: None,
        }
    }
}

impl ScrollSpyConfig {
    /// Set the activation line.
    #[must_use]
    pub fn activation_line(mut self, line: f64) -> Self {
        self.activation_line = line;
        self
    }

    /// Start with the given section active.
    #[must_use]
    pub fn initial_section(mut self, id: impl Into<String>) -> Self {
        self.initial_section = Some(id.into());
        self
    }
}

/// Outcome of one measurement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassStats {
    /// Sections that produced a usable measurement.
    pub measured: usize,
    /// Sections skipped because they could not be measured.
    pub skipped: usize,
    /// Page-order index of the matching section, if any.
    pub matched: Option<usize>,
}

/// Index of the first section (in page order) whose extent contains `line`.
pub fn select_active<M: SectionMeasure + ?Sized>(
    registry: &SectionRegistry,
    measure: &M,
    line: f64,
) -> PassStats {
    let mut stats = PassStats::default();
    for (index, section) in registry.sections().iter().enumerate() {
        let Some(extent) = measure.measure(&section.id).filter(Extent::is_finite) else {
            stats.skipped += 1;
            continue;
        };
        stats.measured += 1;
        if extent.contains_line(line) {
            stats.matched = Some(index);
            break;
        }
    }
    stats
}

/// Tracks the single active section across measurement passes.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    registry: SectionRegistry,
    activation_line: f64,
    active: Option<usize>,
    passes: u64,
    last_pass: PassStats,
}

impl ActiveSectionTracker {
    /// Create a tracker. Fails if the configured initial section is not registered.
    pub fn new(registry: SectionRegistry, config: ScrollSpyConfig) -> Result<Self, SectionError> {
        let active = match &config.initial_section {
            Some(id) => Some(registry.require(id)?),
            None => None,
        };
        Ok(Self {
            registry,
            activation_line: config.activation_line,
            active,
            passes: 0,
            last_pass: PassStats::default(),
        })
    }

    /// Run one measurement pass. Returns `true` if the active section changed.
    pub fn update<M: SectionMeasure + ?Sized>(&mut self, measure: &M) -> bool {
        let stats = select_active(&self.registry, measure, self.activation_line);
        self.passes += 1;
        self.last_pass = stats;
        match stats.matched {
            Some(index) if self.active != Some(index) => {
                self.active = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Id of the active section.
    pub fn active_id(&self) -> Option<&str> {
        self.active().map(|s| s.id.as_str())
    }

    /// The active section.
    pub fn active(&self) -> Option<&Section> {
        self.active.and_then(|i| self.registry.at(i))
    }

    /// Page-order index of the active section.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Whether `id` is the active section (drives link highlight and indicator dot).
    pub fn is_active(&self, id: &str) -> bool {
        self.active_id() == Some(id)
    }

    /// The tracked sections.
    #[inline]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Activation line in pixels from the viewport top.
    #[inline]
    pub fn activation_line(&self) -> f64 {
        self.activation_line
    }

    /// Number of passes run so far.
    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Statistics of the most recent pass.
    #[inline]
    pub fn last_pass(&self) -> PassStats {
        self.last_pass
    }
}
