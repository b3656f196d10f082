#![forbid(unsafe_code)]

//! Page configuration.
//!
//! One [`PageConfig`] describes the whole page; each component is built from
//! its own sub-config and never sees the rest.

use std::time::Duration;

use folio_core::animation::reveal::{RevealConfig, RevealTracker};
use folio_core::nav::{NavConfig, NavState};
use folio_core::scroll_spy::{ActiveSectionTracker, ScrollSpyConfig};
use folio_core::section::{SectionError, SectionRegistry};
use folio_core::typewriter::{Typewriter, TypewriterError, TypewriterTiming};

/// Phrases cycled in the hero heading when none are configured.
pub const DEFAULT_PHRASES: [&str; 2] = ["Frontend Developer", "UI Designer"];

/// Configuration for a portfolio page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Sections in page order.
    pub sections: SectionRegistry,
    /// Activation line and initial section for the scroll-spy.
    pub scroll_spy: ScrollSpyConfig,
    /// Navbar thresholds.
    pub nav: NavConfig,
    /// Phrases for the typewriter.
    pub phrases: Vec<String>,
    /// Typewriter delays.
    pub typewriter: TypewriterTiming,
    /// Reveal-on-scroll settings.
    pub reveal: RevealConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::portfolio()
    }
}

impl PageConfig {
    /// The portfolio layout: home, about, skills, experience, projects and
    /// contact, starting on `home`.
    pub fn portfolio() -> Self {
        Self {
            sections: SectionRegistry::portfolio(),
            scroll_spy: ScrollSpyConfig::default().initial_section("home"),
            nav: NavConfig::default(),
            phrases: DEFAULT_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
            typewriter: TypewriterTiming::default(),
            reveal: RevealConfig::default(),
        }
    }

    /// Replace the sections. Clears the initial section if it is not among them.
    #[must_use]
    pub fn with_sections(mut self, sections: SectionRegistry) -> Self {
        if let Some(id) = &self.scroll_spy.initial_section
            && sections.get(id).is_none()
        {
            self.scroll_spy.initial_section = None;
        }
        self.sections = sections;
        self
    }

    /// Set the scroll-spy activation line.
    #[must_use]
    pub fn with_activation_line(mut self, line: f64) -> Self {
        self.scroll_spy.activation_line = line;
        self
    }

    /// Set (or clear) the section active before the first scroll pass.
    #[must_use]
    pub fn with_initial_section(mut self, id: Option<&str>) -> Self {
        self.scroll_spy.initial_section = id.map(str::to_owned);
        self
    }

    /// Set the navbar thresholds.
    #[must_use]
    pub fn with_nav(mut self, nav: NavConfig) -> Self {
        self.nav = nav;
        self
    }

    /// Set the typewriter phrases.
    #[must_use]
    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the typewriter delays.
    #[must_use]
    pub fn with_typewriter_timing(mut self, timing: TypewriterTiming) -> Self {
        self.typewriter = timing;
        self
    }

    /// Set the reveal settings.
    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    /// Disable reveal motion: revealed sections finish on their first tick.
    #[must_use]
    pub fn without_reveal_motion(mut self) -> Self {
        self.reveal.duration = Duration::ZERO;
        self.reveal.stagger = Duration::ZERO;
        self
    }

    /// Build the scroll-spy tracker.
    pub fn tracker(&self) -> Result<ActiveSectionTracker, SectionError> {
        ActiveSectionTracker::new(self.sections.clone(), self.scroll_spy.clone())
    }

    /// Build the typewriter.
    pub fn typewriter(&self) -> Result<Typewriter, TypewriterError> {
        Typewriter::new(self.phrases.iter().cloned(), self.typewriter)
    }

    /// Build the navbar state.
    pub fn nav_state(&self) -> NavState {
        NavState::new(self.nav)
    }

    /// Build the reveal tracker.
    pub fn reveal_tracker(&self) -> RevealTracker {
        RevealTracker::new(&self.sections, self.reveal)
    }
}
