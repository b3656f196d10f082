#![forbid(unsafe_code)]

//! Reveal-on-scroll: sections fade and slide in the first time they enter view.
//!
//! # Invariants
//!
//! 1. A section is revealed at most once and never hidden again.
//! 2. Sections revealed in the same pass start in page order, staggered.
//! 3. Unmeasurable sections are skipped for the pass, as in the scroll-spy.

use std::time::Duration;

use super::stagger::stagger_offsets;
use super::{Animation, Delayed, Fade, Slide, ease_out};
use crate::geometry::{Extent, Viewport};
use crate::scroll_spy::SectionMeasure;
use crate::section::SectionRegistry;

/// Configuration for [`RevealTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Viewport inset (pixels, each side) a section must cross to count as in view.
    /// Default: 50.0
    pub margin: f64,
    /// Duration of each section's entrance.
    /// Default: 600ms
    pub duration: Duration,
    /// Initial downward offset in pixels.
    /// Default: 30.0
    pub slide_from: f32,
    /// Delay between sections revealed in the same pass.
    /// Default: 100ms
    pub stagger: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            duration: Duration::from_millis(600),
            slide_from: 30.0,
            stagger: Duration::from_millis(100),
        }
    }
}

/// Entrance animation of one section.
#[derive(Debug, Clone, Copy)]
struct RevealAnimation {
    fade: Delayed<Fade>,
    slide: Delayed<Slide>,
}

impl RevealAnimation {
    fn new(config: &RevealConfig, offset: Duration) -> Self {
        Self {
            fade: Delayed::new(offset, Fade::new(config.duration).easing(ease_out)),
            slide: Delayed::new(offset, Slide::new(config.slide_from, 0.0, config.duration)),
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
        self.slide.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.fade.is_complete() && self.slide.is_complete()
    }
}

/// Tracks which sections have been revealed and drives their animations.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    config: RevealConfig,
    ids: Vec<String>,
    entries: Vec<Option<RevealAnimation>>,
}

impl RevealTracker {
    /// Create a tracker with nothing revealed.
    pub fn new(registry: &SectionRegistry, config: RevealConfig) -> Self {
        let ids: Vec<String> = registry.ids().map(str::to_owned).collect();
        let entries = vec![None; ids.len()];
        Self {
            config,
            ids,
            entries,
        }
    }

    /// Reveal every not-yet-revealed section that is now in view.
    ///
    /// Returns the page-order indices revealed by this pass.
    pub fn update<M: SectionMeasure + ?Sized>(
        &mut self,
        measure: &M,
        viewport: Viewport,
    ) -> Vec<usize> {
        let (start, end) = viewport.inset_span(self.config.margin);
        let newly: Vec<usize> = self
            .ids
            .iter()
            .enumerate()
            .filter(|(index, _)| self.entries[*index].is_none())
            .filter_map(|(index, id)| {
                let extent = measure.measure(id).filter(Extent::is_finite)?;
                extent.intersects_span(start, end).then_some(index)
            })
            .collect();

        let offsets = stagger_offsets(newly.len(), self.config.stagger);
        for (&index, offset) in newly.iter().zip(offsets) {
            self.entries[index] = Some(RevealAnimation::new(&self.config, offset));
        }
        newly
    }

    /// Advance every running entrance. Returns `true` if any value changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut changed = false;
        for anim in self.entries.iter_mut().flatten() {
            if !anim.is_complete() {
                anim.tick(dt);
                changed = true;
            }
        }
        changed
    }

    fn entry(&self, id: &str) -> Option<&RevealAnimation> {
        let index = self.ids.iter().position(|s| s == id)?;
        self.entries[index].as_ref()
    }

    /// Whether the section has been revealed.
    pub fn is_revealed(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    /// Opacity of the section, 0.0 until revealed.
    pub fn opacity(&self, id: &str) -> f32 {
        self.entry(id).map_or(0.0, |a| a.fade.value())
    }

    /// Vertical offset of the section in pixels; `slide_from` until revealed.
    pub fn offset_px(&self, id: &str) -> f32 {
        self.entry(id).map_or(self.config.slide_from, |a| {
            if a.slide.has_started() {
                a.slide.inner().offset()
            } else {
                self.config.slide_from
            }
        })
    }

    /// Ids of revealed sections in page order.
    pub fn revealed_ids(&self) -> impl Iterator<Item = &str> {
        self.ids
            .iter()
            .zip(&self.entries)
            .filter(|(_, e)| e.is_some())
            .map(|(id, _)| id.as_str())
    }

    /// Whether every revealed section has finished animating.
    pub fn is_settled(&self) -> bool {
        self.entries.iter().flatten().all(RevealAnimation::is_complete)
    }
}
