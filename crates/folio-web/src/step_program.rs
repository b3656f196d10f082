#![forbid(unsafe_code)]

//! Step-based page program.
//!
//! [`PageProgram`] hosts every page behaviour (scroll-spy, typewriter, theme,
//! navbar chrome, reveal animations) without threads or blocking. The host
//! controls the loop:
//!
//! 1. Report section positions via [`PageProgram::set_layout`].
//! 2. Push events via [`PageProgram::push_event`].
//! 3. Advance time via [`PageProgram::advance_time`].
//! 4. Call [`PageProgram::step`] and apply [`PageProgram::outputs`] when
//!    [`StepResult::changed`] is non-empty.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use core::time::Duration;
//! use folio_core::event::PageEvent;
//! use folio_runtime::{MemoryStorage, PageConfig};
//! use folio_web::{PageLayout, PageProgram};
//!
//! let mut page = PageProgram::new(PageConfig::default(), Arc::new(MemoryStorage::new()), None);
//! page.set_layout(PageLayout::new().with_section("home", 0.0, 900.0));
//! page.init()?;
//!
//! page.push_event(PageEvent::scroll(120.0));
//! page.advance_time(Duration::from_millis(16));
//! let result = page.step()?;
//! if !result.changed.is_empty() {
//!     render(page.outputs());
//! }
//! ```
//!
//! # Step order
//!
//! 1. Running reveal animations advance by the time since the last step.
//! 2. Queued events are drained in order. Each scroll offset runs a
//!    scroll-spy pass, since the tracker keeps the last matched section when
//!    an offset matches nothing. Navbar flags and reveal go through the
//!    coalescer and only see the latest offset and viewport; clicks flush
//!    pending scroll and resize first so ordering is preserved.
//! 3. Timers due up to the clock fire in deadline order.
//! 4. Outputs are recomputed and compared with the previous ones.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use bitflags::bitflags;
use folio_core::animation::reveal::RevealTracker;
use folio_core::event::PageEvent;
use folio_core::event_coalescer::EventCoalescer;
use folio_core::geometry::Viewport;
use folio_core::nav::{NavState, NavTarget};
use folio_core::theme::Theme;
use folio_runtime::{
    PageConfig, PreferenceStore, ScrollChanged, ScrollSpy, Signal, TaskState, ThemeContext,
    TimerQueue, TypewriterTask,
};

use crate::{
    DeterministicClock, NavOutputs, PageLayout, RevealOutput, WebBackendError, WebEventSource,
    WebOutputs,
};

bitflags! {
    /// Outputs that changed during a step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Changed: u8 {
        /// The highlighted section.
        const ACTIVE_SECTION = 0b0000_0001;
        /// The typewriter text.
        const TEXT           = 0b0000_0010;
        /// Theme, root class or toggle icon.
        const THEME          = 0b0000_0100;
        /// Navbar flags or the menu.
        const CHROME         = 0b0000_1000;
        /// Section entrance values.
        const REVEAL         = 0b0001_0000;
        /// A nav click asked the host to scroll.
        const SCROLL_REQUEST = 0b0010_0000;
    }
}

impl Changed {
    /// Flags for every output that differs between two snapshots.
    pub fn between(before: &WebOutputs, after: &WebOutputs) -> Self {
        let mut changed = Self::empty();
        changed.set(
            Self::ACTIVE_SECTION,
            before.active_section != after.active_section,
        );
        changed.set(Self::TEXT, before.typed_text != after.typed_text);
        changed.set(
            Self::THEME,
            before.theme != after.theme
                || before.root_class != after.root_class
                || before.theme_icon != after.theme_icon,
        );
        changed.set(Self::CHROME, before.nav != after.nav);
        changed.set(Self::REVEAL, before.reveal != after.reveal);
        changed.set(
            Self::SCROLL_REQUEST,
            after.scroll_request.is_some() && before.scroll_request != after.scroll_request,
        );
        changed
    }
}

/// Result of a single [`PageProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the program is still running (false after teardown).
    pub running: bool,
    /// Outputs that changed during this step.
    pub changed: Changed,
    /// Number of events drained from the queue.
    pub events_processed: u32,
    /// Number of timers that fired.
    pub timers_fired: u32,
    /// Current step index (monotonically increasing).
    pub step_idx: u64,
}

/// Routing key for the program's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTimer {
    Typewriter,
}

/// Host-driven, non-blocking page runner.
///
/// # Lifecycle
///
/// 1. [`PageProgram::new`] with configuration, preference store and the
///    system colour-scheme preference.
/// 2. [`PageProgram::init`] once: mounts the scroll-spy, schedules the
///    typewriter (unless held by [`PageProgram::wait_for_content`]), resolves
///    the theme and runs the first reveal pass.
/// 3. [`PageProgram::step`] repeatedly from the host loop.
/// 4. [`PageProgram::teardown`] on unmount; later steps are inert.
pub struct PageProgram {
    config: PageConfig,
    store: Arc<dyn PreferenceStore>,
    system_prefers_dark: Option<bool>,
    clock: DeterministicClock,
    events: WebEventSource,
    coalescer: EventCoalescer,
    layout: Rc<RefCell<PageLayout>>,
    scroll: Signal<ScrollChanged>,
    timers: TimerQueue<PageTimer>,
    spy: Option<ScrollSpy>,
    typewriter: Option<TypewriterTask>,
    theme: Option<ThemeContext>,
    nav: NavState,
    reveal: RevealTracker,
    outputs: WebOutputs,
    wait_for_content: bool,
    initialized: bool,
    running: bool,
    step_idx: u64,
    last_step: Duration,
}

impl PageProgram {
    /// Create a program. Nothing runs until [`init`](Self::init).
    pub fn new(
        config: PageConfig,
        store: Arc<dyn PreferenceStore>,
        system_prefers_dark: Option<bool>,
    ) -> Self {
        let nav = config.nav_state();
        let reveal = config.reveal_tracker();
        Self {
            config,
            store,
            system_prefers_dark,
            clock: DeterministicClock::new(),
            events: WebEventSource::new(Viewport::default()),
            coalescer: EventCoalescer::new(),
            layout: Rc::new(RefCell::new(PageLayout::new())),
            scroll: Signal::new(),
            timers: TimerQueue::new(),
            spy: None,
            typewriter: None,
            theme: None,
            nav,
            reveal,
            outputs: WebOutputs::default(),
            wait_for_content: false,
            initialized: false,
            running: true,
            step_idx: 0,
            last_step: Duration::ZERO,
        }
    }

    /// Start with a specific viewport.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.events.set_viewport(viewport);
        self
    }

    /// Hold the typewriter until [`content_ready`](Self::content_ready).
    ///
    /// The hero only types once its profile has loaded; hosts that fetch
    /// content after init use this so typing starts from the load time.
    #[must_use]
    pub fn wait_for_content(mut self) -> Self {
        self.wait_for_content = true;
        self
    }

    /// Mount every component and compute the first outputs.
    pub fn init(&mut self) -> Result<(), WebBackendError> {
        if self.initialized {
            return Err(WebBackendError::AlreadyInitialized);
        }
        let tracker = self.config.tracker()?;
        let typewriter = self.config.typewriter()?;

        self.spy = Some(ScrollSpy::attach(
            tracker,
            &self.scroll,
            Rc::clone(&self.layout),
        ));

        let mut task = TypewriterTask::new(typewriter);
        if !self.wait_for_content {
            self.timers.settle(self.clock.now());
            task.mount(&mut self.timers, PageTimer::Typewriter);
        }
        self.typewriter = Some(task);

        self.theme = Some(ThemeContext::initialize(
            Arc::clone(&self.store),
            self.system_prefers_dark,
        ));

        let scroll_y = self.layout.borrow().scroll_y();
        self.nav.on_scroll(scroll_y);
        self.reveal_pass();

        self.last_step = self.clock.now();
        self.initialized = true;
        self.refresh_outputs();
        tracing::debug!(
            sections = self.config.sections.len(),
            store = self.store.name(),
            theme = %self.outputs.theme,
            active = ?self.outputs.active_section,
            "page program initialised"
        );
        Ok(())
    }

    /// Process one batch: animations, events, timers, outputs.
    pub fn step(&mut self) -> Result<StepResult, WebBackendError> {
        if !self.initialized {
            return Err(WebBackendError::NotInitialized);
        }
        if !self.running {
            return Ok(StepResult {
                running: false,
                changed: Changed::empty(),
                events_processed: 0,
                timers_fired: 0,
                step_idx: self.step_idx,
            });
        }

        self.outputs.scroll_request = None;
        let before = self.outputs.clone();
        let now = self.clock.now();

        // 1. Animations.
        let dt = now.saturating_sub(self.last_step);
        self.last_step = now;
        self.reveal.tick(dt);

        // 2. Events.
        let mut events_processed: u32 = 0;
        // Every offset reaches the scroll-spy; only the latest one drives
        // navbar flags and reveal.
        while let Some(event) = self.events.read_event() {
            events_processed += 1;
            if let PageEvent::Scroll { y } = event {
                self.track_scroll(y);
            }
            if let Some(immediate) = self.coalescer.push(event) {
                self.apply_pending();
                self.apply(immediate);
            }
        }
        if self.coalescer.pending_scroll_count() > 1 {
            tracing::trace!(
                merged = self.coalescer.pending_scroll_count(),
                "coalesced scroll events"
            );
        }
        self.apply_pending();

        // 3. Timers.
        let mut timers_fired: u32 = 0;
        while let Some(fired) = self.timers.pop_due(now) {
            timers_fired += 1;
            match fired.key {
                PageTimer::Typewriter => {
                    if let Some(task) = self.typewriter.as_mut() {
                        task.on_timer(fired.id, &mut self.timers, PageTimer::Typewriter);
                    }
                }
            }
        }
        self.timers.settle(now);

        // 4. Outputs.
        self.step_idx += 1;
        self.refresh_outputs();
        let changed = Changed::between(&before, &self.outputs);
        if !changed.is_empty() {
            tracing::trace!(step = self.step_idx, ?changed, "page outputs changed");
        }

        Ok(StepResult {
            running: true,
            changed,
            events_processed,
            timers_fired,
            step_idx: self.step_idx,
        })
    }

    /// Move the page to `y` and run a scroll-spy pass for it.
    fn track_scroll(&mut self, y: f64) {
        self.layout.borrow_mut().set_scroll(y);
        self.scroll.emit(&ScrollChanged { y });
    }

    fn apply_pending(&mut self) {
        for event in self.coalescer.flush() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::Scroll { y } => {
                self.layout.borrow_mut().set_scroll(y);
                self.nav.on_scroll(y);
                self.reveal_pass();
            }
            PageEvent::Resize(viewport) => {
                self.events.set_viewport(viewport);
                if let Some(spy) = &self.spy {
                    spy.refresh();
                }
                self.reveal_pass();
            }
            PageEvent::Navigate(id) => match self.nav.navigate(&self.config.sections, &id) {
                Some(target) => {
                    tracing::debug!(section = %target.id, "navigate");
                    self.outputs.scroll_request = Some(target);
                }
                None => tracing::warn!(section = %id, "navigate to unknown section"),
            },
            PageEvent::ToggleMenu => self.nav.toggle_menu(),
            PageEvent::ToggleTheme => {
                if let Some(theme) = self.theme.as_mut()
                    && let Err(error) = theme.toggle()
                {
                    tracing::debug!(%error, "theme toggled without persisting");
                }
            }
        }
    }

    fn reveal_pass(&mut self) {
        let layout = self.layout.borrow();
        let newly = self.reveal.update(&*layout, self.events.viewport());
        if !newly.is_empty() {
            tracing::debug!(sections = ?newly, "sections revealed");
        }
    }

    fn refresh_outputs(&mut self) {
        let out = &mut self.outputs;
        out.active_section = self.spy.as_ref().and_then(ScrollSpy::active_id);
        if let Some(task) = &self.typewriter
            && out.typed_text != task.displayed()
        {
            out.typed_text.clear();
            out.typed_text.push_str(task.displayed());
        }
        if let Some(theme) = &self.theme {
            out.theme = theme.theme();
            out.root_class = theme.root_class();
            out.theme_icon = theme.toggle_icon();
        }
        out.nav = NavOutputs {
            scrolled: self.nav.scrolled(),
            back_to_top_visible: self.nav.back_to_top_visible(),
            menu_open: self.nav.menu_open(),
            menu_icon: self.nav.menu_icon(),
        };
        out.reveal = self
            .config
            .sections
            .sections()
            .iter()
            .map(|section| RevealOutput {
                id: section.id.clone(),
                revealed: self.reveal.is_revealed(&section.id),
                opacity: self.reveal.opacity(&section.id),
                offset_px: self.reveal.offset_px(&section.id),
            })
            .collect();
    }

    /// Start a held typewriter from the current clock.
    ///
    /// Returns `true` if typing started now; `false` if it was already
    /// running or the program was torn down.
    pub fn content_ready(&mut self) -> Result<bool, WebBackendError> {
        if !self.initialized {
            return Err(WebBackendError::NotInitialized);
        }
        if !self.running {
            return Ok(false);
        }
        let Some(task) = self.typewriter.as_mut() else {
            return Ok(false);
        };
        if task.state() != TaskState::Idle {
            return Ok(false);
        }
        let now = self.clock.now();
        self.timers.settle(now);
        task.mount(&mut self.timers, PageTimer::Typewriter);
        tracing::debug!(?now, "content ready, typewriter started");
        Ok(true)
    }

    /// Unsubscribe the scroll-spy and cancel the typewriter. Idempotent.
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(spy) = self.spy.as_mut() {
            spy.dispose();
        }
        if let Some(task) = self.typewriter.as_mut() {
            task.teardown(&mut self.timers);
        }
        let leftover = self.timers.clear();
        tracing::debug!(step = self.step_idx, leftover, "page program torn down");
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: PageEvent) {
        self.events.push_event(event);
    }

    /// Replace the section positions, keeping the current scroll offset.
    ///
    /// After init this re-measures immediately, as a layout shift would.
    pub fn set_layout(&mut self, mut layout: PageLayout) {
        let scroll_y = self.layout.borrow().scroll_y();
        layout.set_scroll(scroll_y);
        *self.layout.borrow_mut() = layout;
        if self.initialized && self.running {
            if let Some(spy) = &self.spy {
                spy.refresh();
            }
            self.reveal_pass();
            self.refresh_outputs();
        }
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time (never backwards).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Switch theme directly (outside of a toggle click).
    pub fn set_theme(&mut self, theme: Theme) -> Result<bool, WebBackendError> {
        let ctx = self.theme.as_mut().ok_or(WebBackendError::NotInitialized)?;
        let changed = ctx.set(theme);
        self.refresh_outputs();
        Ok(changed?)
    }

    /// Current outputs.
    pub fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take the pending scroll request, if a nav click produced one.
    pub fn take_scroll_request(&mut self) -> Option<NavTarget> {
        self.outputs.scroll_request.take()
    }

    /// Current monotonic time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.events.viewport()
    }

    /// Configuration the program was built with.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the program has not been torn down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of completed steps.
    pub fn step_idx(&self) -> u64 {
        self.step_idx
    }

    /// Number of scheduled timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of listeners on the scroll signal.
    pub fn scroll_listeners(&self) -> usize {
        self.scroll.listener_count()
    }
}

impl std::fmt::Debug for PageProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageProgram")
            .field("initialized", &self.initialized)
            .field("running", &self.running)
            .field("step_idx", &self.step_idx)
            .field("now", &self.clock.now())
            .field("outputs", &self.outputs)
            .finish()
    }
}
