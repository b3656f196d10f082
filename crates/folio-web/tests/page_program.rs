//! Host-driven page program scenarios.
//!
//! Each test drives a [`PageProgram`] the way browser glue would: report the
//! layout, push events, advance the clock, step, and read outputs.

use std::sync::Arc;
use std::time::Duration;

use folio_core::event::PageEvent;
use folio_core::geometry::Viewport;
use folio_core::icon::{MenuIcon, ThemeIcon};
use folio_core::section::{Section, SectionRegistry};
use folio_core::theme::Theme;
use folio_runtime::{MemoryStorage, PageConfig, PreferenceStore, THEME_KEY};
use folio_web::{Changed, PageLayout, PageProgram, WebBackendError};
use pretty_assertions::assert_eq;

const MS: Duration = Duration::from_millis(1);

/// The six portfolio sections stacked 900px apart, 900px tall each.
fn portfolio_layout() -> PageLayout {
    ["home", "about", "skills", "experience", "projects", "contact"]
        .iter()
        .enumerate()
        .fold(PageLayout::new(), |layout, (i, id)| {
            layout.with_section(*id, i as f64 * 900.0, 900.0)
        })
}

fn page_with(store: Arc<MemoryStorage>, system_dark: Option<bool>) -> PageProgram {
    let mut page = PageProgram::new(PageConfig::default(), store, system_dark)
        .with_viewport(Viewport::new(1280.0, 800.0));
    page.set_layout(portfolio_layout());
    page.init().unwrap();
    page
}

fn page() -> PageProgram {
    page_with(Arc::new(MemoryStorage::new()), None)
}

// ============================================================================
// Scroll-spy
// ============================================================================

#[test]
fn starts_on_home() {
    let page = page();
    assert_eq!(page.outputs().active_section.as_deref(), Some("home"));
}

/// Sections A(0-500), B(500-1200), C(1200-2000), nothing below 2000.
fn abc_page() -> PageProgram {
    let sections = SectionRegistry::new(vec![
        Section::new("a", "A"),
        Section::new("b", "B"),
        Section::new("c", "C"),
    ])
    .unwrap();
    let config = PageConfig::default().with_sections(sections);
    let mut page = PageProgram::new(config, Arc::new(MemoryStorage::new()), None);
    page.set_layout(
        PageLayout::new()
            .with_section("a", 0.0, 500.0)
            .with_section("b", 500.0, 700.0)
            .with_section("c", 1200.0, 800.0),
    );
    page.init().unwrap();
    page
}

#[test]
fn abc_layout_follows_activation_line() {
    let mut page = abc_page();
    assert_eq!(page.outputs().active_section.as_deref(), Some("a"));

    for (y, expected) in [(350.0, "a"), (400.0, "a"), (450.0, "b"), (1150.0, "c")] {
        page.push_event(PageEvent::scroll(y));
        page.step().unwrap();
        assert_eq!(page.outputs().active_section.as_deref(), Some(expected), "scroll {y}");
    }
}

#[test]
fn scroll_storm_is_coalesced_to_latest_offset() {
    let mut page = page();
    for y in [100.0, 900.0, 1900.0, 2800.0, 3700.0] {
        page.push_event(PageEvent::scroll(y));
    }
    let result = page.step().unwrap();
    assert_eq!(result.events_processed, 5);
    assert!(result.changed.contains(Changed::ACTIVE_SECTION));
    // Line at page y 3800 falls in projects (3600 to 4500).
    assert_eq!(page.outputs().active_section.as_deref(), Some("projects"));
}

#[test]
fn scroll_burst_matches_one_event_per_step() {
    // Each burst ends below the last section, where nothing matches.
    let cases: [(&[f64], &str); 3] = [
        (&[600.0, 5000.0], "b"),
        (&[600.0, 1300.0, 5000.0], "c"),
        (&[1300.0, 200.0, 5000.0], "a"),
    ];
    for (offsets, expected) in cases {
        let mut sequential = abc_page();
        for &y in offsets {
            sequential.push_event(PageEvent::scroll(y));
            sequential.step().unwrap();
        }

        let mut burst = abc_page();
        for &y in offsets {
            burst.push_event(PageEvent::scroll(y));
        }
        let result = burst.step().unwrap();
        assert_eq!(result.events_processed, offsets.len() as u32);

        assert_eq!(
            sequential.outputs().active_section.as_deref(),
            Some(expected),
            "offsets {offsets:?}"
        );
        assert_eq!(
            burst.outputs().active_section,
            sequential.outputs().active_section,
            "offsets {offsets:?}"
        );
        assert_eq!(burst.outputs().nav, sequential.outputs().nav);
    }
}

#[test]
fn active_section_change_flag_only_on_change() {
    let mut page = page();
    page.push_event(PageEvent::scroll(10.0));
    let result = page.step().unwrap();
    assert!(!result.changed.contains(Changed::ACTIVE_SECTION));
}

// ============================================================================
// Typewriter
// ============================================================================

#[test]
fn typewriter_types_on_the_clock() {
    let mut page = page();
    page.advance_time(MS * 300);
    let result = page.step().unwrap();
    assert_eq!(result.timers_fired, 3);
    assert!(result.changed.contains(Changed::TEXT));
    assert_eq!(page.outputs().typed_text, "Fro");

    // 19 typing ticks in total, then the pause.
    page.set_time(MS * 1900);
    page.step().unwrap();
    assert_eq!(page.outputs().typed_text, "Frontend Developer");
    page.set_time(MS * 2899);
    let result = page.step().unwrap();
    assert!(!result.changed.contains(Changed::TEXT));
    page.set_time(MS * 3850);
    page.step().unwrap();
    assert_eq!(page.outputs().typed_text, "");

    page.advance_time(MS * 200);
    page.step().unwrap();
    assert_eq!(page.outputs().typed_text, "UI");
}

#[test]
fn held_typewriter_starts_when_content_is_ready() {
    let mut page = PageProgram::new(PageConfig::default(), Arc::new(MemoryStorage::new()), None)
        .wait_for_content();
    page.set_layout(portfolio_layout());
    page.init().unwrap();
    assert_eq!(page.pending_timers(), 0);

    page.advance_time(MS * 500);
    let result = page.step().unwrap();
    assert_eq!(result.timers_fired, 0);
    assert_eq!(page.outputs().typed_text, "");

    // Typing is measured from the moment content arrived.
    assert!(page.content_ready().unwrap());
    assert!(!page.content_ready().unwrap());
    assert_eq!(page.pending_timers(), 1);
    page.advance_time(MS * 99);
    page.step().unwrap();
    assert_eq!(page.outputs().typed_text, "");
    page.advance_time(MS);
    page.step().unwrap();
    assert_eq!(page.outputs().typed_text, "F");
}

#[test]
fn content_ready_is_a_no_op_when_typing_already_runs() {
    let mut page = page();
    assert!(!page.content_ready().unwrap());
    page.teardown();
    assert!(!page.content_ready().unwrap());
    assert_eq!(page.pending_timers(), 0);
}

// ============================================================================
// Theme
// ============================================================================

#[test]
fn theme_toggle_persists() {
    let store = Arc::new(MemoryStorage::new());
    let mut page = page_with(store.clone(), None);
    assert_eq!(page.outputs().theme, Theme::Dark);
    assert_eq!(page.outputs().theme_icon, ThemeIcon::Sun);

    page.push_event(PageEvent::ToggleTheme);
    let result = page.step().unwrap();
    assert!(result.changed.contains(Changed::THEME));
    assert_eq!(page.outputs().theme, Theme::Light);
    assert_eq!(page.outputs().root_class, None);
    assert_eq!(page.outputs().theme_icon, ThemeIcon::Moon);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

    let reloaded = page_with(store, Some(true));
    assert_eq!(reloaded.outputs().theme, Theme::Light);
}

#[test]
fn system_preference_sets_initial_theme() {
    let page = page_with(Arc::new(MemoryStorage::new()), Some(false));
    assert_eq!(page.outputs().theme, Theme::Light);
}

#[test]
fn set_theme_reports_change() {
    let mut page = page();
    assert!(page.set_theme(Theme::Light).unwrap());
    assert!(!page.set_theme(Theme::Light).unwrap());
    assert_eq!(page.outputs().theme, Theme::Light);
}

// ============================================================================
// Navbar chrome
// ============================================================================

#[test]
fn navbar_flags_follow_scroll() {
    let mut page = page();
    page.push_event(PageEvent::scroll(60.0));
    let result = page.step().unwrap();
    assert!(result.changed.contains(Changed::CHROME));
    assert!(page.outputs().nav.scrolled);
    assert!(!page.outputs().nav.back_to_top_visible);

    page.push_event(PageEvent::scroll(400.0));
    page.step().unwrap();
    assert!(page.outputs().nav.back_to_top_visible);

    page.push_event(PageEvent::scroll(0.0));
    page.step().unwrap();
    assert!(!page.outputs().nav.scrolled);
}

#[test]
fn menu_and_navigation() {
    let mut page = page();
    page.push_event(PageEvent::ToggleMenu);
    page.step().unwrap();
    assert!(page.outputs().nav.menu_open);
    assert_eq!(page.outputs().nav.menu_icon, MenuIcon::Close);

    page.push_event(PageEvent::Navigate("projects".into()));
    let result = page.step().unwrap();
    assert!(result.changed.contains(Changed::SCROLL_REQUEST));
    assert!(!page.outputs().nav.menu_open);
    let target = page.take_scroll_request().unwrap();
    assert_eq!(target.href, "#projects");
    assert_eq!(page.take_scroll_request(), None);

    page.push_event(PageEvent::ToggleMenu);
    page.push_event(PageEvent::Navigate("nowhere".into()));
    let result = page.step().unwrap();
    assert!(!result.changed.contains(Changed::SCROLL_REQUEST));
    assert!(!page.outputs().nav.menu_open);
}

// ============================================================================
// Reveal
// ============================================================================

#[test]
fn sections_reveal_once_when_scrolled_into_view() {
    let mut page = page();
    let home = page.outputs().reveal_for("home").cloned().unwrap();
    assert!(home.revealed);
    assert!(!page.outputs().reveal_for("about").unwrap().revealed);

    page.advance_time(MS * 700);
    page.step().unwrap();
    let home = page.outputs().reveal_for("home").unwrap();
    assert!(home.opacity > 0.999);
    assert!(home.offset_px.abs() < 0.001);

    page.push_event(PageEvent::scroll(900.0));
    let result = page.step().unwrap();
    assert!(result.changed.contains(Changed::REVEAL));
    assert!(page.outputs().reveal_for("about").unwrap().revealed);

    // Scrolling away never hides a revealed section.
    page.push_event(PageEvent::scroll(0.0));
    page.step().unwrap();
    assert!(page.outputs().reveal_for("about").unwrap().revealed);
}

#[test]
fn resize_reveals_newly_visible_sections() {
    let mut page = page();
    page.push_event(PageEvent::Resize(Viewport::new(1280.0, 2000.0)));
    page.step().unwrap();
    assert_eq!(page.viewport(), Viewport::new(1280.0, 2000.0));
    assert!(page.outputs().reveal_for("about").unwrap().revealed);
    assert!(page.outputs().reveal_for("skills").unwrap().revealed);
}

// ============================================================================
// Teardown and configuration errors
// ============================================================================

#[test]
fn teardown_makes_steps_inert() {
    let mut page = page();
    page.advance_time(MS * 250);
    page.step().unwrap();
    page.teardown();
    assert_eq!(page.pending_timers(), 0);
    assert_eq!(page.scroll_listeners(), 0);

    let snapshot = page.outputs().clone();
    page.push_event(PageEvent::scroll(3000.0));
    page.advance_time(Duration::from_secs(30));
    let result = page.step().unwrap();
    assert!(!result.running);
    assert_eq!(result.changed, Changed::empty());
    assert_eq!(page.outputs(), &snapshot);
    page.teardown();
}

#[test]
fn empty_phrase_list_fails_init() {
    let config = PageConfig::default().with_phrases(Vec::<String>::new());
    let mut page = PageProgram::new(config, Arc::new(MemoryStorage::new()), None);
    assert!(matches!(page.init(), Err(WebBackendError::Typewriter(_))));
    assert!(!page.is_initialized());
}
