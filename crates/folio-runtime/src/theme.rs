#![forbid(unsafe_code)]

//! Theme context: the page's dark/light preference.
//!
//! Initial theme precedence is stored preference, then the system colour
//! scheme, then [`Theme::Dark`]. Changes are persisted and broadcast to
//! subscribers; setting the current theme again is a no-op.
//!
//! # Failure Modes
//!
//! - An unreadable or unparseable stored value is ignored (logged at warn)
//!   and initialisation falls through to the system preference.
//! - A failed write on [`ThemeContext::set`] is returned, but the in-memory
//!   theme has already changed and subscribers have been notified.

use std::sync::Arc;

use folio_core::icon::ThemeIcon;
use folio_core::theme::Theme;

use crate::state_persistence::{PreferenceStore, StorageError};
use crate::subscription::{Signal, Subscription};

/// Preference key the theme is stored under.
pub const THEME_KEY: &str = "theme";

/// Where the initial theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// A previously stored preference.
    Stored,
    /// The system colour-scheme preference.
    System,
    /// Nothing known; fell back to dark.
    Default,
}

/// Shared, observable theme state.
pub struct ThemeContext {
    theme: Theme,
    source: ThemeSource,
    store: Arc<dyn PreferenceStore>,
    changes: Signal<Theme>,
}

impl ThemeContext {
    /// Resolve the initial theme.
    ///
    /// `system_prefers_dark` is `None` when the host cannot query the
    /// colour-scheme preference.
    pub fn initialize(store: Arc<dyn PreferenceStore>, system_prefers_dark: Option<bool>) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(Some(raw)) => match raw.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring stored theme");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(store = store.name(), error = %e, "failed to read stored theme");
                None
            }
        };

        let (theme, source) = match (stored, system_prefers_dark) {
            (Some(theme), _) => (theme, ThemeSource::Stored),
            (None, Some(true)) => (Theme::Dark, ThemeSource::System),
            (None, Some(false)) => (Theme::Light, ThemeSource::System),
            (None, None) => (Theme::Dark, ThemeSource::Default),
        };
        tracing::debug!(%theme, ?source, "theme initialised");

        Self {
            theme,
            source,
            store,
            changes: Signal::new(),
        }
    }

    /// Current theme.
    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Where the initial theme came from.
    #[inline]
    pub fn source(&self) -> ThemeSource {
        self.source
    }

    /// Switch to `theme`. Returns `Ok(true)` if it changed.
    pub fn set(&mut self, theme: Theme) -> Result<bool, StorageError> {
        if theme == self.theme {
            return Ok(false);
        }
        self.theme = theme;
        tracing::debug!(%theme, "theme changed");
        self.changes.emit(&theme);
        self.store.set(THEME_KEY, theme.as_str()).map_err(|e| {
            tracing::warn!(store = self.store.name(), error = %e, "failed to persist theme");
            e
        })?;
        Ok(true)
    }

    /// Flip between dark and light, returning the new theme.
    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        self.set(self.theme.toggled())?;
        Ok(self.theme)
    }

    /// Class to put on the document root (`Some("dark")` in dark mode).
    pub fn root_class(&self) -> Option<&'static str> {
        self.theme.root_class()
    }

    /// Icon shown on the theme toggle button.
    pub fn toggle_icon(&self) -> ThemeIcon {
        self.theme.toggle_icon()
    }

    /// Subscribe to theme changes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_change(&self, listener: impl FnMut(&Theme) + 'static) -> Subscription {
        self.changes.subscribe(listener)
    }
}

impl std::fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeContext")
            .field("theme", &self.theme)
            .field("source", &self.source)
            .field("store", &self.store.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_persistence::{MemoryStorage, StorageResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store(entries: &[(&str, &str)]) -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::with_entries(entries.iter().copied()))
    }

    #[test]
    fn stored_value_wins() {
        let ctx = ThemeContext::initialize(store(&[(THEME_KEY, "light")]), Some(true));
        assert_eq!(ctx.theme(), Theme::Light);
        assert_eq!(ctx.source(), ThemeSource::Stored);
    }

    #[test]
    fn system_preference_used_when_nothing_stored() {
        let ctx = ThemeContext::initialize(store(&[]), Some(false));
        assert_eq!(ctx.theme(), Theme::Light);
        assert_eq!(ctx.source(), ThemeSource::System);

        let ctx = ThemeContext::initialize(store(&[]), Some(true));
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn defaults_to_dark() {
        let ctx = ThemeContext::initialize(store(&[]), None);
        assert_eq!(ctx.theme(), Theme::Dark);
        assert_eq!(ctx.source(), ThemeSource::Default);
        assert_eq!(ctx.root_class(), Some("dark"));
        assert_eq!(ctx.toggle_icon(), ThemeIcon::Sun);
    }

    #[test]
    fn garbage_stored_value_falls_through() {
        let ctx = ThemeContext::initialize(store(&[(THEME_KEY, "sepia")]), Some(false));
        assert_eq!(ctx.theme(), Theme::Light);
        assert_eq!(ctx.source(), ThemeSource::System);
    }

    #[test]
    fn toggle_persists_and_notifies() {
        let backing = store(&[]);
        let mut ctx = ThemeContext::initialize(backing.clone(), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            ctx.on_change(move |t| seen.borrow_mut().push(*t))
        };

        assert_eq!(ctx.toggle().unwrap(), Theme::Light);
        assert_eq!(backing.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(ctx.root_class(), None);
        assert_eq!(ctx.toggle_icon(), ThemeIcon::Moon);

        assert!(!ctx.set(Theme::Light).unwrap());
        assert_eq!(*seen.borrow(), [Theme::Light]);

        // A fresh context reads the persisted choice.
        let again = ThemeContext::initialize(backing, Some(true));
        assert_eq!(again.theme(), Theme::Light);
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn name(&self) -> &str {
            "BrokenStore"
        }
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Corruption("unreadable".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Corruption("read-only".into()))
        }
        fn remove(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn storage_failure_still_changes_theme() {
        let mut ctx = ThemeContext::initialize(Arc::new(BrokenStore), None);
        assert_eq!(ctx.source(), ThemeSource::Default);
        assert!(ctx.set(Theme::Light).is_err());
        assert_eq!(ctx.theme(), Theme::Light);
    }
}
