#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! Re-exports the page behaviour engine (scroll-spy, typewriter, theme,
//! navbar chrome, reveal animations) from the internal crates and offers a
//! small prelude for hosts.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use folio_core::animation::reveal::{RevealConfig, RevealTracker};
pub use folio_core::event::PageEvent;
pub use folio_core::geometry::{Extent, Viewport};
pub use folio_core::icon::{MenuIcon, SocialIcon, ThemeIcon};
pub use folio_core::nav::{NavConfig, NavState, NavTarget};
pub use folio_core::scroll_spy::{
    ActiveSectionTracker, MeasureFn, ScrollSpyConfig, SectionMeasure,
};
pub use folio_core::section::{Section, SectionError, SectionRegistry};
pub use folio_core::theme::Theme;
pub use folio_core::typewriter::{Typewriter, TypewriterError, TypewriterPhase, TypewriterTiming};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use folio_runtime::FileStorage;
pub use folio_runtime::{
    LoggingConfig, LoggingError, MemoryStorage, PageConfig, PreferenceStore, ScrollChanged,
    ScrollSpy, Signal, StorageError, Subscription, ThemeContext, TimerQueue, TypewriterTask,
};

// --- Content re-exports ----------------------------------------------------

#[cfg(feature = "content")]
pub use folio_content::{ContentBundle, ContentError};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use folio_web::{Changed, PageLayout, PageProgram, StepResult, WebBackendError, WebOutputs};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for folio hosts.
#[derive(Debug)]
pub enum Error {
    /// Invalid section configuration.
    Section(SectionError),
    /// Invalid typewriter configuration.
    Typewriter(TypewriterError),
    /// Preference storage failure.
    Storage(StorageError),
    /// Log subscriber setup failure.
    Logging(LoggingError),
    /// Content document failure.
    #[cfg(feature = "content")]
    Content(ContentError),
    /// Page program failure.
    #[cfg(feature = "web")]
    Web(WebBackendError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(err) => write!(f, "{err}"),
            Self::Typewriter(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            #[cfg(feature = "content")]
            Self::Content(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Web(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Section(err) => Some(err),
            Self::Typewriter(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Logging(err) => Some(err),
            #[cfg(feature = "content")]
            Self::Content(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Web(err) => Some(err),
        }
    }
}

impl From<SectionError> for Error {
    fn from(err: SectionError) -> Self {
        Self::Section(err)
    }
}

impl From<TypewriterError> for Error {
    fn from(err: TypewriterError) -> Self {
        Self::Typewriter(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<LoggingError> for Error {
    fn from(err: LoggingError) -> Self {
        Self::Logging(err)
    }
}

#[cfg(feature = "content")]
impl From<ContentError> for Error {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

#[cfg(feature = "web")]
impl From<WebBackendError> for Error {
    fn from(err: WebBackendError) -> Self {
        Self::Web(err)
    }
}

/// Standard result type for folio APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Extent, MemoryStorage, PageConfig, PageEvent, PreferenceStore, Result, Section,
        SectionMeasure, SectionRegistry, Theme, Viewport,
    };
    #[cfg(feature = "web")]
    pub use crate::{Changed, PageLayout, PageProgram, WebOutputs};
    pub use crate::{core, runtime};
}

pub use folio_core as core;
#[cfg(feature = "content")]
pub use folio_content as content;
pub use folio_runtime as runtime;
#[cfg(feature = "web")]
pub use folio_web as web;
