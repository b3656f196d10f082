#![forbid(unsafe_code)]

//! Runtime: the single-threaded lifecycle around `folio-core` state.
//!
//! Signals with disposable subscriptions, a deterministic timer queue, the
//! typewriter task, the scroll-spy binding, the theme context and its
//! preference storage, page configuration, and log setup.

pub mod config;
pub mod logging;
pub mod scroll_spy;
pub mod state_persistence;
pub mod subscription;
pub mod theme;
pub mod timer;
pub mod typewriter_task;

pub use config::PageConfig;
pub use logging::{LoggingConfig, LoggingError};
pub use scroll_spy::{ScrollChanged, ScrollSpy};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{MemoryStorage, PreferenceStore, StorageError, StorageResult};
pub use subscription::{Signal, SubId, Subscription};
pub use theme::{THEME_KEY, ThemeContext, ThemeSource};
pub use timer::{Fired, TimerId, TimerQueue};
pub use typewriter_task::{TaskState, TypewriterTask};
