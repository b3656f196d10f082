#![forbid(unsafe_code)]

//! Process-wide log subscriber.
//!
//! Filtering follows the `FOLIO_LOG` environment variable (an `EnvFilter`
//! directive such as `folio_runtime=debug`), falling back to the configured
//! default. Output goes to stderr, as JSON objects when the `tracing-json`
//! feature is enabled and [`LoggingConfig::json`] is set.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directive used when `FOLIO_LOG` is unset or invalid.
    /// Default: `info`
    pub default_directive: String,
    /// Emit JSON lines (needs the `tracing-json` feature).
    /// Default: false
    pub json: bool,
    /// Include the event target (module path).
    /// Default: true
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".into(),
            json: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Set the fallback directive.
    #[must_use]
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    /// Request JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the filter: `FOLIO_LOG` if it parses, otherwise the default.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(directive) = std::env::var(LOG_ENV) {
            match EnvFilter::try_new(&directive) {
                Ok(filter) => return Ok(filter),
                Err(e) => eprintln!("ignoring invalid {LOG_ENV}={directive:?}: {e}"),
            }
        }
        EnvFilter::try_new(&self.default_directive)
            .map_err(|e| LoggingError::Directive(e.to_string()))
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// The default directive does not parse.
    Directive(String),
    /// A global subscriber is already installed.
    AlreadyInitialized,
    /// JSON output was requested without the `tracing-json` feature.
    JsonUnavailable,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directive(msg) => write!(f, "invalid log directive: {msg}"),
            Self::AlreadyInitialized => write!(f, "a global log subscriber is already installed"),
            Self::JsonUnavailable => {
                write!(f, "JSON logging requires the `tracing-json` feature")
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_writer(std::io::stderr);

    let result = if config.json {
        #[cfg(feature = "tracing-json")]
        {
            builder.json().try_init()
        }
        #[cfg(not(feature = "tracing-json"))]
        {
            return Err(LoggingError::JsonUnavailable);
        }
    } else {
        builder.try_init()
    };
    result.map_err(|_| LoggingError::AlreadyInitialized)?;
    tracing::debug!(json = config.json, "logging initialised");
    Ok(())
}
