#![forbid(unsafe_code)]

//! Colour scheme value.
//!
//! The live, persisted preference lives in `folio-runtime`'s theme context;
//! this module only defines the value and its string form.

use std::fmt;
use std::str::FromStr;

use crate::icon::ThemeIcon;

/// Page colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Stored string form (`"dark"` / `"light"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Whether this is the dark scheme.
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Class to set on the document root, if any.
    pub const fn root_class(self) -> Option<&'static str> {
        match self {
            Self::Dark => Some("dark"),
            Self::Light => None,
        }
    }

    /// Icon for the toggle button: it shows the scheme you would switch to.
    pub const fn toggle_icon(self) -> ThemeIcon {
        match self {
            Self::Dark => ThemeIcon::Sun,
            Self::Light => ThemeIcon::Moon,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored theme string that is neither `dark` nor `light`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError(pub String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized theme: {:?}", self.0)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light\n".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn toggle_icon_offers_other_scheme() {
        assert_eq!(Theme::Dark.toggle_icon(), ThemeIcon::Sun);
        assert_eq!(Theme::Light.toggle_icon(), ThemeIcon::Moon);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.root_class(), Some("dark"));
        assert_eq!(Theme::Light.root_class(), None);
    }
}
