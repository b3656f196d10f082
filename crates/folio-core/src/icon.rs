#![forbid(unsafe_code)]

//! Icon lookup tables.
//!
//! Content documents name icons with free-form strings; the page maps them
//! onto a closed set of variants so rendering is a plain `match`.

use std::fmt;

/// Icons used for contact and social links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SocialIcon {
    Linkedin,
    Palette,
    #[default]
    Mail,
    Phone,
    Github,
    Twitter,
    Instagram,
}

impl SocialIcon {
    /// Every variant, in display order.
    pub const ALL: [SocialIcon; 7] = [
        Self::Linkedin,
        Self::Palette,
        Self::Mail,
        Self::Phone,
        Self::Github,
        Self::Twitter,
        Self::Instagram,
    ];

    /// Map an icon name (case-insensitive). Unknown names fall back to [`SocialIcon::Mail`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Map an icon name, returning `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|icon| icon.name().eq_ignore_ascii_case(name))
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Palette => "palette",
            Self::Mail => "mail",
            Self::Phone => "phone",
            Self::Github => "github",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
        }
    }

    /// Accessible label for the link.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linkedin => "LinkedIn",
            Self::Palette => "Portfolio",
            Self::Mail => "Email",
            Self::Phone => "Phone",
            Self::Github => "GitHub",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for SocialIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Icon shown on the theme toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeIcon {
    /// Offered while dark mode is on.
    Sun,
    /// Offered while light mode is on.
    Moon,
}

/// Icon shown on the mobile menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuIcon {
    /// Menu closed.
    Menu,
    /// Menu open.
    Close,
}
