#![forbid(unsafe_code)]

//! Document models.
//!
//! Field names follow the JSON documents (camelCase). Every collection
//! defaults to empty so partially filled documents still load.

use folio_core::icon::SocialIcon;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// profile.json
// ─────────────────────────────────────────────────────────────────────────────

/// Owner of the portfolio (`profile.json`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_image: Option<String>,
    #[serde(default)]
    pub education: Education,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

/// Hero heading split of [`Profile::name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName<'a> {
    /// First word of the name.
    pub first: &'a str,
    /// Remaining words prefixed with `.`, e.g. `.Shankar`.
    pub rest: Option<String>,
}

impl Profile {
    /// Split the name for the hero heading: `"Lokesh Shankar"` becomes
    /// `Lokesh` + `.Shankar`.
    pub fn display_name(&self) -> DisplayName<'_> {
        let mut words = self.name.split_whitespace();
        let first = words.next().unwrap_or("");
        let rest: Vec<&str> = words.collect();
        DisplayName {
            first,
            rest: (!rest.is_empty()).then(|| format!(".{}", rest.join(" "))),
        }
    }

    /// `mailto:` link for the email, if one is set.
    pub fn mailto(&self) -> Option<String> {
        (!self.email.is_empty()).then(|| format!("mailto:{}", self.email))
    }

    /// `tel:` link for the phone number, if one is set.
    pub fn tel(&self) -> Option<String> {
        (!self.phone.is_empty()).then(|| format!("tel:{}", self.phone))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub college: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_graduation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_years: Option<String>,
}

/// Hero social links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl SocialLinks {
    /// Present links in hero order (twitter, github, linkedin, instagram).
    pub fn iter(&self) -> impl Iterator<Item = (SocialIcon, &str)> {
        [
            (SocialIcon::Twitter, &self.twitter),
            (SocialIcon::Github, &self.github),
            (SocialIcon::Linkedin, &self.linkedin),
            (SocialIcon::Instagram, &self.instagram),
        ]
        .into_iter()
        .filter_map(|(icon, url)| url.as_deref().map(|u| (icon, u)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// skills.json
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillsDocument {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
}

/// One card of the skills grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    /// Card heading.
    pub name: String,
    /// Skills listed on the card, in document order.
    #[serde(default)]
    pub skills: Vec<Skill>,
}

/// A skill with its progress-bar level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Label shown next to the bar.
    pub name: String,
    /// Proficiency percentage as written in the document.
    #[serde(default)]
    pub level: i64,
}

impl Skill {
    /// Level clamped to `0..=100` for a progress bar.
    pub fn percent(&self) -> u8 {
        // Clamped into range, so the narrowing is exact.
        self.level.clamp(0, 100) as u8
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// experience.json
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExperienceDocument {
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: serde_json::Value,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub year: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// projects.json
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectsDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: serde_json::Value,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Project {
    /// Whether the status badge shows the in-progress style.
    pub fn is_in_progress(&self) -> bool {
        self.status.eq_ignore_ascii_case("in progress")
    }

    /// Link target, treating an empty string as absent.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// socials.json
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialsDocument {
    #[serde(default)]
    pub socials: Vec<Social>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub name: String,
    pub url: String,
    /// Icon name; unknown names render as [`SocialIcon::Mail`].
    #[serde(default)]
    pub icon: String,
}

impl Social {
    /// Resolved icon.
    pub fn icon(&self) -> SocialIcon {
        SocialIcon::from_name(&self.icon)
    }

    /// Whether the link opens in a new tab (everything except email and phone).
    pub fn opens_new_tab(&self) -> bool {
        !matches!(self.name.as_str(), "Email" | "Phone")
    }
}
