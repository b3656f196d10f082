#![forbid(unsafe_code)]

//! Content documents for the portfolio page.
//!
//! The page renders five static JSON documents. Each is optional: a missing
//! file leaves that part of the page empty, exactly as a section renders
//! nothing until its data has arrived. A malformed file is an error naming
//! the file.
//!
//! Nothing here is read by the scroll-spy or the typewriter.

pub mod model;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub use model::{
    Certification, DisplayName, Education, Experience, ExperienceDocument, Profile, Project,
    ProjectsDocument, Skill, SkillCategory, SkillsDocument, Social, SocialLinks, SocialsDocument,
};

/// File names read by [`ContentBundle::load_dir`].
pub const PROFILE_FILE: &str = "profile.json";
pub const SKILLS_FILE: &str = "skills.json";
pub const EXPERIENCE_FILE: &str = "experience.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const SOCIALS_FILE: &str = "socials.json";

/// Errors raised while loading content.
#[derive(Debug)]
pub enum ContentError {
    /// The file exists but could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The file is not a valid document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl ContentError {
    /// Path of the offending file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// Parse one document from a string. `path` is only used for error reporting.
pub fn parse_document<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, ContentError> {
    serde_json::from_str(text).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one document; `Ok(None)` if the file does not exist.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ContentError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "content document absent");
            return Ok(None);
        }
        Err(source) => {
            return Err(ContentError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_document(path, &text).map(Some)
}

/// All content documents of a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentBundle {
    /// `profile.json`: hero, about and contact details.
    pub profile: Option<Profile>,
    /// `skills.json`: skill cards.
    pub skills: Option<SkillsDocument>,
    /// `experience.json`: roles and certifications.
    pub experience: Option<ExperienceDocument>,
    /// `projects.json`: project cards.
    pub projects: Option<ProjectsDocument>,
    /// `socials.json`: contact links.
    pub socials: Option<SocialsDocument>,
}

impl ContentBundle {
    /// Load every document from `dir`. Missing files stay `None`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let bundle = Self {
            profile: load_document(&dir.join(PROFILE_FILE))?,
            skills: load_document(&dir.join(SKILLS_FILE))?,
            experience: load_document(&dir.join(EXPERIENCE_FILE))?,
            projects: load_document(&dir.join(PROJECTS_FILE))?,
            socials: load_document(&dir.join(SOCIALS_FILE))?,
        };
        tracing::debug!(
            dir = %dir.display(),
            loaded = bundle.loaded_count(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Number of documents present.
    pub fn loaded_count(&self) -> usize {
        [
            self.profile.is_some(),
            self.skills.is_some(),
            self.experience.is_some(),
            self.projects.is_some(),
            self.socials.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Whether the hero has data to show.
    ///
    /// The typewriter starts once this holds: a host that built its page
    /// program with `wait_for_content` calls `content_ready` at that point.
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}
