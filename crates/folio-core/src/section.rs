#![forbid(unsafe_code)]

//! Navigable page sections and their ordered registry.
//!
//! # Invariants
//!
//! 1. A registry holds at least one section.
//! 2. Section ids are non-empty and unique.
//! 3. Order is page order (top to bottom) and never changes after construction.

use std::fmt;

/// One navigable region of the page, addressable by `#id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Anchor id of the region (without the leading `#`).
    pub id: String,
    /// Display name used for the nav link.
    pub label: String,
}

impl Section {
    /// Create a new section.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Anchor target for links, e.g. `#about`.
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Errors raised while building or querying a [`SectionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// No sections were supplied.
    Empty,
    /// A section has an empty id.
    EmptyId {
        /// Position of the offending section.
        index: usize,
    },
    /// Two sections share the same id.
    DuplicateId(String),
    /// Lookup of an id that is not registered.
    Unknown(String),
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "section registry is empty"),
            Self::EmptyId { index } => write!(f, "section at position {index} has an empty id"),
            Self::DuplicateId(id) => write!(f, "duplicate section id: {id}"),
            Self::Unknown(id) => write!(f, "unknown section id: {id}"),
        }
    }
}

impl std::error::Error for SectionError {}

/// Ordered, validated list of page sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    /// Build a registry, validating ids.
    pub fn new(sections: Vec<Section>) -> Result<Self, SectionError> {
        if sections.is_empty() {
            return Err(SectionError::Empty);
        }
        for (index, section) in sections.iter().enumerate() {
            if section.id.is_empty() {
                return Err(SectionError::EmptyId { index });
            }
            if sections[..index].iter().any(|s| s.id == section.id) {
                return Err(SectionError::DuplicateId(section.id.clone()));
            }
        }
        Ok(Self { sections })
    }

    /// The six sections of the portfolio page, in page order.
    pub fn portfolio() -> Self {
        Self {
            sections: vec![
                Section::new("home", "Home"),
                Section::new("about", "About"),
                Section::new("skills", "Skills"),
                Section::new("experience", "Experience"),
                Section::new("projects", "Projects"),
                Section::new("contact", "Contact"),
            ],
        }
    }

    /// Sections in page order.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; a registry is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Page-order position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Look up a section by id.
    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section at a page-order position.
    pub fn at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Iterate section ids in page order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }

    /// Like [`position`](Self::position) but reports unknown ids as errors.
    pub fn require(&self, id: &str) -> Result<usize, SectionError> {
        self.position(id)
            .ok_or_else(|| SectionError::Unknown(id.to_owned()))
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::portfolio()
    }
}
