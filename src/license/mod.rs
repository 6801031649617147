use std::fmt;
use std::hash::{Hash, Hasher};

pub mod defaults;
pub mod matcher;

pub use defaults::{detect_document_kind, DefaultMatcher};
pub use matcher::{HeaderMatcher, MatcherPipeline, SubstringRule};

/// A named category of license header text.
///
/// Two families are the same family when their category codes agree; the
/// display name is carried along for reports and explicit approval lists.
#[derive(Debug, Clone)]
pub struct LicenseFamily {
    pub category: String,
    pub name: String,
}

impl LicenseFamily {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for LicenseFamily {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
    }
}

impl Eq for LicenseFamily {}

impl Hash for LicenseFamily {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
    }
}

impl fmt::Display for LicenseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

/// Result of running the matcher pipeline over one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Family(LicenseFamily),
    Unknown,
}

impl Classification {
    pub fn family(&self) -> Option<&LicenseFamily> {
        match self {
            Classification::Family(family) => Some(family),
            Classification::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown)
    }
}

/// Coarse document type, decided before header matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Standard,
    Binary,
    Archive,
    Notice,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Standard => "standard",
            DocumentKind::Binary => "binary",
            DocumentKind::Archive => "archive",
            DocumentKind::Notice => "notice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(DocumentKind::Standard),
            "binary" => Some(DocumentKind::Binary),
            "archive" => Some(DocumentKind::Archive),
            "notice" => Some(DocumentKind::Notice),
            _ => None,
        }
    }
}

/// Reduce text to lower-case ASCII alphanumerics so that comment markers,
/// line breaks and indentation do not affect phrase matching.
pub fn normalize_header_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
