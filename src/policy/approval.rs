use crate::error::{AuditError, Result};
use crate::license::{Classification, LicenseFamily};

/// Categories approved when no explicit allow-list is configured.
pub const DEFAULT_APPROVED_CATEGORIES: &[&str] = &[
    "AL", "GEN", "BIN", "ARC", "NOT", "MIT", "BSD", "CDDL1", "GPL1", "GPL2", "GPL3", "W3C",
    "W3CD", "OASIS", "DOJO", "TMF",
];

/// Decides whether a classified family counts as compliant.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalPolicy {
    /// Approve families whose category is in the built-in table
    Defaults,
    /// Approve exactly the listed family names; replaces the defaults
    Explicit(Vec<String>),
}

impl ApprovalPolicy {
    /// An empty list means "use the defaults".
    pub fn from_names(names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(ApprovalPolicy::Defaults);
        }
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(AuditError::config("approved license names must not be blank"));
        }
        Ok(ApprovalPolicy::Explicit(names.to_vec()))
    }

    pub fn is_approved(&self, family: &LicenseFamily) -> bool {
        match self {
            ApprovalPolicy::Defaults => {
                DEFAULT_APPROVED_CATEGORIES.contains(&family.category.as_str())
            }
            ApprovalPolicy::Explicit(names) => names.iter().any(|n| *n == family.name),
        }
    }

    /// Unknown headers are never approved.
    pub fn is_classification_approved(&self, classification: &Classification) -> bool {
        classification
            .family()
            .map(|family| self.is_approved(family))
            .unwrap_or(false)
    }
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        ApprovalPolicy::Defaults
    }
}
