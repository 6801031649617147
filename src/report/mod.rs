use std::path::{Path, PathBuf};
use crate::audit::{aggregate, Claim, Statistics};

pub mod plain;
pub mod style;
pub mod xml;

pub use style::{StyleTransform, TemplateStyle};
pub use xml::{Outcome, ReportDocument, ResourceEntry};

/// File names of the published report artifacts.
pub const STRUCTURED_REPORT_FILE: &str = "rat-report.xml";
pub const PLAIN_REPORT_FILE: &str = "rat-report.txt";
pub const STYLED_REPORT_FILE: &str = "index.html";

/// Claims collected during a scan, in discovery order.
#[derive(Debug, Default)]
pub struct ReportModel {
    claims: Vec<Claim>,
}

impl ReportModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    pub fn extend(&mut self, claims: impl IntoIterator<Item = Claim>) {
        self.claims.extend(claims);
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Aggregate statistics and stop accepting claims.
    pub fn freeze(self) -> FrozenReport {
        let statistics = aggregate(&self.claims);
        FrozenReport {
            claims: self.claims,
            statistics,
        }
    }
}

/// Immutable report handed to the renderers.
#[derive(Debug, Clone)]
pub struct FrozenReport {
    claims: Vec<Claim>,
    statistics: Statistics,
}

impl FrozenReport {
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Unapproved claims sorted by path.
    pub fn unapproved(&self) -> Vec<&Claim> {
        let mut claims: Vec<&Claim> = self.claims.iter().filter(|c| !c.approved).collect();
        claims.sort_by(|a, b| a.path.cmp(&b.path));
        claims
    }
}

/// The three rendered artifacts of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReports {
    pub structured: String,
    pub plain: String,
    pub styled: String,
}

/// Locations of the artifacts under a report directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub structured: PathBuf,
    pub plain: PathBuf,
    pub styled: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            structured: dir.join(STRUCTURED_REPORT_FILE),
            plain: dir.join(PLAIN_REPORT_FILE),
            styled: dir.join(STYLED_REPORT_FILE),
        }
    }
}
