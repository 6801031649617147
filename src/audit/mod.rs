use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::exclusion::ExclusionFilter;
use crate::license::{Classification, DocumentKind, LicenseFamily, MatcherPipeline};
use crate::policy::ApprovalPolicy;

pub mod discovery;
pub mod stats;

pub use discovery::discover_files;
pub use stats::{aggregate, Statistics};

/// Number of leading lines kept as a header sample for unknown files.
pub const HEADER_SAMPLE_LINES: usize = 20;

/// What the audit concluded for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Family { family: LicenseFamily },
    Unknown,
    ReadError { reason: String },
}

impl From<Classification> for ClaimOutcome {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Family(family) => ClaimOutcome::Family { family },
            Classification::Unknown => ClaimOutcome::Unknown,
        }
    }
}

/// Classification result for one scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Path relative to the audit root, `/`-separated
    pub path: String,
    pub kind: DocumentKind,
    pub outcome: ClaimOutcome,
    pub approved: bool,
    pub header_sample: Option<String>,
}

impl Claim {
    pub fn family(&self) -> Option<&LicenseFamily> {
        match &self.outcome {
            ClaimOutcome::Family { family } => Some(family),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.outcome, ClaimOutcome::Unknown)
    }

    pub fn is_read_error(&self) -> bool {
        matches!(self.outcome, ClaimOutcome::ReadError { .. })
    }

    /// Short human explanation of why a claim is not approved.
    pub fn reason(&self) -> String {
        match &self.outcome {
            ClaimOutcome::Family { family } if self.approved => {
                format!("approved ({})", family.name)
            }
            ClaimOutcome::Family { family } => {
                format!("license family '{}' is not approved", family.name)
            }
            ClaimOutcome::Unknown => "unknown license".to_string(),
            ClaimOutcome::ReadError { reason } => format!("unreadable: {}", reason),
        }
    }
}

/// Walks a discovered file list and produces one claim per included file.
pub struct Auditor<'a> {
    root: PathBuf,
    exclusions: &'a ExclusionFilter,
    pipeline: &'a MatcherPipeline,
    policy: &'a ApprovalPolicy,
}

impl<'a> Auditor<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        exclusions: &'a ExclusionFilter,
        pipeline: &'a MatcherPipeline,
        policy: &'a ApprovalPolicy,
    ) -> Self {
        Self {
            root: root.into(),
            exclusions,
            pipeline,
            policy,
        }
    }

    /// Claims come back in the order of `files`.
    pub fn run(&self, files: &[PathBuf]) -> Vec<Claim> {
        let included: Vec<(String, &PathBuf)> = files
            .iter()
            .map(|file| (relative_path(&self.root, file), file))
            .filter(|(rel, _)| {
                let keep = self.exclusions.should_include(rel);
                if !keep {
                    debug!(path = %rel, "excluded");
                }
                keep
            })
            .collect();

        // Indexed collect keeps discovery order
        let claims: Vec<Claim> = included
            .par_iter()
            .map(|(rel, file)| self.audit_file(rel, &self.resolve(file)))
            .collect();

        info!(
            scanned = claims.len(),
            excluded = files.len() - claims.len(),
            "audit pass complete"
        );
        claims
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }

    fn audit_file(&self, rel: &str, path: &Path) -> Claim {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %rel, error = %e, "read failed");
                return Claim {
                    path: rel.to_string(),
                    kind: DocumentKind::Standard,
                    outcome: ClaimOutcome::ReadError {
                        reason: e.to_string(),
                    },
                    approved: false,
                    header_sample: None,
                };
            }
        };

        let (kind, classification) = self.pipeline.classify_document(rel, &content);
        let approved = self.policy.is_classification_approved(&classification);
        let header_sample = (classification.is_unknown() && kind == DocumentKind::Standard)
            .then(|| header_sample(&content));

        debug!(path = %rel, kind = kind.as_str(), approved, "classified");
        Claim {
            path: rel.to_string(),
            kind,
            outcome: classification.into(),
            approved,
            header_sample,
        }
    }
}

fn header_sample(content: &[u8]) -> String {
    String::from_utf8_lossy(content)
        .lines()
        .take(HEADER_SAMPLE_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Path of `file` relative to `root` with `/` separators.
pub fn relative_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
