pub mod audit;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod init;
pub mod license;
pub mod logging;
pub mod policy;
pub mod report;
pub mod runner;

// Re-export main types for easy access
pub use audit::{discover_files, Auditor, Claim, ClaimOutcome, Statistics};
pub use config::{AuditSettings, Config, Overrides};
pub use error::{AuditError, ExitCode, Result};
pub use exclusion::ExclusionFilter;
pub use license::{Classification, DocumentKind, LicenseFamily, MatcherPipeline, SubstringRule};
pub use policy::ApprovalPolicy;
pub use report::{ReportDocument, StyleTransform, TemplateStyle};
pub use runner::{AuditOutcome, AuditRunner, RunState, Verdict};
