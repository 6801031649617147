use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{AuditError, Result};
use crate::license::SubstringRule;
use crate::policy::ApprovalPolicy;

pub const CONFIG_FILE: &str = "rat-audit.toml";
pub const DEFAULT_REPORT_DIR: &str = "build/reports/rat";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Print the plain summary and unapproved files to stderr
    pub verbose: Option<bool>,

    /// Fail the run when any file is unapproved
    pub fail_on_error: Option<bool>,

    /// Enable the built-in matcher ahead of custom rules
    pub add_default_matchers: Option<bool>,

    /// Approved family names; empty means the built-in table
    pub approved_licenses: Option<Vec<String>>,

    /// Exclusion file, one glob per line
    pub exclude_file: Option<PathBuf>,

    /// Template for the styled report
    pub stylesheet: Option<PathBuf>,

    /// Where the three reports are written
    pub report_dir: Option<PathBuf>,

    /// Host include globs, relative to the scan root
    pub includes: Option<Vec<String>>,

    /// Host exclude globs, relative to the scan root
    pub excludes: Option<Vec<String>>,

    /// Custom families recognised by substring
    pub substring_matchers: Vec<SubstringRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: Some(false),
            fail_on_error: Some(true),
            add_default_matchers: Some(true),
            approved_licenses: Some(Vec::new()),
            exclude_file: None,
            stylesheet: None,
            report_dir: Some(PathBuf::from(DEFAULT_REPORT_DIR)),
            includes: Some(Vec::new()),
            excludes: Some(vec!["**/.git/**".to_string()]),
            substring_matchers: Vec::new(),
        }
    }
}

/// Command-line values that win over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub verbose: bool,
    pub no_fail: bool,
    pub no_default_matchers: bool,
    pub approved_licenses: Vec<String>,
    pub exclude_file: Option<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

/// Fully resolved settings for one audit run.
///
/// Built once before any work starts; relative paths are already joined to
/// the scan root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSettings {
    pub root: PathBuf,
    pub verbose: bool,
    pub fail_on_error: bool,
    pub add_default_matchers: bool,
    pub substring_matchers: Vec<SubstringRule>,
    pub approved_licenses: Vec<String>,
    pub exclude_file: Option<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl AuditSettings {
    /// Defaults for `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            verbose: false,
            fail_on_error: true,
            add_default_matchers: true,
            substring_matchers: Vec::new(),
            approved_licenses: Vec::new(),
            exclude_file: None,
            stylesheet: None,
            report_dir: root.join(DEFAULT_REPORT_DIR),
            includes: Vec::new(),
            excludes: vec!["**/.git/**".to_string()],
        }
    }
}

impl Config {
    /// Merge with command-line overrides and validate.
    pub fn resolve(&self, root: &Path, overrides: &Overrides) -> Result<AuditSettings> {
        for rule in &self.substring_matchers {
            rule.validate()?;
        }

        let approved_licenses = if overrides.approved_licenses.is_empty() {
            self.approved_licenses.clone().unwrap_or_default()
        } else {
            overrides.approved_licenses.clone()
        };
        ApprovalPolicy::from_names(&approved_licenses)?;

        let under_root = |path: &PathBuf| root.join(path);
        let report_dir = overrides
            .report_dir
            .as_ref()
            .or(self.report_dir.as_ref())
            .map(under_root)
            .unwrap_or_else(|| root.join(DEFAULT_REPORT_DIR));

        Ok(AuditSettings {
            root: root.to_path_buf(),
            verbose: overrides.verbose || self.verbose.unwrap_or(false),
            fail_on_error: !overrides.no_fail && self.fail_on_error.unwrap_or(true),
            add_default_matchers: !overrides.no_default_matchers
                && self.add_default_matchers.unwrap_or(true),
            substring_matchers: self.substring_matchers.clone(),
            approved_licenses,
            exclude_file: overrides
                .exclude_file
                .as_ref()
                .or(self.exclude_file.as_ref())
                .map(under_root),
            stylesheet: overrides
                .stylesheet
                .as_ref()
                .or(self.stylesheet.as_ref())
                .map(under_root),
            report_dir,
            includes: self.includes.clone().unwrap_or_default(),
            excludes: self
                .excludes
                .clone()
                .unwrap_or_else(|| vec!["**/.git/**".to_string()]),
        })
    }
}

/// Load `rat-audit.toml` from the current directory, or from `path`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_from(path, true),
        None => {
            let default_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(CONFIG_FILE);
            load_config_from(&default_path, false)
        }
    }
}

/// An explicitly requested file must exist; the implicit one may be absent.
pub fn load_config_from(path: &Path, required: bool) -> Result<Config> {
    if !path.exists() {
        if required {
            return Err(AuditError::config_at(
                format!("configuration file not found: {}", path.display()),
                path,
            ));
        }
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
    parse_config(&content).map_err(|err| match err {
        AuditError::Configuration { message, .. } => AuditError::config_at(message, path),
        other => other,
    })
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content)
        .map_err(|e| AuditError::config(format!("failed to parse {}: {}", CONFIG_FILE, e)))
}
