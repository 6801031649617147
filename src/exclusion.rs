//! Exclusion patterns that remove files from an audit.
//!
//! One glob per line, applied in file order. `*` and `?` stay within a path
//! segment, `**` spans segments and a leading `!` re-includes a path that an
//! earlier line excluded. Patterns without a `/` match the file name at any
//! depth; patterns containing one are anchored at the audit root.

use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::Path;
use tracing::debug;
use crate::error::{AuditError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct ExclusionRule {
    source: String,
    negated: bool,
    patterns: Vec<Pattern>,
}

impl ExclusionRule {
    fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

/// Compiled exclusion file.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
}

impl ExclusionFilter {
    /// A filter that includes every path.
    pub fn include_all() -> Self {
        Self::default()
    }

    /// Load from an optional exclusion file; a missing file includes everything.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if path.is_file() => path,
            Some(path) => {
                debug!(path = %path.display(), "exclusion file not found, including all files");
                return Ok(Self::include_all());
            }
            None => return Ok(Self::include_all()),
        };

        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::config_at(format!("cannot read exclusion file: {}", e), path)
        })?;

        Self::parse(&content).map_err(|err| match err {
            AuditError::Configuration { message, .. } => AuditError::config_at(
                format!("{}: {}", path.display(), message),
                path,
            ),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Self::from_lines(content.lines())
    }

    pub fn from_lines<'a, I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rules = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            rules.push(compile_rule(line, index + 1)?);
        }
        debug!(rules = rules.len(), "compiled exclusion patterns");
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `path` is relative to the audit root.
    pub fn should_include(&self, path: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        let path = normalize_path(path);

        let mut excluded = false;
        for rule in &self.rules {
            if rule.matches(&path) {
                excluded = !rule.negated;
            }
        }
        !excluded
    }

    /// The pattern lines in effect, for diagnostics.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.source.as_str())
    }
}

fn compile_rule(line: &str, line_number: usize) -> Result<ExclusionRule> {
    let (negated, body) = match line.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };
    if body.is_empty() {
        return Err(AuditError::config(format!(
            "line {}: negation without a pattern",
            line_number
        )));
    }

    let directory = body.ends_with('/');
    let body = body.trim_end_matches('/');
    let anchored = body.contains('/');
    let body = body.strip_prefix("./").unwrap_or(body).trim_start_matches('/');
    if body.is_empty() {
        return Err(AuditError::config(format!(
            "line {}: pattern '{}' matches nothing",
            line_number, line
        )));
    }

    let base = if directory {
        format!("{}/**", body)
    } else {
        body.to_string()
    };

    let mut sources = vec![base.clone()];
    if !anchored {
        sources.push(format!("**/{}", base));
    }

    let patterns = sources
        .iter()
        .map(|s| {
            Pattern::new(s).map_err(|e| {
                AuditError::config(format!(
                    "line {}: invalid exclusion pattern '{}': {}",
                    line_number, line, e
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExclusionRule {
        source: line.to_string(),
        negated,
        patterns,
    })
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}
