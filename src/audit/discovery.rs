use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use super::relative_path;
use crate::error::{AuditError, Result};

const HOST_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Host-side file discovery: every regular file under `root`, filtered by
/// include/exclude globs relative to the root, in sorted order.
///
/// `skip_dir` (usually the report directory) is never descended into.
pub fn discover_files(
    root: &Path,
    includes: &[String],
    excludes: &[String],
    skip_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let root_str = root
        .to_str()
        .ok_or_else(|| AuditError::config(format!("non UTF-8 audit root: {}", root.display())))?;
    if !root.is_dir() {
        return Err(AuditError::config_at(
            format!("audit root is not a directory: {}", root.display()),
            root,
        ));
    }

    let includes = compile_host_patterns(includes, "include")?;
    let excludes = compile_host_patterns(excludes, "exclude")?;

    let skip_rel = skip_dir.and_then(|dir| skip_dir_under_root(root, dir));
    let walk_pattern = format!("{}/**/*", Pattern::escape(root_str.trim_end_matches('/')));
    let entries = glob::glob_with(&walk_pattern, HOST_MATCH_OPTIONS)
        .map_err(|e| AuditError::config(format!("invalid audit root pattern: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "skipping unreadable path during discovery");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if skip_dir.is_some_and(|dir| path.starts_with(dir)) {
            continue;
        }

        let rel = relative_path(root, &path);
        if skip_rel.as_ref().is_some_and(|skip| Path::new(&rel).starts_with(skip)) {
            continue;
        }
        if !includes.is_empty() && !includes.iter().any(|p| p.matches_with(&rel, HOST_MATCH_OPTIONS)) {
            continue;
        }
        if excludes.iter().any(|p| p.matches_with(&rel, HOST_MATCH_OPTIONS)) {
            continue;
        }
        files.push(path);
    }

    files.sort();
    debug!(root = %root.display(), files = files.len(), "discovered files");
    Ok(files)
}

/// Location of `dir` relative to `root`, after resolving `..` and symlinks
/// on both sides. `None` when it does not exist or lies outside the root.
fn skip_dir_under_root(root: &Path, dir: &Path) -> Option<PathBuf> {
    let root = fs::canonicalize(root).ok()?;
    let dir = fs::canonicalize(dir).ok()?;
    let rel = dir.strip_prefix(&root).ok()?;
    (!rel.as_os_str().is_empty()).then(|| rel.to_path_buf())
}

fn compile_host_patterns(patterns: &[String], kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                AuditError::config(format!("invalid {} pattern '{}': {}", kind, p, e))
            })
        })
        .collect()
}
