use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use rat_audit::config::{load_config, Overrides};
use rat_audit::error::AuditError;
use rat_audit::runner::{AuditRunner, Verdict};

pub struct CheckArgs {
    pub path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub exclude_file: Option<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub approved: Vec<String>,
    pub no_default_matchers: bool,
    pub no_fail: bool,
    pub verbose: bool,
    pub quiet: bool,
}

pub fn handle_check(args: CheckArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let root = args.path.clone().unwrap_or_else(|| cwd.clone());
    let root = root.canonicalize().map_err(|e| {
        AuditError::config_at(format!("cannot audit {}: {}", root.display(), e), &root)
    })?;

    let config = load_config(args.config.as_deref())?;

    // Paths given on the command line are relative to where the user stands
    let from_cwd = |p: &Option<PathBuf>| p.as_ref().map(|p| absolute(&cwd, p));
    let overrides = Overrides {
        verbose: args.verbose,
        no_fail: args.no_fail,
        no_default_matchers: args.no_default_matchers,
        approved_licenses: args.approved.clone(),
        exclude_file: from_cwd(&args.exclude_file),
        stylesheet: from_cwd(&args.stylesheet),
        report_dir: from_cwd(&args.report_dir),
    };

    let settings = config.resolve(&root, &overrides)?;
    let runner = AuditRunner::new(settings)?;
    let outcome = runner.run_discovered()?;

    if !args.quiet {
        let stats = &outcome.statistics;
        match &outcome.verdict {
            Verdict::Pass => println!(
                "Rat audit passed: {} files, {} approved",
                stats.num_total, stats.num_approved
            ),
            Verdict::Fail { unapproved, .. } => println!(
                "Rat audit completed with {} unapproved file(s) out of {}",
                unapproved, stats.num_total
            ),
        }
        println!("Reports written to {}", runner.settings().report_dir.display());
    }

    Ok(())
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
