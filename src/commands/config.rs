use anyhow::{Context, Result};
use std::path::PathBuf;
use rat_audit::config::{load_config, Overrides};
use rat_audit::error::AuditError;

pub fn handle_config(path: Option<PathBuf>, show: bool, validate: bool, quiet: bool) -> Result<()> {
    if !show && !validate {
        return Err(AuditError::config("Use --show or --validate").into());
    }

    let config = load_config(path.as_deref())?;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let settings = config.resolve(&cwd, &Overrides::default())?;

    if show && !quiet {
        println!(
            "{}",
            serde_json::to_string_pretty(&settings).context("Failed to serialize configuration")?
        );
    }

    if validate && !quiet {
        println!("✅ Configuration is valid");
    }

    Ok(())
}
