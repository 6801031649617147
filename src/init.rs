use std::fs;
use std::path::Path;
use crate::config::{parse_config, CONFIG_FILE};
use crate::error::{AuditError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPreset {
    Apache,
    Mit,
    Strict,
}

pub fn generate_config(preset: InitPreset, force: bool) -> Result<()> {
    generate_config_at_path(CONFIG_FILE, preset, force)
}

pub fn generate_config_at_path<P: AsRef<Path>>(path: P, preset: InitPreset, force: bool) -> Result<()> {
    let config_path = path.as_ref();

    if config_path.exists() && !force {
        return Err(AuditError::config_at(
            format!(
                "{} already exists. Use --force to overwrite it.",
                config_path.display()
            ),
            config_path,
        ));
    }

    let content = get_preset_config(preset);
    parse_config(content)?;
    fs::write(config_path, content).map_err(|e| AuditError::io(config_path, e))?;

    Ok(())
}

fn get_preset_config(preset: InitPreset) -> &'static str {
    match preset {
        InitPreset::Apache => include_str!("../presets/apache.toml"),
        InitPreset::Mit => include_str!("../presets/mit.toml"),
        InitPreset::Strict => include_str!("../presets/strict.toml"),
    }
}
