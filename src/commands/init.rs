use anyhow::Result;
use crate::cli::InitPreset;
use rat_audit::config::CONFIG_FILE;
use rat_audit::init;

pub fn handle_init(preset: InitPreset, force: bool, quiet: bool) -> Result<()> {
    let init_preset = match preset {
        InitPreset::Apache => init::InitPreset::Apache,
        InitPreset::Mit => init::InitPreset::Mit,
        InitPreset::Strict => init::InitPreset::Strict,
    };

    init::generate_config(init_preset, force)?;

    if !quiet {
        println!("✅ Wrote {}", CONFIG_FILE);
    }

    Ok(())
}
