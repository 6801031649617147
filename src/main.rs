use clap::Parser;
use rat_audit::{logging, AuditError, ExitCode};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet) {
        eprintln!("{:#}", e);
    }

    let result = match cli.command {
        Commands::Check {
            path,
            config,
            exclude_file,
            stylesheet,
            report_dir,
            approved,
            no_default_matchers,
            no_fail,
        } => commands::handle_check(commands::CheckArgs {
            path,
            config,
            exclude_file,
            stylesheet,
            report_dir,
            approved,
            no_default_matchers,
            no_fail,
            verbose: cli.verbose,
            quiet: cli.quiet,
        }),
        Commands::Init { preset, force } => commands::handle_init(preset, force, cli.quiet),
        Commands::Config {
            config,
            show,
            validate,
        } => commands::handle_config(config, show, validate, cli.quiet),
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<AuditError>() {
            Some(audit_err) if matches!(audit_err, AuditError::AuditFailure { .. }) => {
                // The verdict message is the whole story
                eprintln!("{}", audit_err);
                ExitCode::from(audit_err)
            }
            Some(audit_err) => {
                eprintln!("Error: {:#}", err);
                if let AuditError::Configuration { path: Some(path), .. } = audit_err {
                    eprintln!("  in {}", path.display());
                }
                ExitCode::from(audit_err)
            }
            None => {
                eprintln!("Error: {:#}", err);
                ExitCode::InternalError
            }
        };
        std::process::exit(code as i32);
    }
}
