mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    debug!("Parsed arguments: {:?}", cli);

    let result = match cli.command {
        Some(Commands::Generate(ref args)) => commands::generate::run(&cli, args.clone()),
        Some(Commands::Resources(ref args)) => {
            commands::generate::run_resources(&cli, args.clone())
        }
        Some(Commands::Aidl(ref args)) => commands::generate::run_aidl(&cli, args.clone()),
        Some(Commands::Init(ref args)) => commands::init::run(&cli, args.clone()),
        Some(Commands::Validate) => commands::validate::run(&cli),
        Some(Commands::Info(ref args)) => commands::info::run(&cli, args.clone()),
        None => commands::generate::run_default(&cli),
    };

    // Errors are reported here and nowhere else.
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-q` and `-v` pick the level.
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
