//! Command-line interface definitions for droidgen.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// droidgen - generates R.java and aidl stubs for Android projects
#[derive(Parser, Debug)]
#[command(name = "droidgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to droidgen.toml configuration file
    #[arg(short, long, global = true, env = "DROIDGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run resource and aidl generation (default)
    Generate(GenerateArgs),

    /// Generate R.java with aapt only
    Resources(TaskArgs),

    /// Generate interface stubs with aidl only
    Aidl(TaskArgs),

    /// Initialize a new droidgen.toml configuration file
    Init(InitArgs),

    /// Validate configuration, inputs and tool availability
    Validate,

    /// Display the resolved configuration and discovered inputs
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Skip resource (R.java) generation
    #[arg(long)]
    pub skip_resources: bool,

    /// Skip aidl stub generation
    #[arg(long)]
    pub skip_aidl: bool,

    /// Attempt every task even if one fails, then report all failures
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub task: TaskArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    /// Do not delete previously generated files before regenerating
    #[arg(long)]
    pub keep_conflicting: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing droidgen.toml if present
    #[arg(short, long)]
    pub force: bool,

    /// Initialize with minimal configuration
    #[arg(long)]
    pub minimal: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: InfoFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InfoFormat {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["droidgen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "droidgen",
            "-vv",
            "generate",
            "--skip-aidl",
            "--keep-going",
            "--keep-conflicting",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert!(args.skip_aidl);
                assert!(!args.skip_resources);
                assert!(args.keep_going);
                assert!(args.task.keep_conflicting);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_info_format() {
        let cli = Cli::try_parse_from(["droidgen", "info", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Info(InfoArgs {
                format: InfoFormat::Json
            }))
        ));
    }
}
