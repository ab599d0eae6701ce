//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Azure NetApp Files pool-change sample
///
/// Creates an account, two capacity pools at different service levels and a
/// volume, then moves the volume from the first pool to the second.
#[derive(Parser, Debug)]
#[command(name = "anfctl", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the config file (defaults to the platform config directory)
    #[arg(long = "config", value_name = "PATH", global = true, env = "ANFCTL_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision resources and perform the pool change
    Run(RunArgs),

    /// Write a config template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    #[command(name = "config-path")]
    ConfigPath,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Delete all created resources after the pool change
    #[arg(long)]
    pub cleanup: bool,

    /// Maximum polling attempts per wait
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds between polling attempts
    #[arg(long)]
    pub interval: Option<u64>,

    /// Management endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Bearer token for the management API
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
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
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "anfctl",
            "-vv",
            "run",
            "--cleanup",
            "--max-attempts",
            "8",
            "--interval",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.cleanup);
                assert_eq!(args.max_attempts, Some(8));
                assert_eq!(args.interval, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_force() {
        let cli = Cli::try_parse_from(["anfctl", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { force: true }));
    }
}
