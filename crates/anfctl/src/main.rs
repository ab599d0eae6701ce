use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, trace};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod commands;
mod console;
mod error;

use cli::{Cli, Commands};
use console::Console;
use error::AnfCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    let console = Console::new();
    if let Err(e) = execute_command(&cli, &console).await {
        e.report(&console);
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "anfctl=warn,anfctl_core=warn",
            1 => "anfctl=info,anfctl_core=info",
            2 => "anfctl=debug,anfctl_core=debug",
            _ => "anfctl=trace,anfctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, console: &Console) -> Result<(), AnfCtlError> {
    trace!("Executing command: {:?}", cli.command);

    let config_file = cli.config_file.as_deref();
    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Run(args) => commands::run::handle_run(config_file, args, console)
            .await
            .map(|_| ()),
        Commands::Init { force } => commands::config::handle_init(config_file, *force, console),
        Commands::ConfigPath => commands::config::handle_config_path(config_file),
    };

    info!("Command finished in {:?}", start.elapsed());
    result
}
