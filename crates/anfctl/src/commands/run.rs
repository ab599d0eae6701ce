//! `run`: provision, change pool, optionally clean up

use std::path::Path;

use anfctl_core::{Config, ResourcePoller, RestClient, SampleReport, run_sample};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::resolve_config_path;
use crate::cli::RunArgs;
use crate::console::Console;
use crate::error::Result;

pub async fn handle_run(
    explicit: Option<&Path>,
    args: &RunArgs,
    console: &Console,
) -> Result<SampleReport> {
    let path = resolve_config_path(explicit)?;
    debug!("Loading config from {:?}", path);
    let mut config = Config::load_from_path(&path)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let token = config.api.bearer_token().map(str::to_string);
    if token.is_none() {
        warn!("No bearer token configured; requests will be sent unauthenticated");
    }
    let client = RestClient::new(&config.api.endpoint, &config.api.api_version, token)?;
    info!("Using endpoint {}", client.endpoint());

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling the current wait");
                cancel.cancel();
            }
        }
    });

    let poller = ResourcePoller::new(config.poll.settings())
        .with_cancellation(cancel)
        .with_progress(console.poll_callback());

    console.header("Azure NetApp Files pool change");
    let result = run_sample(&client, &config, &poller, |step| console.step(&step)).await;
    interrupt.abort();

    let report = result?;
    console.message(&format!("Volume is now at {}", report.volume));
    if !report.cleaned_up {
        console.message("Resources were left in place; pass --cleanup to delete them");
    }
    Ok(report)
}

/// Command-line flags win over the config file
fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if args.cleanup {
        config.cleanup = true;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.poll.max_attempts = max_attempts;
    }
    if let Some(interval) = args.interval {
        config.poll.interval_secs = interval;
    }
    if let Some(endpoint) = &args.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(token) = &args.token {
        config.api.token = Some(token.clone());
    }

    let settings = config.poll.settings();
    debug!(
        "Polling up to {} times, {:?} apart",
        settings.attempts(),
        settings.interval
    );
}
