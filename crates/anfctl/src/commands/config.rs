//! `init` and `config-path`

use std::path::Path;

use anfctl_core::Config;
use tracing::info;

use super::resolve_config_path;
use crate::console::Console;
use crate::error::{AnfCtlError, Result};

pub fn handle_config_path(explicit: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(explicit)?;
    println!("{}", path.display());
    Ok(())
}

/// Write the config template, refusing to clobber an existing file unless forced
pub fn handle_init(explicit: Option<&Path>, force: bool, console: &Console) -> Result<()> {
    let path = resolve_config_path(explicit)?;

    if path.exists() && !force {
        return Err(AnfCtlError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    Config::template().save_to_path(&path)?;
    info!("Wrote config template to {:?}", path);

    console.message(&format!("Config template written to {}", path.display()));
    console.message("Fill in subscription_id, resource_group and subnet_id before running");
    Ok(())
}
