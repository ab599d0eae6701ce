//! Command implementations

pub mod config;
pub mod run;

use std::path::{Path, PathBuf};

use anfctl_core::Config;

use crate::error::Result;

/// The config file in use: the explicit path if given, else the platform default
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::config_path()?),
    }
}
