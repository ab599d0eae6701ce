//! Configuration for the pool-change sample
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! Settings live in a TOML file with `${VAR}` / `${VAR:-default}` environment
//! expansion, so the access token and ids can come from the environment.

pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, PollConfig, PoolConfig};
pub use error::{ConfigError, Result};
