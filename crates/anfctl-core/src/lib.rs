//! # anfctl-core
//!
//! Shared engine for the `anfctl` NetApp Files pool-change sample.
//!
//! ## Layers
//!
//! - [`poller`]: fixed-interval readiness polling. Waits until a resource
//!   exists or is gone, with a bounded number of attempts. Only "not found"
//!   is retried; every other fetch error ends the wait.
//! - [`resource`]: parsed ARM resource ids for accounts, pools and volumes.
//! - [`netapp`]: request/response models, the [`NetAppApi`] trait, the
//!   reqwest-based [`RestClient`], and create/delete/pool-change workflows.
//! - [`config`]: TOML settings with environment variable expansion.
//!
//! ## Example
//!
//! ```rust,ignore
//! use anfctl_core::{Config, ResourcePoller, RestClient, run_sample};
//!
//! let config = Config::load()?;
//! let client = RestClient::new(
//!     &config.api.endpoint,
//!     &config.api.api_version,
//!     config.api.bearer_token().map(str::to_string),
//! )?;
//! let poller = ResourcePoller::new(config.poll.settings());
//! let report = run_sample(&client, &config, &poller, |step| println!("{step:?}")).await?;
//! ```

pub mod config;
pub mod error;
pub mod netapp;
pub mod poller;
pub mod resource;

pub use config::Config;
pub use error::{CoreError, Result};
pub use netapp::{NetAppApi, RestClient, SampleReport, SampleStep, run_sample};
pub use poller::{
    PollCallback, PollEvent, PollOutcome, PollSettings, Presence, ResourcePoller,
    wait_until_absent, wait_until_present,
};
pub use resource::{ResourceHandle, ResourceKind};
