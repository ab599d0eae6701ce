//! NetApp Files management: models, API seam, REST client and workflows
//!
//! Workflows are written against the [`NetAppApi`] trait. [`RestClient`] is
//! the production implementation; tests plug in fakes.

pub mod api;
pub mod models;
pub mod rest;
pub mod sample;
pub mod workflows;

pub use api::NetAppApi;
pub use models::*;
pub use rest::RestClient;
pub use sample::{SampleReport, SampleStep, run_sample};
pub use workflows::*;
