//! Core library for the `weather-compare` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The JellyFaaS auth and query clients behind narrow traits
//! - The authenticate-then-compare flow and its error taxonomy
//!
//! It is used by `weather-compare-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod flow;
pub mod model;
pub mod service;

pub use config::{Config, Endpoints};
pub use error::{Error, Stage};
pub use flow::{ComparisonFlow, FlowState, NoProgress, Progress, compare_cities};
pub use model::{ComparisonQuery, ComparisonResult, Credential, SessionToken};
pub use service::{Authenticator, Comparator, JellyFaasClient};
