//! Configuration for the lookup client
//!
//! - `root`: main configuration and CLI overrides
//! - `client`: query exchange settings
//! - `network`: connection policy (blocked hostnames, blacklisted IP ranges)
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod client;
pub mod errors;
pub mod logging;
pub mod network;
pub mod root;

pub use client::ClientConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use network::NetworkConfig;
pub use root::{CliOverrides, Config};
