//! ferrous-lookup domain layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod nameserver;

pub use config::{CliOverrides, ClientConfig, Config, ConfigError, LoggingConfig, NetworkConfig};
pub use dns_record::RecordType;
pub use errors::{rcode_mnemonic, DomainError, ExchangeStage};
pub use nameserver::{Nameserver, DEFAULT_DNS_PORT};
