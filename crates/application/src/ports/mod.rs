mod dialer;
mod dns_resolver;
mod execution;

pub use dialer::{Connection, Dialer, Network};
pub use dns_resolver::{Lookuper, Resolver};
pub use execution::{ExecutionContext, ExecutionState};

// Re-export for convenience
pub use ferrous_lookup_domain::{DomainError, Nameserver, RecordType};
