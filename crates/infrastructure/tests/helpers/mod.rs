#![allow(dead_code)]
pub mod dialers;
pub mod dns_server_mock;

pub use dialers::{CountingDialer, RecordingDialer, StallingDialer};
pub use dns_server_mock::{Behaviour, MockDnsServer, MockZone};

use ferrous_lookup_application::ports::{Dialer, ExecutionState};
use ferrous_lookup_infrastructure::system::VuContext;
use std::net::{Ipv6Addr, SocketAddr};
use std::sync::Arc;

/// Running execution context whose dialer is `dialer`.
pub fn running_with(dialer: Arc<dyn Dialer>) -> Arc<VuContext> {
    Arc::new(VuContext::running(ExecutionState::with_dialer(dialer)))
}

/// Whether the loopback IPv6 address can be bound on this host.
pub fn ipv6_available() -> bool {
    std::net::UdpSocket::bind(SocketAddr::from((Ipv6Addr::LOCALHOST, 0))).is_ok()
}
