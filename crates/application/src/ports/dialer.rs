use crate::RequestContext;
use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;
use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};

/// Network kind requested from a dialer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Network {
    Udp,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Udp => "udp",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connected datagram socket. Dropping it closes the connection.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn send(&self, buf: &[u8]) -> io::Result<usize>;

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

/// Dial capability supplied by the embedding environment.
///
/// Connection-level policy lives here: a dialer may refuse a target with
/// `DomainError::BlockedHostname` or `DomainError::BlacklistedAddress`, and
/// callers pass those errors through untouched.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(
        &self,
        ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError>;

    /// Rejects hostnames this dialer would refuse to connect to.
    fn check_hostname(&self, _hostname: &str) -> Result<(), DomainError> {
        Ok(())
    }

    /// Rejects addresses this dialer would refuse to connect to.
    fn check_address(&self, _ip: IpAddr) -> Result<(), DomainError> {
        Ok(())
    }
}
