//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Standard DNS transport. Messages are sent as-is (no framing), one
//! datagram each way. Truncated (TC) responses are not retried over TCP.

use async_trait::async_trait;
use ferrous_lookup_application::ports::{Connection, Dialer, Network};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::DomainError;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// A UDP socket connected to a single peer.
pub struct UdpConnection {
    socket: UdpSocket,
}

impl UdpConnection {
    /// Binds an ephemeral port of the peer's address family and connects it.
    pub async fn connect(peer: SocketAddr) -> io::Result<Self> {
        let bind_addr = if peer.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(peer).await?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl Connection for UdpConnection {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf).await
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv(buf).await
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

/// Dials straight through the host network stack with no policy applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDialer;

impl SystemDialer {
    pub fn new() -> Self {
        Self
    }

    async fn resolve_target(addr: &str) -> Result<Vec<SocketAddr>, DomainError> {
        if let Ok(sock) = addr.parse::<SocketAddr>() {
            return Ok(vec![sock]);
        }

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(addr)
            .await
            .map_err(|e| DomainError::Dial {
                server: addr.to_string(),
                reason: format!("lookup failed: {}", e),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(DomainError::Dial {
                server: addr.to_string(),
                reason: "no addresses found".to_string(),
            });
        }

        Ok(addrs)
    }
}

#[async_trait]
impl Dialer for SystemDialer {
    async fn dial(
        &self,
        _ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        match network {
            Network::Udp => {}
            other => {
                return Err(DomainError::Dial {
                    server: addr.to_string(),
                    reason: format!("unsupported network '{}'", other),
                })
            }
        }

        let candidates = Self::resolve_target(addr).await?;

        let mut last_err = None;
        for peer in candidates {
            match UdpConnection::connect(peer).await {
                Ok(conn) => {
                    debug!(
                        server = %addr,
                        peer = %peer,
                        "UDP connection established"
                    );
                    return Ok(Box::new(conn));
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(DomainError::Dial {
            server: addr.to_string(),
            reason: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no usable address".to_string()),
        })
    }
}
