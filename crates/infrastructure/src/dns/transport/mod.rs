pub mod udp;

use ferrous_lookup_application::ports::{Connection, Dialer, Network};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::{DomainError, ExchangeStage};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout_at;
use tracing::debug;

pub use udp::{SystemDialer, UdpConnection};

/// Maximum UDP DNS response size with EDNS(0)
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Where the bound dialer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSource {
    /// Supplied by the running execution context.
    Context,
    /// Default system dialer, no connection policy enforced.
    System,
}

impl TransportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportSource::Context => "context",
            TransportSource::System => "system",
        }
    }
}

/// One-datagram query/response exchange over a dialed connection.
pub struct ExchangeTransport {
    dialer: Arc<dyn Dialer>,
    timeout: Duration,
    source: TransportSource,
}

impl ExchangeTransport {
    pub fn with_dialer(dialer: Arc<dyn Dialer>, timeout: Duration) -> Self {
        Self {
            dialer,
            timeout,
            source: TransportSource::Context,
        }
    }

    pub fn system(timeout: Duration) -> Self {
        Self {
            dialer: Arc::new(SystemDialer::new()),
            timeout,
            source: TransportSource::System,
        }
    }

    pub fn source(&self) -> TransportSource {
        self.source
    }

    pub fn check_hostname(&self, hostname: &str) -> Result<(), DomainError> {
        self.dialer.check_hostname(hostname)
    }

    /// Dials `server`, writes `query` and reads back a single datagram.
    ///
    /// The context deadline (or the transport timeout when the context has
    /// none) bounds dial and exchange together. The connection is dropped
    /// before returning on every path.
    pub async fn exchange(
        &self,
        ctx: &RequestContext,
        server: &str,
        query: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let deadline = ctx.deadline_or(self.timeout);
        let cancellation = ctx.cancellation();

        if cancellation.is_cancelled() {
            return Err(DomainError::Cancelled {
                server: server.to_string(),
                stage: ExchangeStage::Dial,
            });
        }

        let conn = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                return Err(DomainError::Cancelled {
                    server: server.to_string(),
                    stage: ExchangeStage::Dial,
                });
            }
            dialed = timeout_at(deadline, self.dialer.dial(ctx, Network::Udp, server)) => {
                match dialed {
                    Ok(conn) => conn?,
                    Err(_) => {
                        return Err(DomainError::Timeout {
                            server: server.to_string(),
                            stage: ExchangeStage::Dial,
                        });
                    }
                }
            }
        };

        debug!(
            server = %server,
            source = self.source.as_str(),
            "Connection dialed"
        );

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(DomainError::Cancelled {
                server: server.to_string(),
                stage: ExchangeStage::Exchange,
            }),
            exchanged = timeout_at(deadline, round_trip(conn.as_ref(), server, query)) => {
                match exchanged {
                    Ok(result) => result,
                    Err(_) => Err(DomainError::Timeout {
                        server: server.to_string(),
                        stage: ExchangeStage::Exchange,
                    }),
                }
            }
        };

        drop(conn);
        result
    }
}

async fn round_trip(
    conn: &dyn Connection,
    server: &str,
    query: &[u8],
) -> Result<Vec<u8>, DomainError> {
    let bytes_sent = conn.send(query).await.map_err(|e| DomainError::Exchange {
        server: server.to_string(),
        reason: format!("write: {}", e),
    })?;

    if bytes_sent != query.len() {
        return Err(DomainError::Exchange {
            server: server.to_string(),
            reason: format!("write: short write ({} of {} bytes)", bytes_sent, query.len()),
        });
    }

    debug!(server = %server, bytes_sent = bytes_sent, "DNS query sent");

    // One spare byte tells a full-size datagram apart from an oversized one.
    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE + 1];
    let bytes_received = conn
        .recv(&mut recv_buf)
        .await
        .map_err(|e| DomainError::Exchange {
            server: server.to_string(),
            reason: format!("read: {}", e),
        })?;

    if bytes_received > MAX_UDP_RESPONSE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "response from {} exceeds {} bytes",
            server, MAX_UDP_RESPONSE_SIZE
        )));
    }

    recv_buf.truncate(bytes_received);

    debug!(
        server = %server,
        bytes_received = bytes_received,
        "DNS response received"
    );

    Ok(recv_buf)
}
