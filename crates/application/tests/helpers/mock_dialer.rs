use async_trait::async_trait;
use ferrous_lookup_application::ports::{Connection, Dialer, Network};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Connection that records what was sent and replies with a fixed payload.
pub struct MockConnection {
    peer: SocketAddr,
    reply: Vec<u8>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockConnection {
    pub fn new(peer: SocketAddr, reply: Vec<u8>) -> Self {
        Self {
            peer,
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.sent.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reply.len().min(buf.len());
        buf[..n].copy_from_slice(&self.reply[..n]);
        Ok(n)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        Ok(self.peer)
    }
}

/// Dialer that records every target and hands out `MockConnection`s.
#[derive(Default)]
pub struct MockDialer {
    dialed: Mutex<Vec<(Network, String)>>,
    reply: Vec<u8>,
}

impl MockDialer {
    pub fn replying(reply: &[u8]) -> Self {
        Self {
            dialed: Mutex::new(Vec::new()),
            reply: reply.to_vec(),
        }
    }

    pub fn dialed(&self) -> Vec<(Network, String)> {
        self.dialed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(
        &self,
        ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        if ctx.is_cancelled() {
            return Err(DomainError::Dial {
                server: addr.to_string(),
                reason: "cancelled".to_string(),
            });
        }

        let peer = addr.parse().map_err(|_| DomainError::Dial {
            server: addr.to_string(),
            reason: "mock dialer accepts socket addresses only".to_string(),
        })?;

        self.dialed.lock().unwrap().push((network, addr.to_string()));
        Ok(Box::new(MockConnection::new(peer, self.reply.clone())))
    }
}
