use super::{HostnameTrie, IpBlacklist};
use crate::dns::transport::SystemDialer;
use async_trait::async_trait;
use ferrous_lookup_application::ports::{Connection, Dialer, Network};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::{ConfigError, DomainError, NetworkConfig};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, info};

/// Dialer enforcing blocked hostnames and blacklisted IP ranges before
/// handing the connection to an inner dialer.
pub struct PolicyDialer {
    inner: Arc<dyn Dialer>,
    blocked_hostnames: HostnameTrie,
    blacklist: IpBlacklist,
}

impl PolicyDialer {
    pub fn new(
        inner: Arc<dyn Dialer>,
        blocked_hostnames: HostnameTrie,
        blacklist: IpBlacklist,
    ) -> Self {
        Self {
            inner,
            blocked_hostnames,
            blacklist,
        }
    }

    /// Policy dialer over the system dialer.
    pub fn from_config(config: &NetworkConfig) -> Result<Self, ConfigError> {
        Self::with_inner(Arc::new(SystemDialer::new()), config)
    }

    pub fn with_inner(
        inner: Arc<dyn Dialer>,
        config: &NetworkConfig,
    ) -> Result<Self, ConfigError> {
        let blocked_hostnames =
            HostnameTrie::from_patterns(&config.block_hostnames).map_err(ConfigError::Validation)?;
        let blacklist =
            IpBlacklist::from_cidrs(&config.blacklist_ips).map_err(ConfigError::Validation)?;

        info!(
            blocked_hostnames = blocked_hostnames.len(),
            blacklisted_ranges = blacklist.len(),
            "Connection policy loaded"
        );

        Ok(Self::new(inner, blocked_hostnames, blacklist))
    }

    fn check_target(&self, server: &str, ip: IpAddr) -> Result<(), DomainError> {
        match self.blacklist.find(ip) {
            Some(network) => {
                debug!(server = %server, ip = %ip, network = %network, "Dial refused");
                Err(DomainError::BlacklistedAddress {
                    server: server.to_string(),
                    ip,
                    network: network.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Resolves `addr` to socket addresses. A hostname target is checked
    /// against the blocked patterns before it is looked up.
    async fn resolve_target(&self, addr: &str) -> Result<Vec<SocketAddr>, DomainError> {
        if let Ok(sock) = addr.parse::<SocketAddr>() {
            return Ok(vec![sock]);
        }

        let (host, _port) = split_host_port(addr).ok_or_else(|| DomainError::Dial {
            server: addr.to_string(),
            reason: "missing port in address".to_string(),
        })?;

        self.check_hostname(host)?;

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
impl Dialer for PolicyDialer {
    async fn dial(
        &self,
        ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        let candidates = self.resolve_target(addr).await?;
        for peer in &candidates {
            self.check_target(addr, peer.ip())?;
        }

        // The inner dialer only ever sees addresses checked above.
        let mut last_err = None;
        for peer in candidates {
            match self.inner.dial(ctx, network, &peer.to_string()).await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    debug!(server = %addr, peer = %peer, error = %e, "Dial attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| DomainError::Dial {
            server: addr.to_string(),
            reason: "no usable address".to_string(),
        }))
    }

    fn check_hostname(&self, hostname: &str) -> Result<(), DomainError> {
        match self.blocked_hostnames.find(hostname) {
            Some(pattern) => Err(DomainError::BlockedHostname {
                hostname: hostname.to_string(),
                pattern: pattern.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn check_address(&self, ip: IpAddr) -> Result<(), DomainError> {
        self.check_target(&ip.to_string(), ip)
    }
}

fn split_host_port(addr: &str) -> Option<(&str, &str)> {
    let (host, port) = addr.rsplit_once(':')?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    Some((host, port))
}
