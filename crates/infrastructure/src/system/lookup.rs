use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::{DomainError, ExchangeStage};
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout_at;
use tracing::debug;

/// Resolves a hostname through the host's resolver configuration.
///
/// IP literals are returned as-is. Addresses keep the resolver's order with
/// duplicates removed.
///
/// No connection is made on this path. A timeout or cancellation is still
/// reported with the `exchange` stage marker.
pub async fn lookup_host(
    ctx: &RequestContext,
    hostname: &str,
    timeout: Duration,
) -> Result<Vec<IpAddr>, DomainError> {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let deadline = ctx.deadline_or(timeout);
    let cancellation = ctx.cancellation();

    let resolved = tokio::select! {
        biased;
        _ = cancellation.cancelled() => {
            return Err(DomainError::Cancelled {
                server: hostname.to_string(),
                stage: ExchangeStage::Exchange,
            });
        }
        resolved = timeout_at(deadline, tokio::net::lookup_host((hostname, 0))) => {
            resolved.map_err(|_| DomainError::Timeout {
                server: hostname.to_string(),
                stage: ExchangeStage::Exchange,
            })?
        }
    };

    let addrs = resolved.map_err(|e| DomainError::LookupFailed {
        hostname: hostname.to_string(),
        reason: e.to_string(),
    })?;

    let mut ips: Vec<IpAddr> = Vec::new();
    for addr in addrs {
        if !ips.contains(&addr.ip()) {
            ips.push(addr.ip());
        }
    }

    if ips.is_empty() {
        return Err(DomainError::LookupFailed {
            hostname: hostname.to_string(),
            reason: "no addresses found".to_string(),
        });
    }

    debug!(hostname = %hostname, addresses = ips.len(), "Host lookup complete");

    Ok(ips)
}
