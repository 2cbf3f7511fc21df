use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::{ExchangeTransport, TransportSource};
use crate::system::lookup::lookup_host;
use async_trait::async_trait;
use ferrous_lookup_application::ports::{ExecutionContext, Lookuper, Resolver};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::{ClientConfig, DomainError, Nameserver, RecordType};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Default deadline applied when the request context carries none.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// DNS client resolving against one explicitly chosen nameserver per call.
///
/// The transport is bound on first use from the execution context and
/// reused for the life of the client.
pub struct DnsClient {
    execution: Arc<dyn ExecutionContext>,
    transport: OnceLock<ExchangeTransport>,
    timeout: Duration,
}

impl DnsClient {
    pub fn new(execution: Arc<dyn ExecutionContext>) -> Self {
        Self::with_timeout(execution, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(execution: Arc<dyn ExecutionContext>, timeout: Duration) -> Self {
        Self {
            execution,
            transport: OnceLock::new(),
            timeout,
        }
    }

    pub fn from_config(execution: Arc<dyn ExecutionContext>, config: &ClientConfig) -> Self {
        Self::with_timeout(execution, config.timeout())
    }

    /// Source of the bound transport, `None` until the first resolve.
    pub fn transport_source(&self) -> Option<TransportSource> {
        self.transport.get().map(ExchangeTransport::source)
    }

    fn bind_transport(&self) -> Result<&ExchangeTransport, DomainError> {
        if let Some(transport) = self.transport.get() {
            return Ok(transport);
        }

        let state = self.execution.state().ok_or(DomainError::InitContext)?;

        Ok(self.transport.get_or_init(|| match state.dialer {
            Some(dialer) => {
                debug!(timeout = ?self.timeout, "Binding DNS transport to context dialer");
                ExchangeTransport::with_dialer(dialer, self.timeout)
            }
            None => {
                warn!(
                    timeout = ?self.timeout,
                    "No dialer in execution context, binding system transport; \
                     blocked hostnames and blacklisted IPs are not enforced"
                );
                ExchangeTransport::system(self.timeout)
            }
        }))
    }
}

#[async_trait]
impl Resolver for DnsClient {
    async fn resolve(
        &self,
        ctx: &RequestContext,
        query: &str,
        record_type: &str,
        nameserver: &str,
    ) -> Result<Vec<String>, DomainError> {
        let transport = self.bind_transport()?;

        let record_type: RecordType = record_type.parse()?;
        let nameserver = Nameserver::parse(nameserver)?;
        transport.check_hostname(query)?;

        let (query_id, request) = MessageBuilder::build_query_with_id(query, record_type)?;
        let server = nameserver.endpoint();

        debug!(
            query = %query,
            record_type = %record_type,
            server = %server,
            id = query_id,
            "Resolving"
        );

        let reply = transport.exchange(ctx, &server, &request).await?;
        let response = ResponseParser::parse(&reply)?;

        if response.id != query_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {}",
                response.id, query_id
            )));
        }

        response.ensure_success(query)?;
        let addresses = response.addresses(record_type)?;

        debug!(
            query = %query,
            record_type = %record_type,
            answers = addresses.len(),
            "Resolved"
        );

        Ok(addresses)
    }
}

#[async_trait]
impl Lookuper for DnsClient {
    async fn lookup(
        &self,
        ctx: &RequestContext,
        hostname: &str,
    ) -> Result<Vec<String>, DomainError> {
        let state = self.execution.state().ok_or(DomainError::InitContext)?;
        let dialer = state
            .dialer
            .ok_or_else(|| DomainError::NoDialer(hostname.to_string()))?;

        dialer.check_hostname(hostname)?;

        let ips = lookup_host(ctx, hostname, self.timeout).await?;
        for ip in &ips {
            dialer.check_address(*ip)?;
        }

        debug!(hostname = %hostname, answers = ips.len(), "System lookup complete");

        Ok(ips.into_iter().map(|ip| ip.to_string()).collect())
    }
}
