use crate::RequestContext;
use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;

/// Resolves a name against one explicitly chosen nameserver.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the textual addresses from the answer section, in server order.
    async fn resolve(
        &self,
        ctx: &RequestContext,
        query: &str,
        record_type: &str,
        nameserver: &str,
    ) -> Result<Vec<String>, DomainError>;
}

/// Resolves a hostname through the host's default resolver configuration.
#[async_trait]
pub trait Lookuper: Send + Sync {
    async fn lookup(&self, ctx: &RequestContext, hostname: &str)
        -> Result<Vec<String>, DomainError>;
}
