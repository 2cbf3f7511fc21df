use async_trait::async_trait;
use ferrous_lookup_application::ports::{Connection, Dialer, Network};
use ferrous_lookup_application::RequestContext;
use ferrous_lookup_domain::DomainError;
use ferrous_lookup_infrastructure::dns::SystemDialer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// System dialer that counts how often it was asked to dial.
#[derive(Default)]
pub struct CountingDialer {
    dials: AtomicUsize,
    inner: SystemDialer,
}

impl CountingDialer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn dials(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Dialer for CountingDialer {
    async fn dial(
        &self,
        ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        self.inner.dial(ctx, network, addr).await
    }
}

/// System dialer that keeps every address it was asked to dial.
#[derive(Default)]
pub struct RecordingDialer {
    targets: Mutex<Vec<String>>,
    inner: SystemDialer,
}

impl RecordingDialer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dialer for RecordingDialer {
    async fn dial(
        &self,
        ctx: &RequestContext,
        network: Network,
        addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        self.targets.lock().unwrap().push(addr.to_string());
        self.inner.dial(ctx, network, addr).await
    }
}

/// Dialer that never completes.
pub struct StallingDialer;

#[async_trait]
impl Dialer for StallingDialer {
    async fn dial(
        &self,
        _ctx: &RequestContext,
        _network: Network,
        _addr: &str,
    ) -> Result<Box<dyn Connection>, DomainError> {
        std::future::pending().await
    }
}
