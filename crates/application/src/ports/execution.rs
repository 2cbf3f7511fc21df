use super::Dialer;
use std::sync::Arc;

/// What the embedding runtime exposes once it is executing.
#[derive(Clone, Default)]
pub struct ExecutionState {
    pub dialer: Option<Arc<dyn Dialer>>,
}

impl ExecutionState {
    pub fn with_dialer(dialer: Arc<dyn Dialer>) -> Self {
        Self {
            dialer: Some(dialer),
        }
    }
}

impl std::fmt::Debug for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionState")
            .field("dialer", &self.dialer.is_some())
            .finish()
    }
}

pub trait ExecutionContext: Send + Sync {
    /// `None` while the runtime is still in its init phase.
    fn state(&self) -> Option<ExecutionState>;
}
