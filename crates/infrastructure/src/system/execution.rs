use arc_swap::ArcSwap;
use ferrous_lookup_application::ports::{Dialer, ExecutionContext, ExecutionState};
use std::sync::Arc;
use tracing::info;

/// Execution context whose phase can be switched at runtime.
///
/// Starts in the init phase (no state) and moves to running once the
/// embedding runtime hands over its capabilities.
pub struct VuContext {
    state: ArcSwap<Option<ExecutionState>>,
}

impl VuContext {
    pub fn init() -> Self {
        Self {
            state: ArcSwap::from_pointee(None),
        }
    }

    pub fn running(state: ExecutionState) -> Self {
        Self {
            state: ArcSwap::from_pointee(Some(state)),
        }
    }

    /// Running context whose connections go through `dialer`.
    pub fn with_dialer(dialer: Arc<dyn Dialer>) -> Self {
        Self::running(ExecutionState::with_dialer(dialer))
    }

    pub fn move_to_running(&self, state: ExecutionState) {
        info!(dialer = state.dialer.is_some(), "Execution context running");
        self.state.store(Arc::new(Some(state)));
    }

    pub fn is_running(&self) -> bool {
        self.state.load().is_some()
    }
}

impl ExecutionContext for VuContext {
    fn state(&self) -> Option<ExecutionState> {
        let guard = self.state.load();
        (**guard).clone()
    }
}
