pub mod execution;
pub mod lookup;

pub use execution::VuContext;
pub use lookup::lookup_host;
