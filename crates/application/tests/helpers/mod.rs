#![allow(dead_code)]
pub mod mock_dialer;

pub use mock_dialer::{MockConnection, MockDialer};
