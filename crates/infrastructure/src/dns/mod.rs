pub mod client;
pub mod forwarding;
pub mod transport;

pub use client::{DnsClient, DEFAULT_QUERY_TIMEOUT};
pub use forwarding::{DnsResponse, MessageBuilder, RecordTypeMapper, ResponseParser};
pub use transport::{ExchangeTransport, SystemDialer, TransportSource, UdpConnection};
