//! Nameserver addresses.
//!
//! Accepted forms:
//! - `[2001:db8::1]:5353` / `[2001:db8::1]`
//! - `192.0.2.1:5353` / `192.0.2.1`
//! - `2001:db8::1` (bare IPv6, never split: the port is always 53)
//!
//! A bracket-free address with two or more colons is always read as a bare
//! IPv6 literal. Appending a port to it (`::1:5353`) either yields a
//! different, still valid IPv6 address or fails to parse; use brackets.

use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nameserver {
    ip: IpAddr,
    port: u16,
}

impl Nameserver {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    pub fn parse(addr: &str) -> Result<Self, DomainError> {
        if let Some(rest) = addr.strip_prefix('[') {
            return parse_bracketed(addr, rest);
        }

        if addr.contains(']') {
            return Err(DomainError::invalid_nameserver(
                addr,
                "unexpected ']' without opening bracket",
            ));
        }

        match addr.matches(':').count() {
            0 => {
                let ip = parse_ipv4(addr, addr)?;
                Ok(Self::new(IpAddr::V4(ip), DEFAULT_DNS_PORT))
            }
            1 => {
                let (host, port) = addr
                    .split_once(':')
                    .ok_or_else(|| DomainError::invalid_nameserver(addr, "missing port"))?;
                let ip = parse_ipv4(addr, host)?;
                let port = parse_port(addr, port)?;
                Ok(Self::new(IpAddr::V4(ip), port))
            }
            _ => {
                let ip = addr.parse::<Ipv6Addr>().map_err(|_| {
                    DomainError::invalid_nameserver(
                        addr,
                        "not a valid IPv6 address (use [ip]:port to give an IPv6 nameserver a port)",
                    )
                })?;
                Ok(Self::new(IpAddr::V6(ip), DEFAULT_DNS_PORT))
            }
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// `host:port` endpoint, IPv6 hosts bracketed.
    pub fn endpoint(&self) -> String {
        self.socket_addr().to_string()
    }
}

fn parse_bracketed(addr: &str, rest: &str) -> Result<Nameserver, DomainError> {
    let (host, tail) = rest
        .split_once(']')
        .ok_or_else(|| DomainError::invalid_nameserver(addr, "missing closing bracket"))?;

    let ip = host.parse::<Ipv6Addr>().map_err(|_| {
        DomainError::invalid_nameserver(addr, format!("'{}' is not a valid IPv6 address", host))
    })?;

    let port = if tail.is_empty() {
        DEFAULT_DNS_PORT
    } else {
        let port = tail.strip_prefix(':').ok_or_else(|| {
            DomainError::invalid_nameserver(addr, "expected ':' after closing bracket")
        })?;
        parse_port(addr, port)?
    };

    Ok(Nameserver::new(IpAddr::V6(ip), port))
}

fn parse_ipv4(addr: &str, host: &str) -> Result<Ipv4Addr, DomainError> {
    host.parse::<Ipv4Addr>().map_err(|_| {
        DomainError::invalid_nameserver(addr, format!("'{}' is not a valid IPv4 address", host))
    })
}

fn parse_port(addr: &str, port: &str) -> Result<u16, DomainError> {
    if port.is_empty() {
        return Err(DomainError::invalid_nameserver(addr, "missing port"));
    }
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::invalid_nameserver(
            addr,
            format!("invalid port '{}': not a decimal number", port),
        ));
    }
    port.parse::<u16>().map_err(|e| {
        DomainError::invalid_nameserver(addr, format!("invalid port '{}': {}", port, e))
    })
}

impl FromStr for Nameserver {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nameserver::parse(s)
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

impl From<SocketAddr> for Nameserver {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}
