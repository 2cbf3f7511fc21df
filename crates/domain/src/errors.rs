use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

/// Point of a query exchange at which a transport error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeStage {
    /// Connection was never established.
    Dial,
    /// Connected, but the write/read round trip failed.
    Exchange,
}

impl ExchangeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeStage::Dial => "dial",
            ExchangeStage::Exchange => "exchange",
        }
    }
}

impl fmt::Display for ExchangeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid nameserver address '{addr}': {reason}")]
    InvalidNameserver { addr: String, reason: String },

    #[error("unsupported record type: {0}")]
    UnsupportedRecordType(String),

    #[error("invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("non-existing domain: {0}")]
    NxDomain(String),

    #[error("DNS query for {name} failed with response code {rcode} ({})", mnemonic_of(.rcode))]
    QueryFailed { name: String, rcode: u16 },

    #[error("unsupported answer type in DNS response: {0}")]
    UnsupportedAnswerType(String),

    #[error("invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("hostname ({hostname}) is in a blocked pattern ({pattern})")]
    BlockedHostname { hostname: String, pattern: String },

    #[error("dial {server}: IP ({ip}) is in a blacklisted range ({network})")]
    BlacklistedAddress {
        server: String,
        ip: IpAddr,
        network: String,
    },

    #[error("dial {server}: {reason}")]
    Dial { server: String, reason: String },

    #[error("exchange with {server} failed: {reason}")]
    Exchange { server: String, reason: String },

    #[error("{stage} with {server} timed out")]
    Timeout { server: String, stage: ExchangeStage },

    #[error("{stage} with {server} cancelled")]
    Cancelled { server: String, stage: ExchangeStage },

    #[error("lookup of {hostname} failed: {reason}")]
    LookupFailed { hostname: String, reason: String },

    #[error("no dialer available: {0}")]
    NoDialer(String),

    #[error("using DNS in the init context is not supported")]
    InitContext,
}

impl DomainError {
    pub fn invalid_nameserver(addr: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidNameserver {
            addr: addr.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable name callers branch on, independent of the message text.
    pub fn name(&self) -> &'static str {
        match self {
            DomainError::InvalidNameserver { .. } => "InvalidNameserver",
            DomainError::UnsupportedRecordType(_) => "UnsupportedRecordType",
            DomainError::InvalidDomainName(_) => "InvalidDomainName",
            DomainError::NxDomain(_) => "NonExistingDomain",
            DomainError::QueryFailed { rcode, .. } => rcode_error_name(*rcode),
            DomainError::UnsupportedAnswerType(_) => "UnsupportedAnswerType",
            DomainError::InvalidDnsResponse(_) => "InvalidResponse",
            DomainError::BlockedHostname { .. } => "BlockedHostname",
            DomainError::BlacklistedAddress { .. } => "BlacklistedIP",
            DomainError::Dial { .. } => "DialError",
            DomainError::Exchange { .. } => "ExchangeError",
            DomainError::Timeout { .. } => "TimeoutError",
            DomainError::Cancelled { .. } => "CancelledError",
            DomainError::LookupFailed { .. } => "LookupError",
            DomainError::NoDialer(_) => "NoDialer",
            DomainError::InitContext => "InitContextError",
        }
    }

    /// Transport stage for connection-level failures, `None` otherwise.
    pub fn stage(&self) -> Option<ExchangeStage> {
        match self {
            DomainError::Dial { .. } | DomainError::BlacklistedAddress { .. } => {
                Some(ExchangeStage::Dial)
            }
            DomainError::Exchange { .. } => Some(ExchangeStage::Exchange),
            DomainError::Timeout { stage, .. } | DomainError::Cancelled { stage, .. } => {
                Some(*stage)
            }
            _ => None,
        }
    }

    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::BlockedHostname { .. } | DomainError::BlacklistedAddress { .. }
        )
    }

    pub fn is_nxdomain(&self) -> bool {
        matches!(self, DomainError::NxDomain(_))
    }
}

/// RFC 1035 / RFC 2136 response code mnemonic.
pub fn rcode_mnemonic(rcode: u16) -> &'static str {
    match rcode {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        _ => "UNKNOWN",
    }
}

fn mnemonic_of(rcode: &u16) -> &'static str {
    rcode_mnemonic(*rcode)
}

fn rcode_error_name(rcode: u16) -> &'static str {
    match rcode {
        1 => "FormatError",
        2 => "ServerFailure",
        3 => "NonExistingDomain",
        4 => "NotImplemented",
        5 => "Refused",
        _ => "QueryFailed",
    }
}
