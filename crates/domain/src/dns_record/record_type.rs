use crate::DomainError;
use std::fmt;
use std::str::FromStr;

/// Record types this client can query and decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    A,
    AAAA,
}

/// (type, canonical name, IANA wire code). Adding a type is one row here
/// plus its answer decoding.
const RECORD_TYPES: &[(RecordType, &str, u16)] =
    &[(RecordType::A, "A", 1), (RecordType::AAAA, "AAAA", 28)];

impl RecordType {
    pub fn all() -> impl Iterator<Item = RecordType> {
        RECORD_TYPES.iter().map(|(rt, _, _)| *rt)
    }

    pub fn as_str(&self) -> &'static str {
        RECORD_TYPES
            .iter()
            .find(|(rt, _, _)| rt == self)
            .map(|(_, name, _)| *name)
            .unwrap_or_default()
    }

    pub fn to_u16(&self) -> u16 {
        RECORD_TYPES
            .iter()
            .find(|(rt, _, _)| rt == self)
            .map(|(_, _, code)| *code)
            .unwrap_or_default()
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        RECORD_TYPES
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(rt, _, _)| *rt)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RECORD_TYPES
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s))
            .map(|(rt, _, _)| *rt)
            .ok_or_else(|| DomainError::UnsupportedRecordType(s.to_string()))
    }
}
