use super::record_type_map::RecordTypeMapper;
use ferrous_lookup_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answers: Vec<Record>,
}

impl DnsResponse {
    /// Maps a non-success response code onto the error taxonomy.
    pub fn ensure_success(&self, query: &str) -> Result<(), DomainError> {
        match self.rcode {
            ResponseCode::NoError => Ok(()),
            ResponseCode::NXDomain => Err(DomainError::NxDomain(query.to_string())),
            rcode => Err(DomainError::QueryFailed {
                name: query.to_string(),
                rcode: u16::from(rcode),
            }),
        }
    }

    /// Textual addresses of every answer, in the order the server sent them.
    ///
    /// Any answer that is not of the requested type fails the whole call
    /// rather than being skipped.
    pub fn addresses(&self, requested: RecordType) -> Result<Vec<String>, DomainError> {
        let mut addresses = Vec::with_capacity(self.answers.len());

        for record in &self.answers {
            match (requested, record.data()) {
                (RecordType::A, RData::A(a)) => addresses.push(a.0.to_string()),
                (RecordType::AAAA, RData::AAAA(aaaa)) => addresses.push(aaaa.0.to_string()),
                _ => {
                    let reason = match RecordTypeMapper::from_hickory(record.record_type()) {
                        Some(other) => format!(
                            "{} record for {} in answer to {} query",
                            other,
                            record.name(),
                            requested
                        ),
                        None => format!(
                            "{} record for {} cannot be decoded",
                            record.record_type(),
                            record.name()
                        ),
                    };
                    return Err(DomainError::UnsupportedAnswerType(reason));
                }
            }
        }

        Ok(addresses)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        if response_bytes.len() < 12 {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response too short: {} bytes",
                response_bytes.len()
            )));
        }

        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);

        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();
        let answers = message.answers().to_vec();

        if truncated {
            warn!(id = id, "Truncated DNS response, TCP fallback is not performed");
        }

        debug!(
            id = id,
            rcode = ?rcode,
            answers = answers.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id,
            rcode,
            truncated,
            answers,
        })
    }
}
