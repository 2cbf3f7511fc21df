//! Mapping between `ferrous_lookup_domain::RecordType` and `hickory_proto::rr::RecordType`
//!
//! Both sides are keyed by the IANA wire code, so the domain table is the
//! single source of truth.

use ferrous_lookup_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

/// Bidirectional mapper between domain and hickory record types
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Convert domain RecordType → hickory RecordType (for building queries)
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    /// Convert hickory RecordType → domain RecordType (for decoding answers)
    ///
    /// Returns `None` for types this client does not decode.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        RecordType::from_u16(u16::from(hickory_type))
    }
}
