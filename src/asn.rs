//! ASN.1 type tags used by SNMP.
//!
//! [`AsnType`] is the single-byte tag carried by every SMI leaf. The full
//! catalog is retained for completeness; only the subset in
//! [`AsnType::is_pass_persist`] may be spoken over the pass-persist
//! protocol, and only those tags have an entry in the fixed
//! [`AsnType::pass_persist_name`] map.

use std::fmt;

/// A single-byte SNMP/ASN.1 type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsnType(u8);

impl AsnType {
    pub const INTEGER: AsnType = AsnType(0x02);
    pub const BIT_STRING: AsnType = AsnType(0x03);
    pub const OCTET_STRING: AsnType = AsnType(0x04);
    pub const NULL: AsnType = AsnType(0x05);
    pub const OBJECT_IDENTIFIER: AsnType = AsnType(0x06);
    pub const SEQUENCE: AsnType = AsnType(0x30);
    pub const IP_ADDRESS: AsnType = AsnType(0x40);
    pub const COUNTER32: AsnType = AsnType(0x41);
    pub const GAUGE32: AsnType = AsnType(0x42);
    pub const TIME_TICKS: AsnType = AsnType(0x43);
    pub const OPAQUE: AsnType = AsnType(0x44);
    pub const NSAP_ADDRESS: AsnType = AsnType(0x45);
    pub const COUNTER64: AsnType = AsnType(0x46);
    pub const UINTEGER32: AsnType = AsnType(0x47);
    pub const NO_SUCH_OBJECT: AsnType = AsnType(0x80);
    pub const NO_SUCH_INSTANCE: AsnType = AsnType(0x81);
    pub const GET_REQUEST: AsnType = AsnType(0xa0);
    pub const GET_NEXT_REQUEST: AsnType = AsnType(0xa1);
    pub const GET_RESPONSE: AsnType = AsnType(0xa2);
    pub const SET_REQUEST: AsnType = AsnType(0xa3);
    pub const TRAP: AsnType = AsnType(0xa4);
    pub const GET_BULK_REQUEST: AsnType = AsnType(0xa5);

    /// Construct from a raw tag byte.
    pub const fn from_u8(tag: u8) -> Self {
        AsnType(tag)
    }

    /// The raw tag byte.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Whether this tag may be spoken over the pass-persist protocol.
    ///
    /// Per the net-snmp `pass`/`pass_persist` documentation only these
    /// seven types are valid; a leaf may still be constructed with any
    /// other tag, but it is reported as an anomaly and never serialised.
    pub fn is_pass_persist(self) -> bool {
        self.pass_persist_name().is_some()
    }

    /// The lower-case type name emitted on a pass-persist reply line.
    ///
    /// Returns `None` for tags outside the pass-persist allow-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::asn::AsnType;
    ///
    /// assert_eq!(AsnType::INTEGER.pass_persist_name(), Some("integer"));
    /// assert_eq!(AsnType::OCTET_STRING.pass_persist_name(), Some("string"));
    /// assert_eq!(AsnType::COUNTER64.pass_persist_name(), None);
    /// ```
    pub fn pass_persist_name(self) -> Option<&'static str> {
        match self {
            AsnType::INTEGER => Some("integer"),
            AsnType::GAUGE32 => Some("gauge"),
            AsnType::COUNTER32 => Some("counter"),
            AsnType::TIME_TICKS => Some("timeticks"),
            AsnType::IP_ADDRESS => Some("ipaddress"),
            AsnType::OBJECT_IDENTIFIER => Some("objectid"),
            AsnType::OCTET_STRING => Some("string"),
            _ => None,
        }
    }

    /// A stable mnemonic for logging, covering the whole catalog.
    fn mnemonic(self) -> &'static str {
        match self {
            AsnType::INTEGER => "INTEGER",
            AsnType::BIT_STRING => "BIT-STRING",
            AsnType::OCTET_STRING => "OCTET-STRING",
            AsnType::NULL => "NULL",
            AsnType::OBJECT_IDENTIFIER => "OBJECT-IDENTIFIER",
            AsnType::SEQUENCE => "SEQUENCE",
            AsnType::IP_ADDRESS => "IP-ADDRESS",
            AsnType::COUNTER32 => "COUNTER32",
            AsnType::GAUGE32 => "GAUGE32",
            AsnType::TIME_TICKS => "TIMETICKS",
            AsnType::OPAQUE => "OPAQUE",
            AsnType::NSAP_ADDRESS => "NSAP-ADDRESS",
            AsnType::COUNTER64 => "COUNTER64",
            AsnType::UINTEGER32 => "UINTEGER32",
            AsnType::NO_SUCH_OBJECT => "NO-SUCH-OBJECT",
            AsnType::NO_SUCH_INSTANCE => "NO-SUCH-INSTANCE",
            AsnType::GET_REQUEST => "GET-REQUEST",
            AsnType::GET_NEXT_REQUEST => "GET-NEXT-REQUEST",
            AsnType::GET_RESPONSE => "GET-RESPONSE",
            AsnType::SET_REQUEST => "SET-REQUEST",
            AsnType::TRAP => "TRAP",
            AsnType::GET_BULK_REQUEST => "GET-BULK-REQUEST",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for AsnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            "UNKNOWN" => write!(f, "UNKNOWN(0x{:02x})", self.0),
            name => f.write_str(name),
        }
    }
}
