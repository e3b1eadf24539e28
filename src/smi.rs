//! The SMI tree data model.
//!
//! SNMP MIBs use SMI - the Structure of Management Information - to define
//! the hierarchy of managed objects. Each node in the tree is either a
//! *subtree* holding an ordered sequence of children, or a *leaf* pairing
//! an ASN.1 type tag with a scalar payload.
//!
//! For subtrees the order of the children is significant: child index `i`
//! (1-based) corresponds to sub-OID component `i`. A subtree located at
//! `.1.3.6.1.4.1.898889` has its first child at `.1.3.6.1.4.1.898889.1`.
//!
//! [`SmiNode`] is a sum type, so a node is never simultaneously leaf and
//! subtree and there is no "neither" state to defend against. Trees are
//! built top-down by the application (typically rebuilt on each refresh of
//! a pass-persist extension) and are read-only to the walkers in
//! [`crate::walk`].

use crate::asn::AsnType;
use crate::oid::Oid;
use bytes::Bytes;
use std::fmt;

/// A node in the SMI tree: an ordered subtree or a typed leaf.
///
/// # Examples
///
/// ```
/// use snmp_subagent::smi::{SmiLeaf, SmiNode};
///
/// let mut branch = SmiNode::subtree();
/// branch.add_child(SmiNode::from(SmiLeaf::integer(42)));
/// branch.add_child(SmiNode::from(SmiLeaf::string("up")));
///
/// assert_eq!(branch.children().map(<[SmiNode]>::len), Some(2));
/// assert!(branch.value().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SmiNode {
    /// An interior node; children may be leaves or further subtrees, mixed
    /// freely. A subtree with zero children is valid but terminal.
    Subtree(Vec<SmiNode>),
    /// A terminal node carrying a typed scalar value.
    Leaf(SmiLeaf),
}

impl SmiNode {
    /// Create an empty subtree.
    pub fn subtree() -> Self {
        SmiNode::Subtree(Vec::new())
    }

    /// Create a subtree from an initial list of children.
    pub fn with_children(children: Vec<SmiNode>) -> Self {
        SmiNode::Subtree(children)
    }

    /// The ordered children, or `None` if this node is a leaf.
    pub fn children(&self) -> Option<&[SmiNode]> {
        match self {
            SmiNode::Subtree(children) => Some(children),
            SmiNode::Leaf(_) => None,
        }
    }

    /// The leaf value, or `None` if this node is a subtree.
    pub fn value(&self) -> Option<&SmiLeaf> {
        match self {
            SmiNode::Subtree(_) => None,
            SmiNode::Leaf(leaf) => Some(leaf),
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, SmiNode::Leaf(_))
    }

    /// Append a child to a subtree.
    ///
    /// Calling this on a leaf is a caller bug; the child is dropped and a
    /// warning is logged.
    pub fn add_child(&mut self, child: SmiNode) {
        match self {
            SmiNode::Subtree(children) => children.push(child),
            SmiNode::Leaf(leaf) => {
                tracing::warn!(
                    target: "snmp_subagent::smi",
                    "add_child on leaf {}; child dropped", leaf
                );
            }
        }
    }
}

impl From<SmiLeaf> for SmiNode {
    fn from(leaf: SmiLeaf) -> Self {
        SmiNode::Leaf(leaf)
    }
}

impl fmt::Display for SmiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmiNode::Leaf(leaf) => write!(f, "{}", leaf),
            SmiNode::Subtree(children) => {
                f.write_str("Subtree{")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A leaf in the SMI tree: an ASN.1 type tag and a scalar payload.
///
/// Leaves may be constructed with any tag from the catalog, but only the
/// pass-persist allow-list serialises over that protocol; constructing a
/// leaf outside the list logs a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct SmiLeaf {
    asn_type: AsnType,
    value: LeafValue,
}

impl SmiLeaf {
    /// Create a leaf from an explicit tag and payload.
    ///
    /// Logs a warning if the tag is not valid for pass_persist extensions;
    /// the leaf is still constructed (it may be served over AgentX, where
    /// the master agent decides what it accepts).
    pub fn new(asn_type: AsnType, value: LeafValue) -> Self {
        if !asn_type.is_pass_persist() {
            tracing::warn!(
                target: "snmp_subagent::smi",
                "ASN type {} not valid for pass_persist extensions", asn_type
            );
        }
        SmiLeaf { asn_type, value }
    }

    /// An INTEGER leaf.
    pub fn integer(value: i64) -> Self {
        SmiLeaf {
            asn_type: AsnType::INTEGER,
            value: LeafValue::Integer(value),
        }
    }

    /// A COUNTER32 leaf.
    pub fn counter32(value: u32) -> Self {
        SmiLeaf {
            asn_type: AsnType::COUNTER32,
            value: LeafValue::Integer(value.into()),
        }
    }

    /// A GAUGE32 leaf.
    pub fn gauge32(value: u32) -> Self {
        SmiLeaf {
            asn_type: AsnType::GAUGE32,
            value: LeafValue::Integer(value.into()),
        }
    }

    /// A TIMETICKS leaf (hundredths of seconds).
    pub fn timeticks(value: u32) -> Self {
        SmiLeaf {
            asn_type: AsnType::TIME_TICKS,
            value: LeafValue::Integer(value.into()),
        }
    }

    /// An OCTET-STRING leaf.
    pub fn string(value: impl Into<Bytes>) -> Self {
        SmiLeaf {
            asn_type: AsnType::OCTET_STRING,
            value: LeafValue::Bytes(value.into()),
        }
    }

    /// An OBJECT-IDENTIFIER leaf.
    pub fn object_id(value: Oid) -> Self {
        SmiLeaf {
            asn_type: AsnType::OBJECT_IDENTIFIER,
            value: LeafValue::Oid(value),
        }
    }

    /// An IP-ADDRESS leaf.
    pub fn ip_address(octets: [u8; 4]) -> Self {
        SmiLeaf {
            asn_type: AsnType::IP_ADDRESS,
            value: LeafValue::IpAddress(octets),
        }
    }

    /// The ASN.1 type tag.
    pub fn asn_type(&self) -> AsnType {
        self.asn_type
    }

    /// The scalar payload.
    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}

impl fmt::Display for SmiLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Leaf{{{}, {}}}", self.asn_type, self.value)
    }
}

/// The scalar payload of a leaf.
///
/// The `Display` form is the value line of a pass-persist reply: decimal
/// for integers, the raw bytes for strings, dotted notation for OIDs and
/// IP addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    /// Payload for the integer family (INTEGER, COUNTER32, GAUGE32, TIMETICKS, ...).
    Integer(i64),
    /// Payload for OCTET-STRING.
    Bytes(Bytes),
    /// Payload for OBJECT-IDENTIFIER.
    Oid(Oid),
    /// Payload for IP-ADDRESS.
    IpAddress([u8; 4]),
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafValue::Integer(v) => write!(f, "{}", v),
            LeafValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            LeafValue::Oid(oid) => write!(f, "{}", oid),
            LeafValue::IpAddress([a, b, c, d]) => write!(f, "{}.{}.{}.{}", a, b, c, d),
        }
    }
}
