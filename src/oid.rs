//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for
//! common OIDs. All combinators return fresh values; an `Oid` is immutable
//! once constructed.

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
///
/// String parsing does not enforce this; call [`Oid::validate_length()`] for
/// OIDs built from untrusted sources.
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// A finite, ordered sequence of arc values (`u32`). Equality is
/// elementwise and length-sensitive. The empty OID is a valid value;
/// "no OID" is always signalled with `Option::None`, never a sentinel.
///
/// The canonical string form carries a leading dot, as spoken over the
/// pass-persist protocol:
///
/// ```
/// use snmp_subagent::oid::Oid;
///
/// let oid = Oid::parse(".1.3.6.1.4.1.898889").unwrap();
/// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1, 898889]);
/// assert_eq!(oid.to_string(), ".1.3.6.1.4.1.898889");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// Accepts any iterator of `u32` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::oid::Oid;
    ///
    /// let oid = Oid::new(vec![1, 3, 6, 1, 2, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
    ///
    /// let oid = Oid::new(0..5);
    /// assert_eq!(oid.arcs(), &[0, 1, 2, 3, 4]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from its dotted string notation (e.g. `".1.3.6.1.2.1"`).
    ///
    /// The leading dot is mandatory; `"."` parses to the empty OID. Every
    /// component must decode as an unsigned decimal integer - embedded
    /// whitespace, empty components, and missing leading dots all fail
    /// with [`Error::BadOid`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6]);
    ///
    /// assert!(Oid::parse(".").unwrap().is_empty());
    /// assert!(Oid::parse("1.3.6").is_err());
    /// assert!(Oid::parse(".1.x.6").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some(rest) = s.strip_prefix('.') else {
            return Err(Error::bad_oid(s));
        };

        if rest.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();
        for part in rest.split('.') {
            let arc: u32 = part.parse().map_err(|_| Error::bad_oid(s))?;
            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// An OID always starts with itself, and any OID starts with the
    /// empty OID.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Concatenate two OIDs.
    ///
    /// Either operand may be empty; the result length is the sum of the
    /// operand lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::oid;
    ///
    /// let root = oid!(1, 3, 6);
    /// let partial = oid!(4, 1);
    /// assert_eq!(root.concat(&partial), oid!(1, 3, 6, 4, 1));
    /// ```
    pub fn concat(&self, tail: &Oid) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.extend_from_slice(&tail.arcs);
        Oid { arcs }
    }

    /// Create a child OID by appending a single arc.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::oid::Oid;
    ///
    /// let system = Oid::parse(".1.3.6.1.2.1.1").unwrap();
    /// let sys_descr = system.child(1);
    /// assert_eq!(sys_descr.to_string(), ".1.3.6.1.2.1.1.1");
    /// ```
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Get the parent OID (all arcs except the last).
    ///
    /// Returns `None` if the OID is empty.
    pub fn parent(&self) -> Option<Oid> {
        if self.arcs.is_empty() {
            None
        } else {
            Some(Oid {
                arcs: SmallVec::from_slice(&self.arcs[..self.arcs.len() - 1]),
            })
        }
    }

    /// Strip a root prefix, returning the remaining partial OID.
    ///
    /// If `root` equals `self` the remainder is the empty OID. If `root`
    /// is longer than `self`, or is not an elementwise prefix, the call
    /// fails with [`Error::OidNotMatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snmp_subagent::oid;
    ///
    /// let full = oid!(1, 2, 3, 4, 5, 6);
    /// assert_eq!(full.remainder(&oid!(1, 2, 3, 4)).unwrap(), oid!(5, 6));
    /// assert!(full.remainder(&full).unwrap().is_empty());
    /// assert!(oid!(1, 2, 3, 4).remainder(&full).is_err());
    /// ```
    pub fn remainder(&self, root: &Oid) -> Result<Oid> {
        if root.arcs.len() > self.arcs.len() || self.arcs[..root.arcs.len()] != root.arcs[..] {
            return Err(Error::OidNotMatch {
                oid: self.clone(),
                root: root.clone(),
            }
            .boxed());
        }

        Ok(Oid::from_slice(&self.arcs[root.arcs.len()..]))
    }

    /// Validate that the OID doesn't exceed the maximum arc count.
    ///
    /// SNMP implementations commonly limit OIDs to 128 subidentifiers;
    /// this check protects against maliciously long request OIDs.
    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::bad_oid(format!(
                "{} arcs exceeds the {} arc limit",
                self.arcs.len(),
                MAX_OID_LEN
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    /// Canonical dotted form with each arc dot-prefixed: `.1.3.6.1`.
    ///
    /// The empty OID renders as the empty string; callers that can have
    /// *no* OID at all carry an `Option` instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in &self.arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<crate::error::Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from literal arcs.
///
/// This is the preferred way to create OID constants since it's concise
/// and avoids parsing overhead.
///
/// # Examples
///
/// ```
/// use snmp_subagent::oid;
///
/// let enterprise = oid!(1, 3, 6, 1, 4, 1);
/// assert_eq!(enterprise.to_string(), ".1.3.6.1.4.1");
///
/// // Trailing commas are allowed
/// let root = oid!(1, 3, 6, 1, 4, 1, 898889,);
/// assert!(root.starts_with(&enterprise));
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
