//! Error types for snmp-subagent.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type covering every failure mode of the crate
//! - [`Result`] - Boxed result alias used throughout
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//! The larger variants carry OIDs inline for debugging convenience, so the
//! unboxed enum would bloat every `Result` on the stack.
//!
//! ```rust
//! use snmp_subagent::{Error, Oid, Result};
//!
//! fn handle_error(result: Result<Oid>) {
//!     match result {
//!         Ok(oid) => println!("parsed {}", oid),
//!         Err(e) => match &*e {
//!             Error::BadOid { input } => println!("unparseable OID {:?}", input),
//!             Error::OidNotMatch { root, .. } => println!("not under {}", root),
//!             _ => println!("error: {}", e),
//!         }
//!     }
//! }
//! ```
//!
//! Two absence cases are deliberately *not* errors: a tree walk that finds
//! no node returns `None` (serialised as the `None` reply line by the
//! pass-persist engine), and a leaf constructed with an ASN type outside
//! the pass-persist allow-list is reported as a `tracing` warning while the
//! leaf is still constructed.

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// The main error type for all snmp-subagent operations.
///
/// Errors are boxed (via [`Result`]) to keep the size small on the stack.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An OID string or component sequence failed to parse.
    #[error("invalid OID: {input:?}")]
    BadOid { input: Box<str> },

    /// The requested OID is not under the registered root.
    #[error("OID {oid} is not a child of root {root}")]
    OidNotMatch {
        oid: crate::oid::Oid,
        root: crate::oid::Oid,
    },

    /// `run()` was called while the agent loop is live.
    #[error("cannot run the agent while it is already running")]
    AlreadyRunning,

    /// I/O failure on the extension streams or while spawning the agent thread.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The master-agent adapter reported a failure.
    #[error("master agent adapter: {0}")]
    Adapter(Box<str>),

    /// A user handler callback failed; mapped to GENERR by the dispatch shim.
    #[error("handler callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Construct a [`Error::BadOid`] from the offending input.
    pub(crate) fn bad_oid(input: impl Into<Box<str>>) -> Box<Self> {
        Error::BadOid {
            input: input.into(),
        }
        .boxed()
    }

    /// Construct a [`Error::Adapter`] from a message.
    pub fn adapter(msg: impl Into<Box<str>>) -> Box<Self> {
        Error::Adapter(msg.into()).boxed()
    }

    /// Wrap a user callback error.
    pub(crate) fn callback(err: Box<dyn std::error::Error + Send + Sync>) -> Box<Self> {
        Error::Callback(err).boxed()
    }
}

// Lets `?` lift io::Error directly into the boxed Result used by the
// serve loop and the lifecycle.
impl From<std::io::Error> for Box<Error> {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_is_pointer_sized() {
        // Result<(), Box<Error>> should be pointer-sized (8 bytes on 64-bit).
        assert_eq!(
            std::mem::size_of::<Result<()>>(),
            std::mem::size_of::<*const ()>(),
            "Result<()> should be pointer-sized"
        );
    }

    #[test]
    fn display_messages() {
        let err = Error::bad_oid("1.3.6");
        assert!(err.to_string().contains("1.3.6"));

        let err = Error::AlreadyRunning;
        assert!(err.to_string().contains("already running"));
    }
}
