//! Typed scalar handler implementations.
//!
//! Each handler pairs a registered OID with a user callback of a concrete
//! Rust type and takes care of encoding the result for the adapter:
//! integers as big-endian INTEGER, booleans as INTEGER 0/1 (boolean is not
//! a native SNMP wire type - the MIB declares the TruthValue), strings as
//! OCTET-STRING backed by handler-owned storage.

use super::{CallbackResult, ScalarHandler};
use crate::adapter::MasterAdapter;
use crate::asn::AsnType;
use crate::error::{Error, Result};
use crate::oid::Oid;
use bytes::Bytes;
use std::sync::{Mutex, PoisonError};

/// Handler for INTEGER scalars.
///
/// # Example
///
/// ```
/// use snmp_subagent::adapter::MockMaster;
/// use snmp_subagent::handler::IntegerHandler;
/// use snmp_subagent::oid;
///
/// let handler: IntegerHandler<MockMaster> = IntegerHandler::new(
///     "active-sessions",
///     oid!(1, 3, 6, 1, 4, 1, 898889, 1),
///     |_oid, _request| Ok(17),
/// );
/// ```
pub struct IntegerHandler<A: MasterAdapter> {
    name: String,
    root: Oid,
    callback: Callback<A, i32>,
}

type Callback<A, T> =
    Box<dyn Fn(&Oid, &<A as MasterAdapter>::Request) -> CallbackResult<T> + Send + Sync>;

impl<A: MasterAdapter> IntegerHandler<A> {
    /// Associate `oid` with an integer-producing callback.
    pub fn new<F>(name: impl Into<String>, oid: Oid, callback: F) -> Self
    where
        F: Fn(&Oid, &A::Request) -> CallbackResult<i32> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            root: oid,
            callback: Box::new(callback),
        }
    }
}

impl<A: MasterAdapter> ScalarHandler<A> for IntegerHandler<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_oid(&self) -> &Oid {
        &self.root
    }

    fn invoke(&self, adapter: &A, oid: &Oid, request: &mut A::Request) -> Result<()> {
        let value = (self.callback)(oid, request).map_err(Error::callback)?;
        adapter.set_typed_response(request, AsnType::INTEGER, &value.to_be_bytes())
    }
}

/// Handler for boolean scalars.
///
/// Boolean is not a valid SNMP wire type: the value is encoded as an
/// INTEGER constrained to 0 or 1, and the client relies on the MIB to
/// interpret it.
pub struct BooleanHandler<A: MasterAdapter> {
    name: String,
    root: Oid,
    callback: Callback<A, bool>,
}

impl<A: MasterAdapter> BooleanHandler<A> {
    /// Associate `oid` with a boolean-producing callback.
    pub fn new<F>(name: impl Into<String>, oid: Oid, callback: F) -> Self
    where
        F: Fn(&Oid, &A::Request) -> CallbackResult<bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            root: oid,
            callback: Box::new(callback),
        }
    }
}

impl<A: MasterAdapter> ScalarHandler<A> for BooleanHandler<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_oid(&self) -> &Oid {
        &self.root
    }

    fn invoke(&self, adapter: &A, oid: &Oid, request: &mut A::Request) -> Result<()> {
        let value = (self.callback)(oid, request).map_err(Error::callback)?;
        let encoded = i32::from(value).to_be_bytes();
        adapter.set_typed_response(request, AsnType::INTEGER, &encoded)
    }
}

/// Handler for OCTET-STRING scalars.
///
/// The handler owns the buffer backing the response bytes: each invocation
/// releases the previous buffer and stores the new one before handing the
/// adapter a slice into it, so the bytes stay valid until the adapter
/// returns (and beyond, until the next invocation or the handler is
/// dropped).
pub struct StringHandler<A: MasterAdapter> {
    name: String,
    root: Oid,
    callback: Callback<A, String>,
    storage: Mutex<Option<Bytes>>,
}

impl<A: MasterAdapter> StringHandler<A> {
    /// Associate `oid` with a string-producing callback.
    pub fn new<F>(name: impl Into<String>, oid: Oid, callback: F) -> Self
    where
        F: Fn(&Oid, &A::Request) -> CallbackResult<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            root: oid,
            callback: Box::new(callback),
            storage: Mutex::new(None),
        }
    }
}

impl<A: MasterAdapter> ScalarHandler<A> for StringHandler<A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_oid(&self) -> &Oid {
        &self.root
    }

    fn invoke(&self, adapter: &A, oid: &Oid, request: &mut A::Request) -> Result<()> {
        let text = (self.callback)(oid, request).map_err(Error::callback)?;

        // Replace the previous buffer, then answer from the stored copy;
        // the slice handed to the adapter stays owned by this handler.
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = storage.insert(Bytes::from(text.into_bytes()));
        adapter.set_typed_response(request, AsnType::OCTET_STRING, stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MockMaster, MockRequest};
    use crate::oid;

    #[test]
    fn integer_handler_encodes_big_endian() {
        let master = MockMaster::new();
        let handler = IntegerHandler::new("n", oid!(1, 3), |_, _| Ok(-7));

        let mut request = MockRequest::new();
        handler
            .invoke(&master, &oid!(1, 3, 0), &mut request)
            .unwrap();

        assert_eq!(request.responses().len(), 1);
        assert_eq!(request.last_integer(), Some(-7));
    }

    #[test]
    fn boolean_handler_encodes_zero_or_one() {
        let master = MockMaster::new();

        for (input, expected) in [(true, 1), (false, 0)] {
            let handler = BooleanHandler::new("b", oid!(1, 3), move |_, _| Ok(input));
            let mut request = MockRequest::new();
            handler
                .invoke(&master, &oid!(1, 3, 0), &mut request)
                .unwrap();
            assert_eq!(request.last_integer(), Some(expected));
        }
    }

    #[test]
    fn string_handler_replaces_storage_per_invocation() {
        let master = MockMaster::new();
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let handler = StringHandler::new("s", oid!(1, 3), move |_, _| {
            let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(format!("reply-{}", n))
        });

        let mut request = MockRequest::new();
        handler
            .invoke(&master, &oid!(1, 3, 0), &mut request)
            .unwrap();
        assert_eq!(request.last_string(), Some(&b"reply-0"[..]));

        handler
            .invoke(&master, &oid!(1, 3, 0), &mut request)
            .unwrap();
        assert_eq!(request.last_string(), Some(&b"reply-1"[..]));

        // One buffer outstanding at a time.
        let storage = handler.storage.lock().unwrap();
        assert_eq!(storage.as_deref(), Some(&b"reply-1"[..]));
    }

    #[test]
    fn callback_error_propagates() {
        let master = MockMaster::new();
        let handler: IntegerHandler<MockMaster> =
            IntegerHandler::new("n", oid!(1, 3), |_, _| Err("probe failed".into()));

        let mut request = MockRequest::new();
        let result = handler.invoke(&master, &oid!(1, 3, 0), &mut request);
        assert!(result.is_err());
        assert!(request.responses().is_empty());
    }

    #[test]
    fn callback_sees_the_requested_oid() {
        let master = MockMaster::new();
        let handler = IntegerHandler::new("n", oid!(1, 3, 6, 1), |oid: &Oid, _| {
            Ok(oid.len() as i32)
        });

        let mut request = MockRequest::new();
        handler
            .invoke(&master, &oid!(1, 3, 6, 1, 0), &mut request)
            .unwrap();
        assert_eq!(request.last_integer(), Some(5));
    }
}
