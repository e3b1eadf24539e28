//! Mock master-agent adapter for testing.
//!
//! Provides a programmable adapter that records registrations and
//! responses without needing a real master agent or its socket.

use super::MasterAdapter;
use crate::asn::AsnType;
use crate::error::{Error, Result};
use crate::oid::Oid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

/// Per-request state for the mock: every `set_typed_response` call is
/// recorded as a `(type, bytes)` pair.
#[derive(Debug, Default)]
pub struct MockRequest {
    responses: Vec<(AsnType, Vec<u8>)>,
}

impl MockRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// All responses attached to this request, in call order.
    pub fn responses(&self) -> &[(AsnType, Vec<u8>)] {
        &self.responses
    }

    /// Decode the most recent response as a big-endian INTEGER.
    pub fn last_integer(&self) -> Option<i32> {
        let (asn_type, bytes) = self.responses.last()?;
        if *asn_type != AsnType::INTEGER {
            return None;
        }
        Some(i32::from_be_bytes(bytes.as_slice().try_into().ok()?))
    }

    /// The most recent response as an OCTET-STRING payload.
    pub fn last_string(&self) -> Option<&[u8]> {
        match self.responses.last() {
            Some((asn_type, bytes)) if *asn_type == AsnType::OCTET_STRING => Some(bytes),
            _ => None,
        }
    }
}

#[derive(Default)]
struct MockMasterInner {
    /// Socket address handed to `init`, if init has run.
    socket: Option<String>,
    /// Scalars registered so far, in registration order.
    registered: Vec<(String, Oid)>,
    /// Error to fail the next `init` call with.
    init_error: Option<String>,
    /// Set by `stop_loop`; consumed by `run_loop`.
    stop: bool,
}

/// Mock master-agent adapter.
///
/// `run_loop` parks on a condvar until `stop_loop` is called, mimicking
/// the blocking behaviour of a real agent library.
///
/// # Example
///
/// ```
/// use snmp_subagent::adapter::{MasterAdapter, MockMaster, MockRequest};
/// use snmp_subagent::asn::AsnType;
/// use snmp_subagent::oid;
///
/// let master = MockMaster::new();
/// master.init("/var/agentx/master").unwrap();
/// master.register_scalar("uptime", &oid!(1, 3, 6, 1, 4, 1, 898889, 1)).unwrap();
///
/// let mut request = MockRequest::new();
/// master.set_typed_response(&mut request, AsnType::INTEGER, &7i32.to_be_bytes()).unwrap();
/// assert_eq!(request.last_integer(), Some(7));
/// ```
#[derive(Default)]
pub struct MockMaster {
    inner: Mutex<MockMasterInner>,
    stopped: Condvar,
    running: AtomicBool,
}

impl MockMaster {
    /// Create a mock adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `init` call fail with `message`.
    pub fn fail_next_init(&self, message: impl Into<String>) {
        self.lock_inner().init_error = Some(message.into());
    }

    /// The socket address `init` was called with, if any.
    pub fn init_socket(&self) -> Option<String> {
        self.lock_inner().socket.clone()
    }

    /// The scalars registered so far, in registration order.
    pub fn registrations(&self) -> Vec<(String, Oid)> {
        self.lock_inner().registered.clone()
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, MockMasterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MasterAdapter for MockMaster {
    type Request = MockRequest;

    fn init(&self, master_socket: &str) -> Result<()> {
        let mut inner = self.lock_inner();
        if let Some(message) = inner.init_error.take() {
            return Err(Error::adapter(message));
        }
        inner.socket = Some(master_socket.to_string());
        Ok(())
    }

    fn register_scalar(&self, name: &str, oid: &Oid) -> Result<()> {
        self.lock_inner()
            .registered
            .push((name.to_string(), oid.clone()));
        Ok(())
    }

    fn run_loop(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);

        let mut inner = self.lock_inner();
        while !inner.stop {
            inner = self
                .stopped
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        // Reset so the adapter can be run again.
        inner.stop = false;
        drop(inner);

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop_loop(&self) {
        self.lock_inner().stop = true;
        self.stopped.notify_all();
    }

    fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_typed_response(
        &self,
        request: &mut Self::Request,
        asn_type: AsnType,
        value: &[u8],
    ) -> Result<()> {
        request.responses.push((asn_type, value.to_vec()));
        Ok(())
    }
}
