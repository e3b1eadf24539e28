//! Master-agent adapter abstraction.
//!
//! The AgentX side of this crate does not speak the AgentX wire protocol
//! itself. It drives an external master-agent library - net-snmp's agent
//! runtime, or any equivalent - through the [`MasterAdapter`] trait, and
//! expects that library to call [`crate::handler::dispatch_scalar`] for
//! every incoming scalar GET.
//!
//! The [`MockMaster`] implementation (enabled for unit tests and under the
//! `testing` feature) is a programmable stand-in for exercising handlers
//! and the subagent lifecycle without a real master agent.

#[cfg(any(test, feature = "testing"))]
mod mock;

#[cfg(any(test, feature = "testing"))]
pub use mock::{MockMaster, MockRequest};

use crate::asn::AsnType;
use crate::error::Result;
use crate::oid::Oid;

/// Operations a master-agent library must provide.
///
/// Implementations wrap the library's connection to the master agent:
/// [`init`](Self::init) configures it and connects to the master socket,
/// [`register_scalar`](Self::register_scalar) announces one scalar OID,
/// and [`run_loop`](Self::run_loop) blocks processing requests until
/// [`stop_loop`](Self::stop_loop) is called from another thread.
///
/// # The request type
///
/// `Request` is the adapter's per-request state (for net-snmp, the
/// `netsnmp_request_info` for the variable being answered). The crate
/// never inspects it; handlers receive it opaquely and hand it back
/// through [`set_typed_response`](Self::set_typed_response).
///
/// # Response encoding
///
/// [`set_typed_response`](Self::set_typed_response) receives the value as
/// raw bytes tagged with its [`AsnType`]. INTEGER values cross this
/// boundary as 4-byte big-endian two's complement; OCTET-STRING values as
/// the verbatim bytes. The slice is only guaranteed valid for the duration
/// of the call - an adapter that responds asynchronously must copy it.
pub trait MasterAdapter: Send + Sync {
    /// Opaque per-request state threaded from the adapter's dispatch into
    /// the response call.
    type Request;

    /// Configure the library and connect to the master agent.
    ///
    /// `master_socket` is the transport address of the master, typically
    /// a unix domain socket path such as `/var/agentx/master`, but any
    /// string the underlying library accepts (e.g. `tcp:host:705`).
    fn init(&self, master_socket: &str) -> Result<()>;

    /// Register one scalar object at `oid`, dispatched under `name`.
    fn register_scalar(&self, name: &str, oid: &Oid) -> Result<()>;

    /// Process requests until [`stop_loop`](Self::stop_loop) is called.
    ///
    /// Blocking; the caller is expected to dedicate an OS thread to it.
    fn run_loop(&self) -> Result<()>;

    /// Signal [`run_loop`](Self::run_loop) to return.
    fn stop_loop(&self);

    /// Whether the run loop is currently live.
    fn running(&self) -> bool;

    /// Attach a typed value to the request being answered.
    fn set_typed_response(
        &self,
        request: &mut Self::Request,
        asn_type: AsnType,
        value: &[u8],
    ) -> Result<()>;
}
