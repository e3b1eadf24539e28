//! Scalar handlers for AgentX subagents.
//!
//! This module provides:
//!
//! - [`ScalarHandler`] - the contract between a registered OID and the
//!   application callback answering for it
//! - [`IntegerHandler`], [`BooleanHandler`], [`StringHandler`] - typed
//!   implementations invoking user callbacks
//! - [`HandlerRegistry`] - the concurrent-safe name→handler map
//! - [`dispatch_scalar`] - the reentrant entry point a
//!   [`MasterAdapter`](crate::adapter::MasterAdapter) calls for every
//!   incoming scalar GET
//!
//! # Dispatch
//!
//! The master-agent library calls [`dispatch_scalar`] with the handler
//! name it registered, the requested OID's arcs, and its opaque request
//! state. The shim looks the handler up (the registry lock is held only
//! across the lookup, never across the user callback), invokes it, and
//! maps the outcome to an SNMP error code: success and missing handler
//! both map to `NOERROR`, a failed callback to `GENERR`.

mod registry;
mod scalar;

pub use registry::HandlerRegistry;
pub use scalar::{BooleanHandler, IntegerHandler, StringHandler};

use crate::adapter::MasterAdapter;
use crate::error::Result;
use crate::oid::Oid;

/// Error type user callbacks may fail with.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result type of user callbacks.
pub type CallbackResult<T> = std::result::Result<T, CallbackError>;

/// A scalar object registered with the master agent.
///
/// Each handler has a unique name (the registry key), a fixed root OID
/// (its position in the global MIB), and answers GET requests by encoding
/// a value through the adapter.
pub trait ScalarHandler<A: MasterAdapter>: Send + Sync {
    /// The registry key this handler is dispatched under.
    fn name(&self) -> &str;

    /// The OID this handler is registered at.
    fn root_oid(&self) -> &Oid;

    /// Register this handler's scalar with the master agent.
    fn register(&self, adapter: &A) -> Result<()> {
        adapter.register_scalar(self.name(), self.root_oid())
    }

    /// Answer one GET request.
    ///
    /// `oid` is the OID the master agent resolved the request to, and
    /// `request` its opaque per-request state. An `Err` is logged by the
    /// dispatch shim and reported to the master as `GENERR`.
    fn invoke(&self, adapter: &A, oid: &Oid, request: &mut A::Request) -> Result<()>;
}

/// Outcome of a dispatched request, as reported back to the master agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request was answered (or there was no object to answer for).
    NoError,
    /// The handler callback failed.
    GenErr,
}

impl DispatchOutcome {
    /// The SNMP error-status code (RFC 3416): `noError` = 0, `genErr` = 5.
    pub fn as_i32(self) -> i32 {
        match self {
            DispatchOutcome::NoError => 0,
            DispatchOutcome::GenErr => 5,
        }
    }
}

/// Reentrant dispatch entry point.
///
/// Adapters call this - typically from the master library's own dispatch
/// thread - for every incoming scalar GET, passing the handler name the
/// scalar was registered under, the requested OID's arcs, and the opaque
/// request state.
///
/// A missing handler is not an error: the master is told `NoError` and
/// simply has no value to report, mirroring a scalar that was unregistered
/// between registration and the request.
pub fn dispatch_scalar<A: MasterAdapter>(
    adapter: &A,
    registry: &HandlerRegistry<A>,
    name: &str,
    arcs: &[u32],
    request: &mut A::Request,
) -> DispatchOutcome {
    let oid = Oid::from_slice(arcs);
    tracing::debug!(
        target: "snmp_subagent::handler",
        "received GET request for {} ({})", oid, name
    );

    // Hold the registry lock only across the lookup, so registration is
    // never blocked behind a slow callback.
    let Some(handler) = registry.get(name) else {
        tracing::warn!(
            target: "snmp_subagent::handler",
            "no handler registered under {:?} for {}", name, oid
        );
        return DispatchOutcome::NoError;
    };

    match handler.invoke(adapter, &oid, request) {
        Ok(()) => DispatchOutcome::NoError,
        Err(error) => {
            tracing::error!(
                target: "snmp_subagent::handler",
                "handler {:?} failed for {}: {}", name, oid, error
            );
            DispatchOutcome::GenErr
        }
    }
}
