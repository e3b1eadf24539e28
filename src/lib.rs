//! # snmp-subagent
//!
//! Expose application-level values as SNMP managed objects.
//!
//! Two deployment shapes share one object model:
//!
//! - **pass-persist**: the process is started by snmpd (`pass_persist`
//!   directive) and answers GET/GETNEXT over stdin/stdout from a tree of
//!   typed values rebuilt by a refresh callback
//!   ([`passpersist::PassPersistExtension`])
//! - **AgentX subagent**: the process attaches to an SNMP master agent
//!   through a pluggable [`adapter::MasterAdapter`] and dispatches scalar
//!   GET callbacks into application code ([`agent::Subagent`],
//!   [`handler`])
//!
//! ## Features
//!
//! - OID algebra with a `SmallVec`-backed [`Oid`] and the [`oid!`] macro
//! - Heterogeneous, ordered SMI tree of typed scalar leaves ([`smi`])
//! - GET resolution and GETNEXT traversal over that tree ([`walk`])
//! - The pass-persist line-protocol state machine on tokio I/O
//! - Concurrent-safe handler registry and typed scalar handlers
//!
//! ## Pass-persist quick start
//!
//! ```rust,no_run
//! use snmp_subagent::passpersist::PassPersistExtension;
//! use snmp_subagent::smi::{SmiLeaf, SmiNode};
//! use snmp_subagent::oid;
//!
//! #[tokio::main]
//! async fn main() -> snmp_subagent::Result<()> {
//!     let mut extension = PassPersistExtension::new(
//!         oid!(1, 3, 6, 1, 4, 1, 898889),
//!         || {
//!             let mut tree = SmiNode::subtree();
//!             tree.add_child(SmiNode::from(SmiLeaf::integer(42)));
//!             tree.add_child(SmiNode::from(SmiLeaf::string("ok")));
//!             tree
//!         },
//!     );
//!
//!     extension
//!         .serve(tokio::io::stdin(), tokio::io::stdout())
//!         .await
//! }
//! ```
//!
//! ## AgentX quick start
//!
//! ```rust,ignore
//! use snmp_subagent::agent::Subagent;
//! use snmp_subagent::handler::IntegerHandler;
//! use snmp_subagent::oid;
//! use std::sync::Arc;
//!
//! // `NetSnmpAdapter` is your binding to the master-agent library.
//! let agent = Subagent::builder(NetSnmpAdapter::new())
//!     .master_socket("/var/agentx/master")
//!     .handler(Arc::new(IntegerHandler::new(
//!         "active-sessions",
//!         oid!(1, 3, 6, 1, 4, 1, 898889, 1),
//!         |_, _| Ok(sessions_now()),
//!     )))
//!     .build();
//!
//! agent.run()?; // blocks until agent.stop()
//! ```

pub mod adapter;
pub mod agent;
pub mod asn;
pub mod error;
pub mod handler;
pub mod oid;
pub mod passpersist;
pub mod smi;
pub mod walk;

// Re-exports for convenience
pub use adapter::MasterAdapter;
pub use agent::{DEFAULT_MASTER_SOCKET, Subagent, SubagentBuilder};
pub use asn::AsnType;
pub use error::{Error, Result};
pub use handler::{
    BooleanHandler, CallbackError, CallbackResult, DispatchOutcome, HandlerRegistry,
    IntegerHandler, ScalarHandler, StringHandler, dispatch_scalar,
};
pub use oid::Oid;
pub use passpersist::PassPersistExtension;
pub use smi::{LeafValue, SmiLeaf, SmiNode};
pub use walk::{get_leaf, next_leaf};
