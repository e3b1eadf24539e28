//! AgentX subagent lifecycle.
//!
//! [`Subagent`] wires a [`HandlerRegistry`] to a
//! [`MasterAdapter`](crate::adapter::MasterAdapter) and manages the
//! attach/serve/detach cycle: [`run`](Subagent::run) initialises the
//! adapter once, registers every handler, and drives the adapter's
//! blocking loop on a dedicated OS thread until [`stop`](Subagent::stop)
//! is called from elsewhere.
//!
//! # Example
//!
//! ```no_run
//! use snmp_subagent::adapter::MockMaster;
//! use snmp_subagent::agent::Subagent;
//! use snmp_subagent::handler::IntegerHandler;
//! use snmp_subagent::oid;
//! use std::sync::Arc;
//!
//! # fn main() -> snmp_subagent::Result<()> {
//! let agent = Subagent::builder(MockMaster::new())
//!     .master_socket("/var/agentx/master")
//!     .handler(Arc::new(IntegerHandler::new(
//!         "active-sessions",
//!         oid!(1, 3, 6, 1, 4, 1, 898889, 1),
//!         |_, _| Ok(17),
//!     )))
//!     .build();
//!
//! // Blocks until agent.stop() is called from another thread.
//! agent.run()
//! # }
//! ```

use crate::adapter::MasterAdapter;
use crate::error::{Error, Result};
use crate::handler::{HandlerRegistry, ScalarHandler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Default transport address of the AgentX master agent.
pub const DEFAULT_MASTER_SOCKET: &str = "/var/agentx/master";

/// Builder for [`Subagent`].
pub struct SubagentBuilder<A: MasterAdapter> {
    adapter: A,
    master_socket: String,
    registry: Arc<HandlerRegistry<A>>,
}

impl<A: MasterAdapter> SubagentBuilder<A> {
    /// Create a builder around an adapter, with the default master socket
    /// and an empty registry.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            master_socket: DEFAULT_MASTER_SOCKET.to_string(),
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    /// Set the master agent's transport address.
    ///
    /// Accepts whatever the underlying adapter accepts - a unix socket
    /// path, or forms like `tcp:localhost:705`. Must be configured before
    /// [`Subagent::run`]; it cannot change afterwards.
    pub fn master_socket(mut self, address: impl Into<String>) -> Self {
        self.master_socket = address.into();
        self
    }

    /// Share an existing registry instead of the builder's fresh one.
    pub fn registry(mut self, registry: Arc<HandlerRegistry<A>>) -> Self {
        self.registry = registry;
        self
    }

    /// Register a handler.
    pub fn handler(self, handler: Arc<dyn ScalarHandler<A>>) -> Self {
        self.registry.add(handler);
        self
    }

    /// Build the subagent.
    pub fn build(self) -> Subagent<A> {
        Subagent {
            adapter: self.adapter,
            master_socket: self.master_socket,
            registry: self.registry,
            initialized: Mutex::new(false),
            run_gate: AtomicBool::new(false),
        }
    }
}

/// An AgentX subagent: handlers, an adapter, and a start/stop/running gate
/// around the adapter's blocking loop.
pub struct Subagent<A: MasterAdapter> {
    adapter: A,
    master_socket: String,
    registry: Arc<HandlerRegistry<A>>,
    /// One-shot init latch; stays unset if init fails so run can retry.
    initialized: Mutex<bool>,
    /// Guards against re-entering run while a loop is live.
    run_gate: AtomicBool,
}

impl<A: MasterAdapter> Subagent<A> {
    /// Start building a subagent around `adapter`.
    pub fn builder(adapter: A) -> SubagentBuilder<A> {
        SubagentBuilder::new(adapter)
    }

    /// The handler registry. Handlers added here before [`run`](Self::run)
    /// are registered with the master when the agent starts.
    pub fn registry(&self) -> &Arc<HandlerRegistry<A>> {
        &self.registry
    }

    /// The adapter this subagent drives.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The configured master socket address.
    pub fn master_socket(&self) -> &str {
        &self.master_socket
    }

    /// Attach to the master agent and serve until [`stop`](Self::stop).
    ///
    /// On the first call this initialises the adapter (configuring the
    /// library and connecting to the master socket); every registered
    /// handler is then registered with the master, and the adapter's
    /// blocking loop runs on a dedicated OS thread for the duration of
    /// this call.
    ///
    /// Returns [`Error::AlreadyRunning`] if called while a loop is live.
    pub fn run(&self) -> Result<()> {
        if self
            .run_gate
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::AlreadyRunning.boxed());
        }

        let result = self.run_locked();
        self.run_gate.store(false, Ordering::SeqCst);
        result
    }

    fn run_locked(&self) -> Result<()> {
        tracing::info!(
            target: "snmp_subagent::agent",
            "starting snmp subagent (master at {})", self.master_socket
        );

        {
            let mut initialized = self
                .initialized
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !*initialized {
                self.adapter.init(&self.master_socket)?;
                *initialized = true;
            }
        }

        for handler in self.registry.all() {
            tracing::debug!(
                target: "snmp_subagent::agent",
                "registering handler {:?} at {}", handler.name(), handler.root_oid()
            );
            handler.register(&self.adapter)?;
        }

        // The master loop is pinned to its own named OS thread so it cannot
        // starve the caller's thread, and the scope keeps borrows valid for
        // exactly the duration of the loop.
        let outcome = std::thread::scope(|scope| -> Result<()> {
            std::thread::Builder::new()
                .name("agentx-master-loop".to_string())
                .spawn_scoped(scope, || self.adapter.run_loop())?
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        });

        tracing::info!(target: "snmp_subagent::agent", "snmp subagent has stopped");
        outcome
    }

    /// Signal the adapter to leave its loop, letting [`run`](Self::run)
    /// return.
    pub fn stop(&self) {
        tracing::info!(target: "snmp_subagent::agent", "stopping snmp subagent");
        self.adapter.stop_loop();
    }

    /// Whether the adapter's loop is currently live.
    pub fn running(&self) -> bool {
        self.adapter.running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockMaster;
    use crate::handler::IntegerHandler;
    use crate::oid;
    use std::time::{Duration, Instant};

    fn wait_until(deadline: Duration, mut probe: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if probe() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn run_registers_handlers_and_stops_cleanly() {
        let agent = Subagent::builder(MockMaster::new())
            .master_socket("tcp:localhost:705")
            .handler(Arc::new(IntegerHandler::new(
                "uptime",
                oid!(1, 3, 6, 1, 4, 1, 898889, 1),
                |_, _| Ok(1),
            )))
            .build();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| agent.run());
            assert!(wait_until(Duration::from_secs(5), || agent.running()));

            agent.stop();
            handle.join().unwrap().unwrap();
        });

        assert!(!agent.running());
        assert_eq!(
            agent.adapter().init_socket().as_deref(),
            Some("tcp:localhost:705")
        );
        assert_eq!(
            agent.adapter().registrations(),
            vec![("uptime".to_string(), oid!(1, 3, 6, 1, 4, 1, 898889, 1))]
        );
    }

    #[test]
    fn run_while_running_fails() {
        let agent = Subagent::builder(MockMaster::new()).build();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| agent.run());
            assert!(wait_until(Duration::from_secs(5), || agent.running()));

            match agent.run() {
                Err(e) => assert!(matches!(*e, Error::AlreadyRunning)),
                Ok(()) => panic!("second run should have failed"),
            }

            agent.stop();
            handle.join().unwrap().unwrap();
        });
    }

    #[test]
    fn run_can_be_repeated_after_stop() {
        let agent = Subagent::builder(MockMaster::new()).build();

        for _ in 0..2 {
            std::thread::scope(|scope| {
                let handle = scope.spawn(|| agent.run());
                assert!(wait_until(Duration::from_secs(5), || agent.running()));
                agent.stop();
                handle.join().unwrap().unwrap();
            });
        }
    }

    #[test]
    fn failed_init_can_be_retried() {
        let adapter = MockMaster::new();
        adapter.fail_next_init("master not reachable");
        let agent = Subagent::builder(adapter).build();

        assert!(agent.run().is_err());
        assert!(!agent.running());

        // Init did not latch; the next run connects.
        std::thread::scope(|scope| {
            let handle = scope.spawn(|| agent.run());
            assert!(wait_until(Duration::from_secs(5), || agent.running()));
            agent.stop();
            handle.join().unwrap().unwrap();
        });
        assert!(agent.adapter().init_socket().is_some());
    }
}
