//! The pass-persist extension engine.
//!
//! net-snmp's `pass_persist` directive hands a subtree of the MIB to a
//! long-lived child process and speaks a line protocol to it over
//! stdin/stdout: `PING`/`PONG`, then `get`/`getnext` commands each followed
//! by one OID line. [`PassPersistExtension`] implements the answering side
//! of that protocol over a tree of [`SmiNode`]s produced by a user-supplied
//! refresh callback.
//!
//! The callback is invoked once when [`serve`](PassPersistExtension::serve)
//! starts, and again every time the registered root OID itself is
//! requested - one rebuild per snmpd poll cycle, giving the poll a
//! consistent snapshot. The tree reference is replaced before either
//! walker runs, so a refresh always happens-before the lookups that answer
//! the request which triggered it.
//!
//! # Example
//!
//! ```no_run
//! use snmp_subagent::passpersist::PassPersistExtension;
//! use snmp_subagent::smi::{SmiLeaf, SmiNode};
//! use snmp_subagent::oid;
//!
//! #[tokio::main]
//! async fn main() -> snmp_subagent::Result<()> {
//!     let root = oid!(1, 3, 6, 1, 4, 1, 898889);
//!     let mut extension = PassPersistExtension::new(root, || {
//!         let mut tree = SmiNode::subtree();
//!         tree.add_child(SmiNode::from(SmiLeaf::integer(42)));
//!         tree
//!     });
//!
//!     extension
//!         .serve(tokio::io::stdin(), tokio::io::stdout())
//!         .await
//! }
//! ```

use crate::error::Result;
use crate::oid::Oid;
use crate::smi::{SmiLeaf, SmiNode};
use crate::walk::{get_leaf, next_leaf};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// The reply line for "no such object" and "end of MIB".
const NO_SUCH_REPLY: &[u8] = b"None\n";

/// Protocol states. Shutdown is terminal; protocol errors are the `Err`
/// arm of [`PassPersistExtension::handle_line`] and terminate the serve
/// loop instead of being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for a command line.
    Wait,
    /// A `get` was received; the next line is the requested OID.
    Get,
    /// A `getnext` was received; the next line is the requested OID.
    GetNext,
    /// A blank command line was received; the session is over.
    Shutdown,
}

/// A pass-persist protocol engine bound to a root OID.
///
/// The engine owns the current MIB tree. `F` is the refresh callback that
/// rebuilds it; the tree it returns is addressed relative to `root`.
pub struct PassPersistExtension<F> {
    root: Oid,
    refresh: F,
    tree: SmiNode,
    state: State,
}

impl<F> PassPersistExtension<F>
where
    F: FnMut() -> SmiNode,
{
    /// Create an engine serving the subtree registered at `root`.
    pub fn new(root: Oid, refresh: F) -> Self {
        Self {
            root,
            refresh,
            tree: SmiNode::subtree(),
            state: State::Wait,
        }
    }

    /// The root OID this extension is registered at.
    pub fn root(&self) -> &Oid {
        &self.root
    }

    /// Answer requests on `input`/`output` until the peer shuts the
    /// session down.
    ///
    /// Returns `Ok(())` on a clean shutdown (blank command line or EOF).
    /// An unparseable OID line, an OID outside the registered root, or an
    /// I/O failure terminates the loop with the error.
    pub async fn serve<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        // Initial MIB state, before any line is read.
        self.tree = (self.refresh)();
        self.state = State::Wait;

        let (line_tx, mut lines) = mpsc::channel::<String>(1);
        let (error_tx, mut errors) = mpsc::channel::<std::io::Error>(1);
        tokio::spawn(scan_input(input, line_tx, error_tx));

        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => match self.handle_line(&line, &mut output).await? {
                        State::Shutdown => {
                            tracing::debug!(
                                target: "snmp_subagent::passpersist",
                                "session shut down by peer"
                            );
                            return Ok(());
                        }
                        next => self.state = next,
                    },
                    // Input stream closed: same transition as a blank line.
                    None => return Ok(()),
                },
                error = errors.recv() => if let Some(error) = error {
                    return Err(error.into());
                },
            }
        }
    }

    /// The core protocol handling: one input line in, the next state out.
    async fn handle_line<W>(&mut self, line: &str, output: &mut W) -> Result<State>
    where
        W: AsyncWrite + Unpin,
    {
        match self.state {
            State::Wait => match line.to_ascii_lowercase().as_str() {
                "" => return Ok(State::Shutdown),
                "ping" => {
                    output.write_all(b"PONG\n").await?;
                    output.flush().await?;
                }
                "get" => return Ok(State::Get),
                "getnext" => return Ok(State::GetNext),
                other => {
                    tracing::debug!(
                        target: "snmp_subagent::passpersist",
                        "ignoring unknown command {:?}", other
                    );
                }
            },

            State::Get => {
                let oid = Oid::parse(line)?;
                let partial = self.refresh_for(&oid)?;

                // A GET must answer with the requested OID itself.
                let reply = get_leaf(&self.tree, &partial)
                    .and_then(SmiNode::value)
                    .and_then(|leaf| render_reply(&oid, leaf));
                self.emit(output, reply).await?;
            }

            State::GetNext => {
                // A GETNEXT on an existing object must skip it; on a missing
                // object it must answer with the next instance that does
                // exist. `None` here is snmpd's end-of-MIB.
                let oid = Oid::parse(line)?;
                let partial = self.refresh_for(&oid)?;

                let reply = next_leaf(&self.tree, &partial).and_then(|rel| {
                    let leaf = get_leaf(&self.tree, &rel)?.value()?;
                    render_reply(&self.root.concat(&rel), leaf)
                });
                self.emit(output, reply).await?;
            }

            State::Shutdown => return Ok(State::Shutdown),
        }

        Ok(State::Wait)
    }

    /// Refresh the tree if the registered root itself was requested, then
    /// resolve the request to a root-relative OID.
    ///
    /// The replacement happens before any walker sees the tree, so the
    /// request that triggered the refresh is answered from the new state.
    fn refresh_for(&mut self, oid: &Oid) -> Result<Oid> {
        if *oid == self.root {
            self.tree = (self.refresh)();
        }
        oid.remainder(&self.root)
    }

    async fn emit<W>(&self, output: &mut W, reply: Option<String>) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match reply {
            Some(reply) => output.write_all(reply.as_bytes()).await?,
            None => output.write_all(NO_SUCH_REPLY).await?,
        }
        output.flush().await?;
        Ok(())
    }
}

/// The three-line reply for a resolved leaf, or `None` if the leaf's type
/// has no entry in the fixed pass-persist name map (the anomaly was warned
/// about when the leaf was constructed).
fn render_reply(oid: &Oid, leaf: &SmiLeaf) -> Option<String> {
    let name = leaf.asn_type().pass_persist_name()?;
    Some(format!("{}\n{}\n{}\n", oid, name, leaf.value()))
}

/// Background line reader: yields each input line onto the line channel,
/// reports a read failure on the error channel, and closes both on EOF.
async fn scan_input<R>(input: R, lines: mpsc::Sender<String>, errors: mpsc::Sender<std::io::Error>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(input).lines();

    loop {
        match reader.next_line().await {
            Ok(Some(line)) => {
                if lines.send(line).await.is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(error) => {
                let _ = errors.send(error).await;
                return;
            }
        }
    }
}
