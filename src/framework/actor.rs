//! # Actors
//!
//! An [`Actor`] is the unit of concurrent computation. It owns:
//!
//! - an **inbox** (one mailbox per lane) that upstream actors and external
//!   callers push into,
//! - **staging buffers** where hook outputs wait to be flushed,
//! - **persisted outputs** where a sink keeps what it produced for external
//!   readers,
//! - the ids of its upstream and downstream neighbours.
//!
//! Actors never hold references to each other. Links are plain [`ActorId`]s that
//! are resolved through the [`ActorRegistry`] owned by the system, so cyclic
//! graphs do not turn into ownership cycles.
//!
//! # The Processing Loop
//!
//! Once the system runs, every actor gets two loops, one per lane:
//!
//! ```text
//! Idle ──(mailbox non-empty)──► Processing ──(hook returns)──► Flushing ──(buffers drained)──► Idle
//! ```
//!
//! There is no terminal state. A loop ends when the run is cancelled, or when
//! its hook fails.

use crate::framework::behavior::ActorBehavior;
use crate::framework::message::{
    ExceptionMessage, Fault, LaneKind, Lanes, Message, OutputKind, Payload, ResultMessage,
};
use crate::framework::output::Output;
use crate::framework::registry::ActorRegistry;
use crate::framework::route::Route;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Unique, immutable actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.0.simple())
    }
}

/// A behavior plus the mailboxes and links that let it take part in a graph.
///
/// Equality and hashing are defined by [`ActorId`] alone.
pub struct Actor {
    id: ActorId,
    name: String,
    behavior: Box<dyn ActorBehavior>,
    inbox: Lanes,
    staged: Lanes,
    persisted: Lanes,
    // Held across stage and flush so the two lanes never interleave deliveries.
    flush_lock: Mutex<()>,
    upstream: BTreeSet<ActorId>,
    downstream: BTreeSet<ActorId>,
}

impl Actor {
    pub fn new(name: impl Into<String>, behavior: impl ActorBehavior) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            behavior: Box::new(behavior),
            inbox: Lanes::new(),
            staged: Lanes::new(),
            persisted: Lanes::new(),
            flush_lock: Mutex::new(()),
            upstream: BTreeSet::new(),
            downstream: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn upstream(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.upstream.iter().copied()
    }

    pub fn downstream(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.downstream.iter().copied()
    }

    /// No upstream links: external input enters the graph here.
    pub fn is_source(&self) -> bool {
        self.upstream.is_empty()
    }

    /// No downstream links: outputs are persisted for external readers.
    pub fn is_sink(&self) -> bool {
        self.downstream.is_empty()
    }

    /// Adds a directed link `self -> downstream` and returns `downstream`,
    /// so chains read left to right:
    ///
    /// ```rust
    /// use dataflow_actors::framework::{from_fn, Actor, Fault, Output, Payload};
    ///
    /// let echo = || from_fn(|p: Payload| async move {
    ///     let mut out = Output::new();
    ///     out.save_result(p);
    ///     Ok::<_, Fault>(out)
    /// });
    /// let mut a = Actor::new("a", echo());
    /// let mut b = Actor::new("b", echo());
    /// let mut c = Actor::new("c", echo());
    /// a.connect(&mut b).connect(&mut c);
    ///
    /// assert!(a.is_source() && c.is_sink());
    /// assert!(!b.is_source() && !b.is_sink());
    /// ```
    pub fn connect<'a>(&mut self, downstream: &'a mut Actor) -> &'a mut Actor {
        self.downstream.insert(downstream.id);
        downstream.upstream.insert(self.id);
        downstream
    }

    /// Enqueues a message on the result inbox.
    ///
    /// External callers should only feed source actors; go through
    /// [`ActorSystem::inject_result`](crate::runtime::ActorSystem::inject_result)
    /// to have that checked.
    pub fn accept_result(&self, message: ResultMessage) {
        self.inbox.results.push(message);
    }

    /// Enqueues a message on the exception inbox.
    pub fn accept_exception(&self, message: ExceptionMessage) {
        self.inbox.exceptions.push(message);
    }

    /// Messages waiting in the inbox of the given lane.
    pub fn pending(&self, kind: OutputKind) -> usize {
        match kind {
            OutputKind::Result => self.inbox.results.len(),
            OutputKind::Exception => self.inbox.exceptions.len(),
        }
    }

    /// Outputs persisted on the given lane and not yet read.
    pub fn persisted(&self, kind: OutputKind) -> usize {
        match kind {
            OutputKind::Result => self.persisted.results.len(),
            OutputKind::Exception => self.persisted.exceptions.len(),
        }
    }

    pub(crate) fn inbox(&self) -> &Lanes {
        &self.inbox
    }

    pub(crate) fn persisted_lanes(&self) -> &Lanes {
        &self.persisted
    }

    /// Moves a hook's output into the staging buffers, preserving call order.
    pub(crate) fn stage(&self, output: Output) {
        let (results, exceptions) = output.into_parts();
        for payload in results {
            self.staged.results.push(Message::from_payload(payload));
        }
        for fault in exceptions {
            self.staged.exceptions.push(Message::from_payload(fault));
        }
    }

    /// Stages `output` and routes it in one step.
    pub(crate) fn emit(&self, output: Output, registry: &ActorRegistry) {
        let _guard = self.flush_lock.lock();
        self.stage(output);
        self.flush(registry);
    }

    /// Routes every staged output, result lane first.
    pub(crate) fn flush(&self, registry: &ActorRegistry) {
        self.flush_lane::<Payload>(registry);
        self.flush_lane::<Fault>(registry);
    }

    fn flush_lane<T: LaneKind>(&self, registry: &ActorRegistry) {
        while let Some(message) = T::lane(&self.staged).try_pop() {
            // Re-selected per message: routing follows the links as they are now.
            Route::select(self, registry).deliver(message);
        }
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("upstream", &self.upstream)
            .field("downstream", &self.downstream)
            .finish_non_exhaustive()
    }
}

/// Adds a directed link `upstream -> downstream`.
pub fn connect(upstream: &mut Actor, downstream: &mut Actor) {
    upstream.connect(downstream);
}

/// Why a lane loop stopped on its own.
pub(crate) struct LaneFailure {
    pub kind: OutputKind,
    pub fault: Fault,
}

/// Runs one lane of an actor until `cancel` fires or the hook fails.
pub(crate) async fn run_lane<T: LaneKind>(
    actor: Arc<Actor>,
    registry: Arc<ActorRegistry>,
    cancel: CancellationToken,
) -> Result<(), LaneFailure> {
    let kind = T::KIND;
    debug!(actor = %actor.name, id = %actor.id, %kind, "Loop started");

    loop {
        let message = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(actor = %actor.name, %kind, "Loop cancelled");
                return Ok(());
            }
            message = T::lane(&actor.inbox).pop() => message,
        };

        let payload = message.into_payload();
        debug!(actor = %actor.name, %kind, ?payload, "Processing");

        let output = match T::invoke(actor.behavior.as_ref(), payload).await {
            Ok(output) => output,
            Err(fault) => {
                warn!(actor = %actor.name, id = %actor.id, %kind, error = %fault, "Hook failed");
                return Err(LaneFailure { kind, fault });
            }
        };

        actor.emit(output, &registry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::behavior::from_fn;
    use std::time::Duration;

    fn echo() -> impl ActorBehavior {
        from_fn(|payload: Payload| async move {
            let mut output = Output::new();
            output.save_result(payload);
            Ok::<_, Fault>(output)
        })
    }

    fn registry_of(actors: Vec<Actor>) -> Arc<ActorRegistry> {
        Arc::new(ActorRegistry::new(actors).unwrap())
    }

    async fn wait_until(check: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[test]
    fn test_connect_registers_both_directions() {
        let mut a = Actor::new("a", echo());
        let mut b = Actor::new("b", echo());
        connect(&mut a, &mut b);

        assert_eq!(a.downstream().collect::<Vec<_>>(), vec![b.id()]);
        assert_eq!(b.upstream().collect::<Vec<_>>(), vec![a.id()]);
        assert!(a.is_source() && !a.is_sink());
        assert!(!b.is_source() && b.is_sink());
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = Actor::new("same", echo());
        let b = Actor::new("same", echo());
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn test_flush_persists_when_no_downstream() {
        let actor = Actor::new("sink", echo());
        let id = actor.id();
        let registry = registry_of(vec![actor]);
        let actor = registry.get(id).unwrap();

        let mut output = Output::new();
        output.save_result(1u8).save_exception(Fault::msg("x"));
        actor.stage(output);
        actor.flush(&registry);

        assert_eq!(actor.persisted(OutputKind::Result), 1);
        assert_eq!(actor.persisted(OutputKind::Exception), 1);
    }

    #[test]
    fn test_flush_broadcasts_to_every_downstream() {
        let mut a = Actor::new("a", echo());
        let mut b = Actor::new("b", echo());
        let mut c = Actor::new("c", echo());
        a.connect(&mut b);
        a.connect(&mut c);
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());
        let registry = registry_of(vec![a, b, c]);
        let a = registry.get(a_id).unwrap();

        let mut output = Output::new();
        output.save_result("x").save_exception(Fault::msg("e"));
        a.stage(output);
        a.flush(&registry);

        for id in [b_id, c_id] {
            let target = registry.get(id).unwrap();
            assert_eq!(target.pending(OutputKind::Result), 1);
            assert_eq!(target.pending(OutputKind::Exception), 1);
        }
        assert_eq!(a.persisted(OutputKind::Result), 0);
        assert_eq!(a.persisted(OutputKind::Exception), 0);
    }

    #[tokio::test]
    async fn test_downstream_receives_results_in_order() {
        let mut a = Actor::new("a", echo());
        let mut b = Actor::new("b", echo());
        a.connect(&mut b);
        let (a_id, b_id) = (a.id(), b.id());
        let registry = registry_of(vec![a, b]);
        let a = registry.get(a_id).unwrap().clone();
        let b = registry.get(b_id).unwrap().clone();

        for i in 0..10u32 {
            a.accept_result(Message::new(i));
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_lane::<Payload>(a, registry.clone(), cancel.clone()));

        wait_until(|| b.pending(OutputKind::Result) == 10).await;
        cancel.cancel();
        assert!(task.await.unwrap().is_ok());

        let seen: Vec<u32> = b
            .inbox()
            .results
            .drain()
            .into_iter()
            .map(|m| *m.payload().downcast_ref::<u32>().unwrap())
            .collect();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    /// Emits `per_call` numbered results per input, and as many faults per
    /// incoming fault.
    struct Burst {
        next: std::sync::atomic::AtomicU32,
        per_call: u32,
    }

    #[async_trait::async_trait]
    impl ActorBehavior for Burst {
        async fn process_result(&self, _payload: Payload) -> Result<Output, Fault> {
            let mut output = Output::new();
            let start = self
                .next
                .fetch_add(self.per_call, std::sync::atomic::Ordering::SeqCst);
            for n in start..start + self.per_call {
                output.save_result(n);
            }
            Ok(output)
        }

        async fn process_exception(&self, fault: Fault) -> Result<Output, Fault> {
            let mut output = Output::new();
            for _ in 0..self.per_call {
                output.save_exception(fault.clone());
            }
            Ok(output)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_both_lanes_flushing_keep_result_order() {
        let burst = Burst {
            next: std::sync::atomic::AtomicU32::new(0),
            per_call: 200,
        };
        let mut a = Actor::new("burst", burst);
        let mut b = Actor::new("b", echo());
        a.connect(&mut b);
        let (a_id, b_id) = (a.id(), b.id());
        let registry = registry_of(vec![a, b]);
        let a = registry.get(a_id).unwrap().clone();
        let b = registry.get(b_id).unwrap().clone();

        for _ in 0..20 {
            a.accept_result(Message::new(0u8));
            a.accept_exception(Message::failure(Fault::msg("e")));
        }

        let cancel = CancellationToken::new();
        let results = tokio::spawn(run_lane::<Payload>(a.clone(), registry.clone(), cancel.clone()));
        let exceptions = tokio::spawn(run_lane::<Fault>(a.clone(), registry.clone(), cancel.clone()));

        wait_until(|| {
            b.pending(OutputKind::Result) == 4_000 && b.pending(OutputKind::Exception) == 4_000
        })
        .await;
        cancel.cancel();
        assert!(results.await.unwrap().is_ok());
        assert!(exceptions.await.unwrap().is_ok());

        let seen: Vec<u32> = b
            .inbox()
            .results
            .drain()
            .into_iter()
            .map(|m| *m.payload().downcast_ref::<u32>().unwrap())
            .collect();
        assert_eq!(seen, (0..4_000).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_hook_failure_ends_only_that_lane() {
        let failing = from_fn(|_payload: Payload| async move { Err::<Output, _>(Fault::msg("boom")) });
        let actor = Actor::new("failing", failing);
        let id = actor.id();
        let registry = registry_of(vec![actor]);
        let actor = registry.get(id).unwrap().clone();

        actor.accept_result(Message::new(1u8));
        actor.accept_exception(Message::failure(Fault::msg("passes")));

        let cancel = CancellationToken::new();
        let results = tokio::spawn(run_lane::<Payload>(actor.clone(), registry.clone(), cancel.clone()));
        let exceptions = tokio::spawn(run_lane::<Fault>(actor.clone(), registry.clone(), cancel.clone()));

        let failure = results.await.unwrap().err().expect("result lane should fail");
        assert_eq!(failure.kind, OutputKind::Result);
        assert_eq!(failure.fault.to_string(), "boom");

        // The exception lane keeps working after the result lane died.
        wait_until(|| actor.persisted(OutputKind::Exception) == 1).await;
        assert!(!exceptions.is_finished());
        cancel.cancel();
        assert!(exceptions.await.unwrap().is_ok());
    }
}
