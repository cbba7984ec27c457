//! # Actor System
//!
//! The [`ActorSystem`] owns a fully wired set of actors, schedules two loops per
//! actor, and exposes the external edges of the graph: injection into sources
//! and streaming out of sinks.
//!
//! # Termination
//!
//! Actors block on empty mailboxes forever, so a graph has no natural "done"
//! signal. [`ActorSystem::run`] therefore runs for a fixed wall-clock budget
//! (`inactivity_timeout`) and then cancels every loop. Size the budget to
//! exceed the end-to-end latency of the pipeline. [`ActorSystem::kill`] ends
//! the run early.
//!
//! # Failure Policy
//!
//! A hook that returns an error (or panics) ends only the loop it ran in. The
//! rest of the actor and the rest of the system keep going, and the failure is
//! reported in [`RunReport::failures`] once `run()` returns.

use crate::framework::actor::{run_lane, LaneFailure};
use crate::framework::{
    Actor, ActorId, ActorRegistry, ExceptionMessage, Fault, FrameworkError, LaneKind, OutputKind,
    Payload, ResultMessage,
};
use crate::runtime::config::SystemConfig;
use crate::runtime::topology::Topology;
use futures::stream::{self, Stream};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A loop that stopped before the run was over.
#[derive(Debug, thiserror::Error)]
#[error("{kind} loop of {name} ({actor}) failed: {fault}")]
pub struct LoopFailure {
    pub actor: ActorId,
    pub name: String,
    pub kind: OutputKind,
    pub fault: Fault,
}

/// Summary of one [`ActorSystem::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of loops spawned (two per actor).
    pub tasks: usize,
    /// Loops that ended because their hook failed.
    pub failures: Vec<LoopFailure>,
    /// `true` when [`ActorSystem::kill`] ended the run before its budget.
    pub stopped_early: bool,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct ActorSystem {
    registry: Arc<ActorRegistry>,
    topology: Topology,
    config: SystemConfig,
    cancel: CancellationToken,
    started: AtomicBool,
}

impl ActorSystem {
    /// Takes ownership of a wired set of actors.
    ///
    /// Links are frozen from here on: `connect` needs `&mut Actor`, and the
    /// system keeps the actors behind shared references.
    pub fn new(actors: Vec<Actor>, config: SystemConfig) -> Result<Self, FrameworkError> {
        let registry = Arc::new(ActorRegistry::new(actors)?);
        let topology = Topology::infer(&registry);
        Ok(Self {
            registry,
            topology,
            config,
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.registry.get(id).map(|actor| &**actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.registry.iter().map(|actor| &**actor)
    }

    /// Feeds a result into a source actor. Rejects actors with upstream links.
    pub fn inject_result(&self, id: ActorId, message: ResultMessage) -> Result<(), FrameworkError> {
        self.source(id)?.accept_result(message);
        Ok(())
    }

    /// Feeds an exception into a source actor. Rejects actors with upstream links.
    pub fn inject_exception(
        &self,
        id: ActorId,
        message: ExceptionMessage,
    ) -> Result<(), FrameworkError> {
        self.source(id)?.accept_exception(message);
        Ok(())
    }

    /// Ends the current (or next) run early.
    pub fn kill(&self) {
        info!("Kill requested");
        self.cancel.cancel();
    }

    pub fn is_killed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs every actor for the configured inactivity budget, then cancels
    /// all loops. Returns once every loop has stopped.
    ///
    /// A system runs at most once.
    pub async fn run(&self) -> Result<RunReport, FrameworkError> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("run() called twice");
            return Err(FrameworkError::AlreadyStarted);
        }

        let budget = self.config.inactivity_timeout();
        info!(
            actors = self.registry.len(),
            sources = ?self.names(self.topology.sources()),
            sinks = ?self.names(self.topology.sinks()),
            ?budget,
            "Actor system starting"
        );

        let mut tasks = JoinSet::new();
        for actor in self.registry.iter() {
            tasks.spawn(supervise::<Payload>(
                actor.clone(),
                self.registry.clone(),
                self.cancel.clone(),
            ));
            tasks.spawn(supervise::<Fault>(
                actor.clone(),
                self.registry.clone(),
                self.cancel.clone(),
            ));
        }

        let mut report = RunReport {
            tasks: tasks.len(),
            ..RunReport::default()
        };

        // The loops never finish on their own; this wait is a fixed budget,
        // not a completion signal.
        let deadline = tokio::time::sleep(budget);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("Run stopped early");
                    report.stopped_early = true;
                    break;
                }
                _ = &mut deadline => {
                    info!(?budget, "Inactivity timeout elapsed");
                    break;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    match joined {
                        Ok(Err(failure)) => {
                            error!(error = %failure, "Actor loop failed");
                            report.failures.push(failure);
                        }
                        Ok(Ok(())) => {}
                        Err(e) => warn!(error = %e, "Actor task ended abnormally"),
                    }
                }
            }
        }

        // Loops stop at their next mailbox wait; anything stuck inside a hook
        // is aborted by the shutdown.
        self.cancel.cancel();
        tasks.shutdown().await;

        info!(
            tasks = report.tasks,
            failures = report.failures.len(),
            "Actor system stopped"
        );
        Ok(report)
    }

    /// Lazily reads the persisted results of a sink.
    ///
    /// Each pull waits up to `timeout` (default: the configured drain timeout);
    /// the stream ends the first time a pull times out. Items are consumed as
    /// they are read.
    pub fn stream_results(
        &self,
        id: ActorId,
        timeout: Option<Duration>,
    ) -> Result<impl Stream<Item = Payload> + Send + 'static, FrameworkError> {
        self.stream_lane::<Payload>(id, timeout)
    }

    /// Lazily reads the persisted exceptions of a sink. See [`ActorSystem::stream_results`].
    pub fn stream_exceptions(
        &self,
        id: ActorId,
        timeout: Option<Duration>,
    ) -> Result<impl Stream<Item = Fault> + Send + 'static, FrameworkError> {
        self.stream_lane::<Fault>(id, timeout)
    }

    /// Takes whatever results a sink has persisted right now, without waiting.
    pub fn drain_results(&self, id: ActorId) -> Result<Vec<Payload>, FrameworkError> {
        self.drain_lane::<Payload>(id)
    }

    /// Takes whatever exceptions a sink has persisted right now, without waiting.
    pub fn drain_exceptions(&self, id: ActorId) -> Result<Vec<Fault>, FrameworkError> {
        self.drain_lane::<Fault>(id)
    }

    fn stream_lane<T: LaneKind>(
        &self,
        id: ActorId,
        timeout: Option<Duration>,
    ) -> Result<impl Stream<Item = T> + Send + 'static, FrameworkError> {
        let actor = self.sink(id)?.clone();
        let timeout = timeout.unwrap_or_else(|| self.config.drain_timeout());
        debug!(actor = %actor.name(), kind = %T::KIND, ?timeout, "Streaming sink");

        Ok(stream::unfold(actor, move |actor| async move {
            let message = T::lane(actor.persisted_lanes()).pop_timeout(timeout).await?;
            Some((message.into_payload(), actor))
        }))
    }

    fn drain_lane<T: LaneKind>(&self, id: ActorId) -> Result<Vec<T>, FrameworkError> {
        let actor = self.sink(id)?;
        Ok(T::lane(actor.persisted_lanes())
            .drain()
            .into_iter()
            .map(|message| message.into_payload())
            .collect())
    }

    fn source(&self, id: ActorId) -> Result<&Arc<Actor>, FrameworkError> {
        let actor = self
            .registry
            .get(id)
            .ok_or(FrameworkError::UnknownActor(id))?;
        if !self.topology.is_source(id) {
            warn!(actor = %actor.name(), "Rejected external input for non-source actor");
            return Err(FrameworkError::NotASource(id));
        }
        Ok(actor)
    }

    fn sink(&self, id: ActorId) -> Result<&Arc<Actor>, FrameworkError> {
        let actor = self
            .registry
            .get(id)
            .ok_or(FrameworkError::UnknownActor(id))?;
        if !self.topology.is_sink(id) {
            warn!(actor = %actor.name(), "Rejected read from non-sink actor");
            return Err(FrameworkError::NotASink(id));
        }
        Ok(actor)
    }

    fn names(&self, ids: impl Iterator<Item = ActorId>) -> Vec<&str> {
        ids.filter_map(|id| self.registry.get(id))
            .map(|actor| actor.name())
            .collect()
    }
}

/// Runs one lane and turns hook errors and panics into a [`LoopFailure`].
async fn supervise<T: LaneKind>(
    actor: Arc<Actor>,
    registry: Arc<ActorRegistry>,
    cancel: CancellationToken,
) -> Result<(), LoopFailure> {
    let lane = AssertUnwindSafe(run_lane::<T>(actor.clone(), registry, cancel));
    let (kind, fault) = match lane.catch_unwind().await {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(LaneFailure { kind, fault })) => (kind, fault),
        Err(panic) => (
            T::KIND,
            Fault::msg(format!("hook panicked: {}", panic_message(panic.as_ref()))),
        ),
    };
    Err(LoopFailure {
        actor: actor.id(),
        name: actor.name().to_owned(),
        kind,
        fault,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(text) = panic.downcast_ref::<&'static str>() {
        return text;
    }
    panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .unwrap_or("unknown panic")
}
