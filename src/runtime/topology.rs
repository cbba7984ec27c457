//! Graph topology: which actors start the flow and which ones end it.

use crate::framework::{ActorId, ActorRegistry};
use std::collections::BTreeSet;

/// Sources (no upstream) and sinks (no downstream) of an actor graph.
///
/// An isolated actor is both; an interior node is neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    sources: BTreeSet<ActorId>,
    sinks: BTreeSet<ActorId>,
}

impl Topology {
    pub fn infer(registry: &ActorRegistry) -> Self {
        let mut topology = Self::default();
        for actor in registry.iter() {
            if actor.is_source() {
                topology.sources.insert(actor.id());
            }
            if actor.is_sink() {
                topology.sinks.insert(actor.id());
            }
        }
        topology
    }

    pub fn is_source(&self, id: ActorId) -> bool {
        self.sources.contains(&id)
    }

    pub fn is_sink(&self, id: ActorId) -> bool {
        self.sinks.contains(&id)
    }

    pub fn sources(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.sources.iter().copied()
    }

    pub fn sinks(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.sinks.iter().copied()
    }
}
