//! # Output Routing
//!
//! Where a flushed output goes depends on the actor's links at flush time:
//!
//! - [`Route::Broadcast`]: the actor has downstream links, so every downstream
//!   actor gets its own copy on the matching inbox lane (fan-out, not load
//!   balancing).
//! - [`Route::Persist`]: the actor is a sink, so the output is appended to its
//!   own persisted queue for external readers.

use crate::framework::actor::Actor;
use crate::framework::message::{LaneKind, Message};
use crate::framework::registry::ActorRegistry;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum Route<'a> {
    Broadcast(Vec<&'a Actor>),
    Persist(&'a Actor),
}

impl<'a> Route<'a> {
    /// Picks the route for one output of `actor`.
    pub fn select(actor: &'a Actor, registry: &'a ActorRegistry) -> Self {
        if actor.is_sink() {
            return Route::Persist(actor);
        }

        let targets = actor
            .downstream()
            .filter_map(|id| {
                let target = registry.get(id);
                if target.is_none() {
                    warn!(actor = %actor.name(), downstream = %id, "Downstream actor not registered");
                }
                target.map(|target| &**target)
            })
            .collect();
        Route::Broadcast(targets)
    }

    /// Delivers one message along this route.
    pub fn deliver<T: LaneKind>(&self, message: Message<T>) {
        match self {
            Route::Broadcast(targets) => {
                for target in targets {
                    debug!(to = %target.name(), kind = %T::KIND, "Forward");
                    T::lane(target.inbox()).push(message.clone());
                }
            }
            Route::Persist(actor) => {
                debug!(actor = %actor.name(), kind = %T::KIND, "Persist");
                T::lane(actor.persisted_lanes()).push(message);
            }
        }
    }
}
