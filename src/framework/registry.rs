//! # Actor Registry
//!
//! The arena every actor of a system lives in. Links between actors are ids;
//! the registry is what turns an id back into an actor.

use crate::framework::actor::{Actor, ActorId};
use crate::framework::error::FrameworkError;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct ActorRegistry {
    actors: HashMap<ActorId, Arc<Actor>>,
    // Registration order, so iteration is stable for logs and task spawning.
    order: Vec<ActorId>,
}

impl ActorRegistry {
    /// Takes ownership of a fully wired set of actors.
    ///
    /// Every link must point at an actor of the same set.
    pub fn new(actors: Vec<Actor>) -> Result<Self, FrameworkError> {
        let mut registry = Self {
            actors: HashMap::with_capacity(actors.len()),
            order: Vec::with_capacity(actors.len()),
        };

        for actor in actors {
            let id = actor.id();
            if registry.actors.contains_key(&id) {
                return Err(FrameworkError::DuplicateActor(id));
            }
            registry.order.push(id);
            registry.actors.insert(id, Arc::new(actor));
        }

        for actor in registry.iter() {
            for to in actor.downstream().chain(actor.upstream()) {
                if !registry.actors.contains_key(&to) {
                    return Err(FrameworkError::DanglingLink {
                        from: actor.id(),
                        to,
                    });
                }
            }
        }

        Ok(registry)
    }

    pub fn get(&self, id: ActorId) -> Option<&Arc<Actor>> {
        self.actors.get(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Actors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Actor>> + '_ {
        self.order.iter().filter_map(|id| self.actors.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::behavior::from_fn;
    use crate::framework::message::{Fault, Payload};
    use crate::framework::output::Output;

    fn noop(name: &str) -> Actor {
        Actor::new(
            name,
            from_fn(|_payload: Payload| async move { Ok::<_, Fault>(Output::new()) }),
        )
    }

    #[test]
    fn test_registers_in_order() {
        let actors = vec![noop("a"), noop("b"), noop("c")];
        let ids: Vec<_> = actors.iter().map(Actor::id).collect();
        let registry = ActorRegistry::new(actors).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.iter().map(|a| a.id()).collect::<Vec<_>>(), ids);
        assert!(ids.iter().all(|id| registry.contains(*id)));
    }

    #[test]
    fn test_rejects_link_outside_the_set() {
        let mut a = noop("a");
        let mut outsider = noop("outsider");
        a.connect(&mut outsider);
        let (a_id, outsider_id) = (a.id(), outsider.id());

        let err = ActorRegistry::new(vec![a]).unwrap_err();
        assert_eq!(
            err,
            FrameworkError::DanglingLink {
                from: a_id,
                to: outsider_id
            }
        );
    }
}
