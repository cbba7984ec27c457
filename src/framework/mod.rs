//! Actor building blocks.
//!
//! This module provides everything an actor is made of, independent of how a
//! system schedules it.
//!
//! # Main Components
//!
//! - [`Message`], [`Payload`], [`Fault`] - What travels through mailboxes
//! - [`Mailbox`] - Unbounded FIFO with blocking pop
//! - [`ActorBehavior`] - The two processing hooks an actor type implements
//! - [`Output`] - Collector filled by a hook
//! - [`Actor`] - Behavior plus mailboxes plus links
//! - [`Route`] - Broadcast to downstream or persist locally
//! - [`ActorRegistry`] - Arena that resolves [`ActorId`]s
//! - [`FrameworkError`] - Errors the runtime itself raises
//!
//! # Testing
//!
//! See the [`mock`] module for recording behaviors.

pub mod actor;
pub mod behavior;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod mock;
pub mod output;
pub mod registry;
pub mod route;

pub use actor::{connect, Actor, ActorId};
pub use behavior::{from_fn, ActorBehavior, FnBehavior};
pub use error::FrameworkError;
pub use mailbox::Mailbox;
pub use message::{
    ExceptionMessage, Fault, LaneKind, Lanes, Message, OutputKind, Payload, ResultMessage,
};
pub use output::Output;
pub use registry::ActorRegistry;
pub use route::Route;
