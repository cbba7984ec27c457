//! # Framework Errors
//!
//! This module defines the common error types used throughout the actor runtime.
//! Failures raised by user behaviors travel as [`Fault`](crate::framework::Fault)s;
//! everything the runtime itself rejects is a [`FrameworkError`].

use crate::framework::actor::ActorId;

/// Errors that can occur within the actor runtime itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    /// A behavior did not override a required hook.
    #[error("Hook not implemented: {hook}")]
    NotImplemented { hook: &'static str },
    #[error("Unknown actor: {0}")]
    UnknownActor(ActorId),
    #[error("Actor registered twice: {0}")]
    DuplicateActor(ActorId),
    #[error("Link from {from} points at {to}, which is not part of the system")]
    DanglingLink { from: ActorId, to: ActorId },
    /// External input may only be injected into actors without upstream links.
    #[error("Actor {0} has upstream links and cannot accept external input")]
    NotASource(ActorId),
    /// Only actors without downstream links persist their outputs.
    #[error("Actor {0} has downstream links and never persists outputs")]
    NotASink(ActorId),
    #[error("Actor system already started")]
    AlreadyStarted,
    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}
