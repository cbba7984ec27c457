//! Runtime orchestration.
//!
//! This module turns a set of wired actors into a running system:
//!
//! - [`ActorSystem`] - Schedules every actor, enforces the run budget, exposes
//!   source injection and sink streaming
//! - [`Topology`] - Source/sink inference from the link structure
//! - [`SystemConfig`] - Timeouts, from code, serde or the environment
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod actor_system;
pub mod config;
pub mod topology;
pub mod tracing;

pub use actor_system::{ActorSystem, LoopFailure, RunReport};
pub use config::SystemConfig;
pub use topology::Topology;
pub use self::tracing::setup_tracing;
