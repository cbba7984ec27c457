#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Dataflow Actors
//!
//! > **Asynchronous message-passing actors wired into a dataflow graph.**
//!
//! Each actor owns a behavior with two hooks, one for results and one for
//! exceptions. Actors are linked into a directed graph; whatever a hook emits is
//! broadcast to every downstream actor, or kept locally when the actor has no
//! downstream links. An [`ActorSystem`](runtime::ActorSystem) runs the whole
//! graph for a fixed wall-clock budget, lets callers inject input into source
//! actors and streams persisted output out of sink actors.
//!
//! ## 🚀 Core Concepts
//!
//! ### Two lanes per actor
//! Every actor has a result inbox and an exception inbox, each drained by its own
//! loop. Both loops share the behavior through `&self`, so a slow exception hook
//! never blocks results (and vice versa).
//!
//! ### Handles, not pointers
//! Actors refer to their neighbours by [`ActorId`](framework::ActorId). The
//! [`ActorRegistry`](framework::ActorRegistry) resolves ids when outputs are
//! flushed, which keeps the graph free of reference cycles.
//!
//! ### Mocking
//! [`framework::mock`] has recording behaviors for asserting what reached an
//! actor without writing a behavior by hand.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Messages, mailboxes, behaviors, actors and routing.
//! - **Key items**: [`ActorBehavior`](framework::ActorBehavior), [`Actor`](framework::Actor), [`Output`](framework::Output).
//!
//! ### 2. The Orchestrator ([`runtime`])
//! Topology inference, the run loop, configuration and logging setup.
//! - **Key items**: [`ActorSystem`](runtime::ActorSystem), [`SystemConfig`](runtime::SystemConfig).
//!
//! ### 3. The Demo ([`digits`])
//! A three-stage pipeline that splits text, parses digits and prints them.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run -- "11,22,3b3" "44,55,66"
//!
//! # Shorter run budget
//! DATAFLOW_INACTIVITY_TIMEOUT_MS=500 cargo run
//! ```

pub mod digits;
pub mod framework;
pub mod runtime;
