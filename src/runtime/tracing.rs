//! # Observability & Tracing
//!
//! The runtime logs through `tracing` with structured fields:
//!
//! - **System lifecycle** (`info`): start with sources/sinks, budget elapsed,
//!   early kill, shutdown with failure count.
//! - **Per-message flow** (`debug`): loop start, processing, forward/persist
//!   decisions with the target actor and lane.
//! - **Failures** (`warn`/`error`): failing hooks, rejected injections and reads.
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Every message hop
//! RUST_LOG=dataflow_actors=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a single chunk of the digit pipeline looks like:
//!
//! ```text
//! DEBUG Processing actor="splitter" kind=result payload=Payload("11,22,3b3")
//! DEBUG Forward to="digits" kind=result
//! DEBUG Processing actor="digits" kind=result payload=Payload("3b3")
//! DEBUG Forward to="printer" kind=exception
//! DEBUG Persist actor="printer" kind=result
//! ```

/// Initializes the tracing/logging infrastructure for the application.
///
/// Log levels come from the `RUST_LOG` environment variable. The compact
/// format hides module paths; the `actor` field already says where a line
/// comes from.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
