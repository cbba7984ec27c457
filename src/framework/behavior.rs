//! # ActorBehavior Trait
//!
//! The `ActorBehavior` trait is the business logic of an actor. The runtime owns
//! the plumbing (mailboxes, loops, routing); a behavior only turns one input into
//! an [`Output`].
//!
//! # Provided Methods (Hooks)
//! Both hooks have default implementations:
//! - [`ActorBehavior::process_result`] fails with
//!   [`FrameworkError::NotImplemented`]. Every useful actor overrides it.
//! - [`ActorBehavior::process_exception`] saves the incoming fault unchanged, so
//!   exceptions flow through an actor untouched unless it decides otherwise.
//!
//! # Concurrency
//! The result loop and the exception loop of one actor run concurrently and
//! share the same behavior through `&self`. Hooks must not assume they are
//! mutually exclusive; use interior mutability with proper synchronization if a
//! behavior keeps state.

use crate::framework::error::FrameworkError;
use crate::framework::message::{Fault, Payload};
use crate::framework::output::Output;
use async_trait::async_trait;
use std::future::Future;

#[async_trait]
pub trait ActorBehavior: Send + Sync + 'static {
    /// Handle one message from the result inbox.
    ///
    /// Returning `Err` is fatal for the actor's result loop: the runtime does
    /// not retry and does not turn the error into an exception output. Call
    /// [`Output::save_exception`] instead when the failure should flow downstream.
    async fn process_result(&self, _payload: Payload) -> Result<Output, Fault> {
        Err(FrameworkError::NotImplemented {
            hook: "process_result",
        }
        .into())
    }

    /// Handle one message from the exception inbox.
    async fn process_exception(&self, fault: Fault) -> Result<Output, Fault> {
        let mut output = Output::new();
        output.save_exception(fault);
        Ok(output)
    }
}

/// Adapts a plain async function into an [`ActorBehavior`].
///
/// This is the "given input, produce output or fail" contract outer layers
/// (pipelines, map/reduce helpers) build on. Exceptions keep the default
/// pass-through handling.
pub struct FnBehavior<F> {
    handler: F,
}

/// Builds a behavior from an async closure over result payloads.
///
/// ```rust
/// use dataflow_actors::framework::{from_fn, Fault, Output, Payload};
///
/// let doubler = from_fn(|payload: Payload| async move {
///     let mut output = Output::new();
///     if let Some(n) = payload.downcast_ref::<u32>() {
///         output.save_result(n * 2);
///     }
///     Ok::<_, Fault>(output)
/// });
/// # let _ = doubler;
/// ```
pub fn from_fn<F, Fut>(handler: F) -> FnBehavior<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Output, Fault>> + Send + 'static,
{
    FnBehavior { handler }
}

#[async_trait]
impl<F, Fut> ActorBehavior for FnBehavior<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Output, Fault>> + Send + 'static,
{
    async fn process_result(&self, payload: Payload) -> Result<Output, Fault> {
        (self.handler)(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl ActorBehavior for Bare {}

    #[tokio::test]
    async fn test_default_process_result_is_not_implemented() {
        let fault = Bare.process_result(Payload::new(1u8)).await.unwrap_err();
        assert_eq!(
            fault.downcast_ref::<FrameworkError>(),
            Some(&FrameworkError::NotImplemented {
                hook: "process_result"
            })
        );
    }

    #[tokio::test]
    async fn test_default_process_exception_passes_fault_through() {
        let output = Bare.process_exception(Fault::msg("upstream broke")).await.unwrap();
        assert!(output.results().is_empty());
        assert_eq!(output.exceptions().len(), 1);
        assert_eq!(output.exceptions()[0].to_string(), "upstream broke");
    }

    #[tokio::test]
    async fn test_fn_behavior_runs_closure() {
        let upper = from_fn(|payload: Payload| async move {
            let mut output = Output::new();
            match payload.as_str() {
                Some(text) => output.save_result(text.to_uppercase()),
                None => output.save_exception(Fault::msg("not text")),
            };
            Ok::<_, Fault>(output)
        });

        let output = upper.process_result(Payload::new("abc")).await.unwrap();
        assert_eq!(output.results()[0].as_str(), Some("ABC"));

        let output = upper.process_result(Payload::new(5u8)).await.unwrap();
        assert_eq!(output.exceptions()[0].to_string(), "not text");
    }
}
