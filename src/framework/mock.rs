//! # Mock Behaviors
//!
//! Utilities for testing actor graphs without writing a behavior per test.
//!
//! A [`MockBehavior`] records every payload it is handed and then reacts in a
//! configurable way (echo, swallow, fail). Its [`MockProbe`] is a cheap handle
//! that stays with the test after the behavior has been moved into an actor.
//!
//! # Example
//! ```ignore
//! let mock = MockBehavior::echo();
//! let probe = mock.probe();
//! let actor = Actor::new("under_test", mock);
//! // ... wire and run ...
//! assert!(probe.wait_for_results(3, Duration::from_secs(1)).await);
//! probe.verify_results(3);
//! ```

use crate::framework::behavior::ActorBehavior;
use crate::framework::message::{Fault, Payload};
use crate::framework::output::Output;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// What the mock does with a result after recording it.
#[derive(Debug, Clone)]
enum Reaction {
    Echo,
    Swallow,
    Fail(Fault),
}

#[derive(Debug, Default)]
struct Seen {
    results: Vec<Payload>,
    exceptions: Vec<Fault>,
}

/// A recording behavior with a canned reaction.
pub struct MockBehavior {
    reaction: Reaction,
    probe: MockProbe,
}

impl MockBehavior {
    /// Forwards every result unchanged: an identity actor.
    pub fn echo() -> Self {
        Self::with_reaction(Reaction::Echo)
    }

    /// Records results but produces nothing.
    pub fn swallow() -> Self {
        Self::with_reaction(Reaction::Swallow)
    }

    /// Fails every result hook call with `fault`.
    pub fn failing(fault: impl Into<Fault>) -> Self {
        Self::with_reaction(Reaction::Fail(fault.into()))
    }

    fn with_reaction(reaction: Reaction) -> Self {
        Self {
            reaction,
            probe: MockProbe::default(),
        }
    }

    pub fn probe(&self) -> MockProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl ActorBehavior for MockBehavior {
    async fn process_result(&self, payload: Payload) -> Result<Output, Fault> {
        self.probe.seen.lock().results.push(payload.clone());

        let mut output = Output::new();
        match &self.reaction {
            Reaction::Echo => {
                output.save_result(payload);
            }
            Reaction::Swallow => {}
            Reaction::Fail(fault) => return Err(fault.clone()),
        }
        Ok(output)
    }

    async fn process_exception(&self, fault: Fault) -> Result<Output, Fault> {
        self.probe.seen.lock().exceptions.push(fault.clone());

        let mut output = Output::new();
        output.save_exception(fault);
        Ok(output)
    }
}

/// Read side of a [`MockBehavior`].
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    seen: Arc<Mutex<Seen>>,
}

impl MockProbe {
    /// Every result payload received so far, in arrival order.
    pub fn results(&self) -> Vec<Payload> {
        self.seen.lock().results.clone()
    }

    pub fn exceptions(&self) -> Vec<Fault> {
        self.seen.lock().exceptions.clone()
    }

    pub fn result_count(&self) -> usize {
        self.seen.lock().results.len()
    }

    pub fn exception_count(&self) -> usize {
        self.seen.lock().exceptions.len()
    }

    /// Panics unless exactly `expected` results were received.
    pub fn verify_results(&self, expected: usize) {
        let actual = self.result_count();
        assert_eq!(
            actual, expected,
            "Expected {} result(s) to reach the mock, got {}",
            expected, actual
        );
    }

    /// Panics unless exactly `expected` exceptions were received.
    pub fn verify_exceptions(&self, expected: usize) {
        let actual = self.exception_count();
        assert_eq!(
            actual, expected,
            "Expected {} exception(s) to reach the mock, got {}",
            expected, actual
        );
    }

    /// Waits until at least `count` results arrived. Returns `false` on timeout.
    pub async fn wait_for_results(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, || self.result_count() >= count).await
    }

    /// Waits until at least `count` exceptions arrived. Returns `false` on timeout.
    pub async fn wait_for_exceptions(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, || self.exception_count() >= count).await
    }

    async fn wait_until(&self, timeout: Duration, done: impl Fn() -> bool) -> bool {
        let poll = async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_records_and_forwards() {
        let mock = MockBehavior::echo();
        let probe = mock.probe();

        let output = mock.process_result(Payload::new("hello")).await.unwrap();
        assert_eq!(output.results()[0].as_str(), Some("hello"));

        probe.verify_results(1);
        probe.verify_exceptions(0);
        assert_eq!(probe.results()[0].as_str(), Some("hello"));
    }

    #[tokio::test]
    async fn test_swallow_produces_nothing() {
        let mock = MockBehavior::swallow();
        let output = mock.process_result(Payload::new(1u8)).await.unwrap();
        assert!(output.is_empty());
        assert_eq!(mock.probe().result_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_returns_fault() {
        let mock = MockBehavior::failing(Fault::msg("nope"));
        let fault = mock.process_result(Payload::new(1u8)).await.unwrap_err();
        assert_eq!(fault.to_string(), "nope");
        mock.probe().verify_results(1);
    }

    #[tokio::test]
    async fn test_exceptions_pass_through() {
        let mock = MockBehavior::swallow();
        let output = mock.process_exception(Fault::msg("up")).await.unwrap();
        assert_eq!(output.exceptions()[0].to_string(), "up");
        mock.probe().verify_exceptions(1);
    }

    #[tokio::test]
    async fn test_wait_for_results_times_out() {
        let probe = MockBehavior::echo().probe();
        assert!(!probe.wait_for_results(1, Duration::from_millis(20)).await);
        assert!(probe.wait_for_results(0, Duration::from_millis(20)).await);
    }

    #[test]
    #[should_panic(expected = "Expected 2 result(s)")]
    fn test_verify_panics_on_mismatch() {
        MockBehavior::echo().probe().verify_results(2);
    }
}
