//! # Hook Output
//!
//! The collector a behavior fills while handling one message.

use crate::framework::message::{Fault, Payload};
use std::any::Any;

/// Results and exceptions produced by one hook invocation, in call order.
///
/// ```rust
/// use dataflow_actors::framework::{Fault, Output};
///
/// let mut output = Output::new();
/// output.save_result(1u32).save_result(2u32);
/// output.save_exception(Fault::msg("bad input"));
/// assert_eq!(output.results().len(), 2);
/// assert_eq!(output.exceptions().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Output {
    results: Vec<Payload>,
    exceptions: Vec<Fault>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result. Passing a received [`Payload`] forwards it as is.
    pub fn save_result<V: Any + Send + Sync>(&mut self, value: V) -> &mut Self {
        self.results.push(Payload::new(value));
        self
    }

    pub fn save_exception(&mut self, error: impl Into<Fault>) -> &mut Self {
        self.exceptions.push(error.into());
        self
    }

    pub fn results(&self) -> &[Payload] {
        &self.results
    }

    pub fn exceptions(&self) -> &[Fault] {
        &self.exceptions
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.exceptions.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Payload>, Vec<Fault>) {
        (self.results, self.exceptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_call_order() {
        let mut output = Output::new();
        output.save_result("a").save_result("b").save_result("c");
        let texts: Vec<_> = output.results().iter().filter_map(|p| p.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert!(output.exceptions().is_empty());
    }

    #[test]
    fn test_empty_output() {
        let output = Output::new();
        assert!(output.is_empty());
        let (results, exceptions) = output.into_parts();
        assert!(results.is_empty() && exceptions.is_empty());
    }
}
