//! Wires the three digit actors into a running system.

use super::{DigitParser, Splitter, Stringifier};
use crate::framework::{Actor, ActorId, FrameworkError, Message};
use crate::runtime::{ActorSystem, SystemConfig};
use std::sync::Arc;
use tracing::info;

/// `splitter -> digits -> printer`, ready to run.
///
/// The system sits behind an `Arc` so `run()` can be spawned while input is
/// still being fed.
#[derive(Debug, Clone)]
pub struct DigitPipeline {
    pub system: Arc<ActorSystem>,
    pub splitter: ActorId,
    pub digits: ActorId,
    pub printer: ActorId,
}

impl DigitPipeline {
    pub fn new(config: SystemConfig) -> Result<Self, FrameworkError> {
        let mut splitter = Actor::new("splitter", Splitter);
        let mut digits = Actor::new("digits", DigitParser);
        let mut printer = Actor::new("printer", Stringifier);
        splitter.connect(&mut digits).connect(&mut printer);

        let (splitter_id, digits_id, printer_id) = (splitter.id(), digits.id(), printer.id());
        let system = ActorSystem::new(vec![splitter, digits, printer], config)?;
        info!(splitter = %splitter_id, digits = %digits_id, printer = %printer_id, "Digit pipeline wired");

        Ok(Self {
            system: Arc::new(system),
            splitter: splitter_id,
            digits: digits_id,
            printer: printer_id,
        })
    }

    /// Feeds one line of comma-separated text into the splitter.
    pub fn feed(&self, line: impl Into<String>) -> Result<(), FrameworkError> {
        self.system
            .inject_result(self.splitter, Message::new(line.into()))
    }
}
