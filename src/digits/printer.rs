use super::DigitError;
use crate::framework::{ActorBehavior, Fault, Output, Payload};
use async_trait::async_trait;

/// Renders parsed digits as text. Text passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stringifier;

#[async_trait]
impl ActorBehavior for Stringifier {
    async fn process_result(&self, payload: Payload) -> Result<Output, Fault> {
        let mut output = Output::new();
        if let Some(digit) = payload.downcast_ref::<u32>() {
            output.save_result(digit.to_string());
        } else if let Some(text) = payload.as_str() {
            output.save_result(text.to_owned());
        } else {
            output.save_exception(DigitError::UnexpectedPayload {
                stage: "printer",
                type_name: payload.type_name(),
            });
        }
        Ok(output)
    }
}
