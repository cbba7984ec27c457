use super::DigitError;
use crate::framework::{ActorBehavior, Fault, Output, Payload};
use async_trait::async_trait;

/// Turns a chunk like `"3b3"` into one `u32` per digit.
///
/// Every other character becomes a [`DigitError::NonDigit`] exception; the
/// rest of the chunk is still parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitParser;

#[async_trait]
impl ActorBehavior for DigitParser {
    async fn process_result(&self, payload: Payload) -> Result<Output, Fault> {
        let mut output = Output::new();
        let Some(chunk) = payload.as_str() else {
            output.save_exception(DigitError::UnexpectedPayload {
                stage: "digits",
                type_name: payload.type_name(),
            });
            return Ok(output);
        };

        for character in chunk.chars() {
            match character.to_digit(10) {
                Some(digit) => {
                    output.save_result(digit);
                }
                None => {
                    output.save_exception(DigitError::NonDigit {
                        character,
                        chunk: chunk.to_owned(),
                    });
                }
            }
        }
        Ok(output)
    }
}
