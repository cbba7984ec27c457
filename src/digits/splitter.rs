use super::DigitError;
use crate::framework::{ActorBehavior, Fault, Output, Payload};
use async_trait::async_trait;
use tracing::debug;

/// Splits comma-separated text into one result per chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Splitter;

#[async_trait]
impl ActorBehavior for Splitter {
    async fn process_result(&self, payload: Payload) -> Result<Output, Fault> {
        let mut output = Output::new();
        let Some(text) = payload.as_str() else {
            output.save_exception(DigitError::UnexpectedPayload {
                stage: "splitter",
                type_name: payload.type_name(),
            });
            return Ok(output);
        };

        for chunk in text.split(',') {
            output.save_result(chunk.to_owned());
        }
        debug!(chunks = output.results().len(), "Split input");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_splits_on_commas() {
        let output = Splitter
            .process_result(Payload::new("11,22,3b3"))
            .await
            .unwrap();
        let chunks: Vec<_> = output.results().iter().filter_map(Payload::as_str).collect();
        assert_eq!(chunks, vec!["11", "22", "3b3"]);
        assert!(output.exceptions().is_empty());
    }

    #[tokio::test]
    async fn test_non_text_becomes_exception() {
        let output = Splitter.process_result(Payload::new(7u32)).await.unwrap();
        assert!(output.results().is_empty());
        assert_eq!(
            output.exceptions()[0].downcast_ref::<DigitError>(),
            Some(&DigitError::UnexpectedPayload {
                stage: "splitter",
                type_name: "u32"
            })
        );
    }
}
