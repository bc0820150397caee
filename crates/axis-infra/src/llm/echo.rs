//! Offline completion client.

use axis_core::llm::provider::CompletionClient;
use axis_types::llm::LlmError;

/// Answers every message by echoing it back. Used for local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoClient;

impl CompletionClient for EchoClient {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, model: &str, message: &str) -> Result<String, LlmError> {
        Ok(format!("[{model}] {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let text = EchoClient.complete("qwen/qwen3-coder:free", "hi").await.unwrap();
        assert_eq!(text, "[qwen/qwen3-coder:free] hi");
    }
}
