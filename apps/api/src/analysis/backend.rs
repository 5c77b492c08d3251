use async_trait::async_trait;

use crate::llm_client::{LlmClient, LlmError};

/// The external collaborator that reads the prompt and answers with
/// (hopefully) a JSON array of candidates. Swap the implementation in
/// `AppState` to point the service at a different model or a stub.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl AnalysisBackend for LlmClient {
    async fn analyze(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.complete(prompt, system).await
    }
}
