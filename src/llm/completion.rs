use async_trait::async_trait;

use crate::error::Result;

/// A text-completion backend: prompt in, free-form text out.
///
/// Implementations own their own transport, authentication and timeouts.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Short label for logs, e.g. the model name.
    fn name(&self) -> &str {
        "completion"
    }
}

#[async_trait]
impl<C: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<C> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
