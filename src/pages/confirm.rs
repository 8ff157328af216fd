use async_trait::async_trait;

/// Interactive yes/no question asked before destructive actions.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "confirmation assumed");
        true
    }
}
