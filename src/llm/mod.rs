pub mod openrouter;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

/// A chat-completion backend. The synthesizer treats any failure here as a
/// cue to fall back to the template path, never as a user-facing error.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;
    async fn complete_chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
