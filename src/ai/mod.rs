//! Provider integration for model discovery and content generation
//!
//! The bridge talks to Gemini through two narrow services so the request
//! handler can be exercised against mocks.

pub mod content;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod model_select;

pub use content::GeneratedContent;
pub use gemini::{GeminiCatalogClient, GeminiGenerateClient};
pub use mock::MockGeminiService;
pub use model_select::ModelResolver;

use crate::models::GenerationMode;
use crate::Result;
use async_trait::async_trait;

/// Enumerates the model names the provider offers.
#[async_trait]
pub trait ModelCatalogService: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Result of one upstream generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    pub content: GeneratedContent,
    /// Upstream payload as received, for optional echoing.
    pub raw: serde_json::Value,
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        mode: GenerationMode,
    ) -> Result<Generation>;
}
