use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::{GeneratedContent, Generation, GenerationService};
use crate::models::GenerationMode;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

/// MIME type requested upstream in direct image mode.
const DIRECT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

pub struct GeminiGenerateClient {
    http: GeminiHttpClient,
}

impl GeminiGenerateClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    fn build_request(prompt: &str, temperature: f32, mode: GenerationMode) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: match mode {
                    GenerationMode::Image => Some(DIRECT_IMAGE_MIME.to_string()),
                    GenerationMode::Mixed => None,
                },
            },
        }
    }
}

#[async_trait]
impl GenerationService for GeminiGenerateClient {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        mode: GenerationMode,
    ) -> Result<Generation> {
        let request = Self::build_request(prompt, temperature, mode);

        tracing::debug!(
            "Sending generateContent to {} ({:?} mode, temperature {})",
            model,
            mode,
            temperature
        );

        let raw = self.http.generate_content(model, &request).await?;
        let response: GenerateContentResponse = serde_json::from_value(raw.clone())?;

        let content = GeneratedContent::from_response(&response, mode);

        Ok(Generation { content, raw })
    }
}
