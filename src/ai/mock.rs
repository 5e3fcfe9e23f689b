use super::gemini::types::GenerateContentResponse;
use super::{GeneratedContent, Generation, GenerationService, ModelCatalogService};
use crate::models::GenerationMode;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCall {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub mode: GenerationMode,
}

/// In-memory stand-in for the Gemini catalog and generation endpoints.
///
/// Generation replies are raw upstream payloads, run through the same parser
/// as the real client.
pub struct MockGeminiService {
    models: Arc<Mutex<Vec<String>>>,
    catalog_failure: Option<String>,
    generate_responses: Arc<Mutex<Vec<serde_json::Value>>>,
    generate_failure: Option<String>,
    catalog_calls: Arc<Mutex<usize>>,
    generate_calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl MockGeminiService {
    pub fn new() -> Self {
        Self {
            models: Arc::new(Mutex::new(Vec::new())),
            catalog_failure: None,
            generate_responses: Arc::new(Mutex::new(Vec::new())),
            generate_failure: None,
            catalog_calls: Arc::new(Mutex::new(0)),
            generate_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_models(self, models: Vec<&str>) -> Self {
        self.models
            .lock()
            .unwrap()
            .extend(models.into_iter().map(str::to_string));
        self
    }

    pub fn with_catalog_failure(mut self, message: &str) -> Self {
        self.catalog_failure = Some(message.to_string());
        self
    }

    pub fn with_generate_response(self, raw: serde_json::Value) -> Self {
        self.generate_responses.lock().unwrap().push(raw);
        self
    }

    pub fn with_generate_failure(mut self, message: &str) -> Self {
        self.generate_failure = Some(message.to_string());
        self
    }

    pub fn catalog_call_count(&self) -> usize {
        *self.catalog_calls.lock().unwrap()
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.generate_calls.lock().unwrap().clone()
    }

    /// Catalog plus generation calls.
    pub fn upstream_call_count(&self) -> usize {
        self.catalog_call_count() + self.generate_calls.lock().unwrap().len()
    }
}

impl Default for MockGeminiService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelCatalogService for MockGeminiService {
    async fn list_models(&self) -> Result<Vec<String>> {
        *self.catalog_calls.lock().unwrap() += 1;

        if let Some(message) = &self.catalog_failure {
            return Err(Error::AiProvider(message.clone()));
        }
        Ok(self.models.lock().unwrap().clone())
    }
}

#[async_trait]
impl GenerationService for MockGeminiService {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        mode: GenerationMode,
    ) -> Result<Generation> {
        let call_index = {
            let mut calls = self.generate_calls.lock().unwrap();
            calls.push(GenerateCall {
                prompt: prompt.to_string(),
                model: model.to_string(),
                temperature,
                mode,
            });
            calls.len() - 1
        };

        if let Some(message) = &self.generate_failure {
            return Err(Error::AiProvider(message.clone()));
        }

        let raw = {
            let responses = self.generate_responses.lock().unwrap();
            if responses.is_empty() {
                // Default mock response
                serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": format!("echo: {}", prompt) }] }
                    }]
                })
            } else {
                responses[call_index % responses.len()].clone()
            }
        };

        let response: GenerateContentResponse = serde_json::from_value(raw.clone())?;
        let content = GeneratedContent::from_response(&response, mode);

        Ok(Generation { content, raw })
    }
}
