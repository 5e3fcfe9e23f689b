//! Request handling for the bridge: validation, model resolution, generation.

use crate::ai::gemini::GeminiHttpClient;
use crate::ai::{
    GeminiCatalogClient, GeminiGenerateClient, GeneratedContent, GenerationService,
    ModelCatalogService, ModelResolver,
};
use crate::models::{
    Config, GenerateRequest, GenerationMode, GenerationResponse, StatusResponse,
};
use crate::{Error, Result};
use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Injectable provider bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub catalog: Arc<dyn ModelCatalogService>,
    pub generator: Arc<dyn GenerationService>,
}

struct Services {
    resolver: ModelResolver,
    generator: Arc<dyn GenerationService>,
}

/// Outcome of a handled request, before it becomes an HTTP response.
#[derive(Debug)]
pub enum Reply {
    /// 204 with an empty body.
    NoContent,
    /// 200 plain-text health string.
    Health(String),
    Status(StatusResponse),
    Generated(GenerationResponse),
}

/// The bridge's request handler.
///
/// Providers exist only when an API key was configured; without one every
/// request other than `OPTIONS` fails with [`Error::MissingApiKey`].
pub struct App {
    config: Config,
    services: Option<Services>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// `None` behaves exactly like a missing API key.
    pub fn with_services(config: Config, services: Option<AppServices>) -> Self {
        let services = services.map(|s| Services {
            resolver: ModelResolver::new(
                config.model_strategy,
                config.default_model.clone(),
                s.catalog,
            ),
            generator: s.generator,
        });

        Self { config, services }
    }

    /// Construct an app talking to Gemini with the configured key.
    pub fn new(config: Config) -> Result<Self> {
        let services = match &config.api_key {
            Some(api_key) => {
                // Reuse one HTTP connection pool across both clients.
                let http = GeminiHttpClient::new_with_client(
                    api_key.clone(),
                    config.base_url.clone(),
                    config.upstream_timeout,
                    reqwest::Client::builder()
                        .timeout(config.upstream_timeout)
                        .build()?,
                );
                info!(
                    "Gemini provider at {} (strategy: {:?}, mode: {:?})",
                    config.base_url, config.model_strategy, config.generation_mode
                );
                Some(AppServices {
                    catalog: Arc::new(GeminiCatalogClient::new(http.clone())),
                    generator: Arc::new(GeminiGenerateClient::new(http)),
                })
            }
            None => {
                warn!("GEMINI_API_KEY is not set; requests will fail until it is configured");
                None
            }
        };

        Ok(Self::with_services(config, services))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fails with [`Error::MissingApiKey`] when no provider is configured.
    pub fn ensure_configured(&self) -> Result<()> {
        self.services.as_ref().map(|_| ()).ok_or(Error::MissingApiKey)
    }

    pub async fn handle(
        &self,
        method: &Method,
        query: &HashMap<String, String>,
        body: &[u8],
    ) -> Result<Reply> {
        if method == Method::OPTIONS {
            return Ok(Reply::NoContent);
        }

        let services = self.services.as_ref().ok_or(Error::MissingApiKey)?;

        match *method {
            Method::GET => {
                let wants_status = query.get("status").is_some_and(|v| !v.is_empty());
                if wants_status && self.config.status_check {
                    self.status(services).await
                } else {
                    Ok(Reply::Health(self.config.health_message.clone()))
                }
            }
            Method::POST => self.generate(services, body).await,
            _ => Err(Error::MethodNotAllowed),
        }
    }

    async fn status(&self, services: &Services) -> Result<Reply> {
        let model = services
            .resolver
            .resolve(None)
            .await
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;

        Ok(Reply::Status(StatusResponse {
            status: "running",
            current_model: model,
        }))
    }

    async fn generate(&self, services: &Services, body: &[u8]) -> Result<Reply> {
        let request = parse_body(body)?;
        let prompt = request.prompt().ok_or(Error::MissingPrompt)?;

        let model = services.resolver.resolve(request.model_override()).await?;
        info!(
            "Generating with {} (prompt: {} chars)",
            model,
            prompt.chars().count()
        );

        let generation = services
            .generator
            .generate(
                prompt,
                &model,
                request.temperature(),
                self.config.generation_mode,
            )
            .await?;

        let content = match (generation.content, self.config.generation_mode) {
            (GeneratedContent::Empty, GenerationMode::Image) => {
                return Err(Error::NoImageData { model });
            }
            (content, _) => content.into_bridge_response()?,
        };

        Ok(Reply::Generated(GenerationResponse {
            content,
            model_used: model,
            raw: self.config.echo_raw.then_some(generation.raw),
        }))
    }
}

/// Empty bodies count as `{}`.
fn parse_body(body: &[u8]) -> Result<GenerateRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| Error::MalformedBody(e.to_string()))
}
