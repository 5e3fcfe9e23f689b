use super::types::ListModelsResponse;
use crate::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Largest page size the models endpoint accepts.
const LIST_MODELS_PAGE_SIZE: &str = "1000";

/// Lightweight Gemini REST client shared by the catalog and generation clients.
///
/// The API key travels as the `key` query parameter. Transport errors are
/// stripped of their URL before they are surfaced so the key never reaches a
/// client response or a log line.
#[derive(Clone)]
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, base_url, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        base_url: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn send_for_body(&self, request: RequestBuilder) -> Result<String> {
        let response = request
            .timeout(self.timeout)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(Error::AiProvider(format!("status {}: {}", status, body)));
        }

        Ok(body)
    }

    /// `{base}/v1beta/models[/{tail}]`.
    ///
    /// `tail` is appended as a single percent-encoded segment, so a model name
    /// containing `/`, `?` or `#` cannot leave the models collection.
    fn models_url(&self, tail: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("Invalid Gemini base URL '{}': {}", self.base_url, e))
        })?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("Gemini base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty().extend(["v1beta", "models"]);
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }

        Ok(url)
    }

    fn parse<Resp: DeserializeOwned>(body: &str) -> Result<Resp> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Fetches one page of the model catalog.
    pub async fn list_models_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let url = self.models_url(None)?;
        let mut request = self
            .client
            .get(url)
            .query(&[("pageSize", LIST_MODELS_PAGE_SIZE)]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let body = self.send_for_body(request).await?;
        Self::parse(&body)
    }

    /// Calls `generateContent` for `model` and returns the raw JSON payload.
    ///
    /// `model` may be a bare ID or carry the `models/` prefix.
    pub async fn generate_content<Req: Serialize>(
        &self,
        model: &str,
        request: &Req,
    ) -> Result<serde_json::Value> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = self.models_url(Some(&format!("{}:generateContent", model)))?;

        let body = self
            .send_for_body(self.client.post(url).json(request))
            .await?;
        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiHttpClient {
        GeminiHttpClient::new(
            "test-key".to_string(),
            server.uri(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_generate_content_sends_key_as_query_param() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = make_client(&server)
            .generate_content("models/gemini-2.0-flash", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(raw, serde_json::json!({ "candidates": [] }));
    }

    #[tokio::test]
    async fn test_model_name_stays_in_one_path_segment() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .generate_content("../cachedContents?#frag", &serde_json::json!({}))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.path(),
            "/v1beta/models/..%2FcachedContents%3F%23frag:generateContent"
        );
        let query: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(query, vec![("key".to_string(), "test-key".to_string())]);
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/proxy/v1beta/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiHttpClient::new(
            "test-key".to_string(),
            format!("{}/proxy/", server.uri()),
            Duration::from_secs(5),
        );
        client.list_models_page(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_config_error() {
        let client = GeminiHttpClient::new(
            "test-key".to_string(),
            "not a url".to_string(),
            Duration::from_secs(5),
        );
        let err = client.list_models_page(None).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_content("gemini-2.0-flash", &serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            Error::AiProvider(message) => {
                assert!(message.contains("429"));
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate_content("gemini-2.0-flash", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_list_models_page_passes_page_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(test_support::LIST_MODELS_PATH))
            .and(query_param("pageToken", "next"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{ "name": "models/gemini-2.5-flash" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = make_client(&server)
            .list_models_page(Some("next"))
            .await
            .unwrap();
        assert_eq!(page.models.len(), 1);
        assert!(page.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        // Port 1 is reserved; the connection is refused.
        let client = GeminiHttpClient::new(
            "super-secret".to_string(),
            "http://127.0.0.1:1".to_string(),
            Duration::from_secs(2),
        );

        let err = client.list_models_page(None).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(!err.to_string().contains("super-secret"));
    }
}
