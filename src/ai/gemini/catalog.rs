use super::client::GeminiHttpClient;
use crate::ai::ModelCatalogService;
use crate::Result;
use async_trait::async_trait;

/// Upper bound on followed `nextPageToken`s per catalog fetch.
const MAX_CATALOG_PAGES: usize = 10;

pub struct GeminiCatalogClient {
    http: GeminiHttpClient,
}

impl GeminiCatalogClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ModelCatalogService for GeminiCatalogClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_CATALOG_PAGES {
            let page = self.http.list_models_page(page_token.as_deref()).await?;
            names.extend(page.models.into_iter().filter_map(|m| m.name));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(names),
            }
        }

        tracing::warn!(
            "Model catalog still paginated after {} pages, using {} names",
            MAX_CATALOG_PAGES,
            names.len()
        );
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::Error;
    use std::time::Duration;
    use wiremock::matchers::query_param;
    use wiremock::{MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiCatalogClient {
        GeminiCatalogClient::new(GeminiHttpClient::new(
            "key".to_string(),
            server.uri(),
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_list_models_returns_names() {
        let server = MockServer::start().await;

        test_support::get_list_models()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [
                    { "name": "models/gemini-1.5-flash" },
                    { "displayName": "no name field" },
                    { "name": "models/gemini-2.0-pro" }
                ]
            })))
            .mount(&server)
            .await;

        let names = make_client(&server).list_models().await.unwrap();
        assert_eq!(names, vec!["models/gemini-1.5-flash", "models/gemini-2.0-pro"]);
    }

    #[tokio::test]
    async fn test_list_models_follows_page_tokens() {
        let server = MockServer::start().await;

        test_support::get_list_models()
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{ "name": "models/gemini-2.5-flash" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Lower priority than the page-2 mock, so it only answers the first request.
        test_support::get_list_models()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{ "name": "models/gemini-1.5-flash" }],
                "nextPageToken": "page-2"
            })))
            .with_priority(10)
            .expect(1)
            .mount(&server)
            .await;

        let names = make_client(&server).list_models().await.unwrap();
        assert_eq!(
            names,
            vec!["models/gemini-1.5-flash", "models/gemini-2.5-flash"]
        );
    }

    #[tokio::test]
    async fn test_empty_catalog_body() {
        let server = MockServer::start().await;

        test_support::get_list_models()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let names = make_client(&server).list_models().await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_error_status() {
        let server = MockServer::start().await;

        test_support::get_list_models()
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = make_client(&server).list_models().await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
