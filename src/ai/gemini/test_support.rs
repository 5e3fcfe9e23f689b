use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockBuilder};

pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";
pub const LIST_MODELS_PATH: &str = "/v1beta/models";

pub fn post_path_regex(pattern: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path_regex(pattern))
}

pub fn get_list_models() -> MockBuilder {
    Mock::given(method("GET")).and(path(LIST_MODELS_PATH))
}

pub fn text_candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}
