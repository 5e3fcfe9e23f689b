//! Gemini wire payloads for the catalog and `generateContent` endpoints.
//!
//! Response types accept absent or `null` fields everywhere; a missing value
//! decodes as "no content" instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Gemini content container used in requests.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// Request-side text part.
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<ResponsePart>,
}

/// One response part: text, inline media, or neither (e.g. function calls).
///
/// Gemini emits camelCase keys; snake_case is accepted too. When a part
/// carries both spellings the camelCase one wins.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawResponsePart")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct RawResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData")]
    camel: Option<InlineData>,
    #[serde(default, rename = "inline_data")]
    snake: Option<InlineData>,
}

impl From<RawResponsePart> for ResponsePart {
    fn from(raw: RawResponsePart) -> Self {
        Self {
            text: raw.text,
            inline_data: raw.camel.or(raw.snake),
        }
    }
}

/// Base64 inline payload.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawInlineData")]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: Option<String>,
}

#[derive(Deserialize)]
struct RawInlineData {
    #[serde(default, rename = "mimeType")]
    camel_mime_type: Option<String>,
    #[serde(default, rename = "mime_type")]
    snake_mime_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

impl From<RawInlineData> for InlineData {
    fn from(raw: RawInlineData) -> Self {
        Self {
            mime_type: raw.camel_mime_type.or(raw.snake_mime_type),
            data: raw.data,
        }
    }
}

/// One page of `GET /v1beta/models`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub name: Option<String>,
}
