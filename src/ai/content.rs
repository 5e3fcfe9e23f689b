//! Reduces a `generateContent` payload to the one result the bridge relays.

use super::gemini::types::{GenerateContentResponse, InlineData, ResponsePart};
use super::mime::detect_image_mime;
use crate::models::{BridgeResponse, GenerationMode};
use crate::{Error, Result};
use base64::Engine as _;

/// What the provider produced, independent of the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedContent {
    Text(String),
    Image {
        mime_type: Option<String>,
        data: String,
    },
    Empty,
}

fn first_candidate_parts(response: &GenerateContentResponse) -> &[ResponsePart] {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
        .unwrap_or_default()
}

fn image_from(inline: &InlineData) -> Option<GeneratedContent> {
    let data = inline.data.as_deref().filter(|d| !d.is_empty())?;
    Some(GeneratedContent::Image {
        mime_type: inline
            .mime_type
            .clone()
            .filter(|m| !m.trim().is_empty()),
        data: data.to_string(),
    })
}

impl GeneratedContent {
    /// Parses a response the way the given generation mode reads it.
    pub fn from_response(response: &GenerateContentResponse, mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Image => Self::from_direct_image(response),
            GenerationMode::Mixed => Self::from_mixed(response),
        }
    }

    /// Scans every part of the first candidate.
    ///
    /// An inline image wins over text; otherwise all text parts are joined in
    /// order. Absent fields never fail, they just yield `Empty`.
    pub fn from_mixed(response: &GenerateContentResponse) -> Self {
        let parts = first_candidate_parts(response);

        if let Some(image) = parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find_map(image_from)
        {
            return image;
        }

        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }

    /// Reads only the first part's inline data, as direct image output puts it there.
    pub fn from_direct_image(response: &GenerateContentResponse) -> Self {
        first_candidate_parts(response)
            .first()
            .and_then(|p| p.inline_data.as_ref())
            .and_then(image_from)
            .unwrap_or(Self::Empty)
    }

    /// Converts to the client-facing shape.
    ///
    /// Image payloads must be valid base64. When no MIME type was declared it
    /// is sniffed from the decoded bytes.
    pub fn into_bridge_response(self) -> Result<BridgeResponse> {
        match self {
            Self::Text(text) => Ok(BridgeResponse::Text { text }),
            Self::Image { mime_type, data } => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(&data)
                    .map_err(|e| {
                        Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e))
                    })?;
                let mime_type =
                    mime_type.unwrap_or_else(|| detect_image_mime(&bytes).to_string());

                tracing::debug!(
                    "Gemini returned image with mime_type: {} ({} bytes)",
                    mime_type,
                    bytes.len()
                );

                Ok(BridgeResponse::Image {
                    image: format!("data:{};base64,{}", mime_type, data),
                })
            }
            Self::Empty => Err(Error::NoContent),
        }
    }
}
