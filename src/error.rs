//! Error handling and custom error types
//!
//! Provides unified error handling across the bridge using thiserror. Each
//! variant knows the HTTP status and JSON body it is reported with.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    /// The request body could not be read (e.g. over the size limit).
    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Could not retrieve models: {0}")]
    CatalogUnavailable(String),

    #[error("No image data returned")]
    NoImageData { model: String },

    #[error("No content generated")]
    NoContent,

    #[error("Gemini API error: {0}")]
    AiProvider(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::MalformedBody(_) | Error::MissingPrompt => StatusCode::BAD_REQUEST,
            Error::BodyRejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body reported to the client. Always carries an `error` field.
    pub fn body(&self) -> Value {
        match self {
            Error::MalformedBody(message) => json!({
                "error": "Malformed JSON body",
                "message": message,
            }),
            Error::CatalogUnavailable(message) => json!({
                "error": "Could not retrieve models",
                "message": message,
            }),
            Error::NoImageData { model } => json!({
                "error": "No image data returned",
                "modelUsed": model,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
