//! HTTP bridge to the Gemini generative language API
//!
//! Accepts a prompt over HTTP, resolves which Gemini model to call, and relays
//! back either generated text or an inline image as a data URL.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod server;

pub use error::{Error, Result};
