//! Picks the "latest" model name from the provider catalog.
//!
//! The version is the first `<major>.<minor>` found in the name, compared as a
//! float. This is a heuristic: `2.10` and `2.1` compare equal. Ties keep the
//! catalog's order.

use super::ModelCatalogService;
use crate::models::ModelStrategy;
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::Arc;

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+)").expect("version pattern is valid"));

/// `models/gemini-2.0-flash` -> `gemini-2.0-flash`
pub fn bare_model_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Version number embedded in a model name, or `0.0` when there is none.
pub fn parse_version(name: &str) -> f64 {
    VERSION_PATTERN
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Newest model in `names`, preferring names containing "flash".
///
/// Falls back to `default_model` when the catalog is empty.
pub fn select_latest<S: AsRef<str>>(names: &[S], default_model: &str) -> String {
    let bare: Vec<&str> = names
        .iter()
        .map(|n| bare_model_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect();

    if bare.is_empty() {
        return default_model.to_string();
    }

    let flash: Vec<&str> = bare
        .iter()
        .copied()
        .filter(|n| n.to_lowercase().contains("flash"))
        .collect();
    let mut pool = if flash.is_empty() { bare } else { flash };

    pool.sort_by(|a, b| {
        parse_version(b)
            .partial_cmp(&parse_version(a))
            .unwrap_or(Ordering::Equal)
    });

    pool[0].to_string()
}

/// Resolves the model for a request according to the configured strategy.
#[derive(Clone)]
pub struct ModelResolver {
    strategy: ModelStrategy,
    default_model: String,
    catalog: Arc<dyn ModelCatalogService>,
}

impl ModelResolver {
    pub fn new(
        strategy: ModelStrategy,
        default_model: String,
        catalog: Arc<dyn ModelCatalogService>,
    ) -> Self {
        Self {
            strategy,
            default_model,
            catalog,
        }
    }

    /// An explicit override is used verbatim and skips the catalog.
    ///
    /// With [`ModelStrategy::Latest`] the catalog is fetched on every call.
    pub async fn resolve(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(model) = explicit {
            tracing::debug!("Using caller-supplied model {}", model);
            return Ok(model.to_string());
        }

        match self.strategy {
            ModelStrategy::Fixed => Ok(self.default_model.clone()),
            ModelStrategy::Latest => {
                let names = self.catalog.list_models().await?;
                let model = select_latest(&names, &self.default_model);
                tracing::debug!(
                    "Resolved latest model {} from {} catalog entries",
                    model,
                    names.len()
                );
                Ok(model)
            }
        }
    }
}
