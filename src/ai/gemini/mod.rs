pub mod catalog;
pub mod client;
pub mod generate;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::GeminiCatalogClient;
pub use client::GeminiHttpClient;
pub use generate::GeminiGenerateClient;
