use thiserror::Error;

use crate::pipelines::markdown::MarkdownImportError;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to fetch the recipe page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Failed to fetch URL: HTTP {0}")]
    HttpStatus(u16),

    /// No JSON-LD script on the page described a recipe
    #[error("No structured recipe data found on this webpage")]
    NoRecipeFound,

    /// The markdown export could not be turned into a recipe
    #[error("Invalid markdown recipe: {0}")]
    InvalidMarkdown(#[from] MarkdownImportError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
