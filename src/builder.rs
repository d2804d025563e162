use std::time::Duration;

use crate::config::ImportConfig;
use crate::fetcher::RequestFetcher;
use crate::pipelines::{markdown, url};
use crate::{ImportError, MarkdownImport, ParsedRecipe};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Fetch recipe from a URL
    Url(String),
    /// Parse a markdown chat export
    Markdown(String),
}

/// Result of a recipe import operation
#[derive(Debug, Clone)]
pub enum ImportResult {
    /// Recipe extracted from a web page
    Recipe(ParsedRecipe),
    /// Recipe imported from markdown, with parse warnings
    Markdown(MarkdownImport),
}

/// Builder for configuring and executing recipe imports
#[derive(Debug, Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    config: Option<ImportConfig>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to a markdown recipe
    ///
    /// Use this for recipes copied out of a chat conversation: a bold or
    /// heading title followed by ingredient and instruction sections.
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .markdown("**Pancakes**\n### Ingredients\n- 1 cup flour\n### Instructions\n1. Mix.");
    /// ```
    pub fn markdown(mut self, markdown: impl Into<String>) -> Self {
        self.source = Some(InputSource::Markdown(markdown.into()));
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// Overrides the configured timeout.
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the User-Agent sent when fetching pages
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use an explicit configuration instead of loading one
    ///
    /// Without this, `build()` reads `recipe-extract.toml` and
    /// `RECIPE_EXTRACT__*` environment variables.
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build and execute the recipe import operation
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified
    /// - The configuration cannot be loaded
    /// - URL fetch fails
    /// - The markdown has no title or misses both key sections
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ImportResult, ImportError> {
        let source = self.source.ok_or_else(|| {
            ImportError::BuilderError(
                "No input source specified. Use .url() or .markdown()".to_string(),
            )
        })?;

        let mut config = match self.config {
            Some(config) => config,
            None => ImportConfig::load()?,
        };
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        match source {
            InputSource::Url(page_url) => {
                if page_url.trim().is_empty() {
                    return Err(ImportError::BuilderError("URL cannot be empty".to_string()));
                }
                let fetcher = RequestFetcher::with_config(self.timeout, &config)?;
                let recipe = url::process(&page_url, &fetcher, &config).await?;
                Ok(ImportResult::Recipe(recipe))
            }
            InputSource::Markdown(text) => {
                let parser = markdown::MarkdownParser::new(config.markdown.parser());
                Ok(ImportResult::Markdown(parser.parse(&text)?))
            }
        }
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
