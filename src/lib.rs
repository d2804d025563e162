pub mod aggregate;
pub mod builder;
pub mod category;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod grocery;
pub mod ingredient;
pub mod model;
pub mod pipelines;

use std::time::Duration;

// Re-export commonly used types
pub use aggregate::{aggregate_ingredients, AggregatedIngredient, AggregatedIngredients, RecipeSelection};
pub use builder::{ImportResult, InputSource, RecipeImporter, RecipeImporterBuilder};
pub use config::ImportConfig;
pub use error::ImportError;
pub use grocery::{group_by_category, recipe_multipliers, GroceryGroup, MealPlanEntry};
pub use model::{ImportedRecipe, Ingredient, ParsedRecipe};
pub use pipelines::markdown::{parse_markdown_recipe, MarkdownImport, MarkdownImportError};
pub use pipelines::paste::{parse_pasted_recipe, PasteMode};

use crate::fetcher::RequestFetcher;

/// Fetches a recipe page and extracts a recipe from it.
///
/// Uses the default configuration. Only the fetch can fail; a page without
/// recipe markup yields a recipe with empty lists.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipe_extract::ImportError> {
/// let recipe = recipe_extract::fetch_recipe("https://example.com/pancakes").await?;
/// println!("{} ({} ingredients)", recipe.title, recipe.ingredients.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_recipe(url: &str) -> Result<ParsedRecipe, ImportError> {
    fetch_recipe_with_config(url, None, &ImportConfig::default()).await
}

/// Same as [`fetch_recipe`] with an explicit configuration and optional
/// timeout override.
pub async fn fetch_recipe_with_config(
    url: &str,
    timeout: Option<Duration>,
    config: &ImportConfig,
) -> Result<ParsedRecipe, ImportError> {
    let fetcher = RequestFetcher::with_config(timeout, config)?;
    pipelines::url::process(url, &fetcher, config).await
}

/// Fetches and parses a recipe, returning `None` when the page cannot be
/// retrieved.
pub async fn parse_recipe_from_url(url: &str) -> Option<ParsedRecipe> {
    fetch_recipe(url).await.ok()
}

/// Extracts a recipe from HTML that has already been fetched.
///
/// # Example
/// ```
/// let html = r#"<script type="application/ld+json">
///     {"@type": "Recipe", "name": "Toast", "recipeIngredient": ["2 slices bread"]}
/// </script>"#;
/// let recipe = recipe_extract::parse_recipe_from_html(html, "https://example.com/toast");
/// assert_eq!(recipe.title, "Toast");
/// assert_eq!(recipe.ingredients[0].unit, "slices");
/// ```
pub fn parse_recipe_from_html(html: &str, url: &str) -> ParsedRecipe {
    pipelines::url::extract_from_html(html, url, &ImportConfig::default())
}
