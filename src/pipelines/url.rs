use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::extractors::{Extractor, HtmlClassExtractor, JsonLdExtractor, ParsingContext};
use crate::fetcher::PageFetcher;
use crate::model::ParsedRecipe;
use log::debug;

/// Process a URL to extract a recipe
///
/// This pipeline:
/// 1. Fetches HTML with the given fetcher
/// 2. Tries the JSON-LD extractor
/// 3. Falls back to HTML class heuristics
///
/// Only the fetch can fail. A page without recognizable content still yields
/// a (possibly empty) [`ParsedRecipe`].
pub async fn process(
    url: &str,
    fetcher: &dyn PageFetcher,
    config: &ImportConfig,
) -> Result<ParsedRecipe, ImportError> {
    let html_content = fetcher.fetch(url).await?;
    Ok(extract_from_html(&html_content, url, config))
}

/// Runs the extractors over already-fetched HTML.
pub fn extract_from_html(html: &str, url: &str, config: &ImportConfig) -> ParsedRecipe {
    let context = ParsingContext::with_config(url, html, config);

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(HtmlClassExtractor)];

    for extractor in extractors {
        match extractor.parse(&context) {
            Ok(recipe) => return recipe,
            Err(e) => debug!("Extractor failed for {}: {}", url, e),
        }
    }

    ParsedRecipe::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticFetcher(Result<String, u16>);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, ImportError> {
            self.0.clone().map_err(ImportError::HttpStatus)
        }
    }

    #[test]
    fn test_structured_data_wins_over_markup() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "From JSON-LD", "recipeIngredient": ["1 cup rice"]}
            </script>
            </head><body>
                <h1>From Markup</h1>
                <ul class="ingredients"><li>2 cups beans</li></ul>
            </body></html>
        "#;
        let recipe = extract_from_html(html, "https://example.com", &ImportConfig::default());
        assert_eq!(recipe.title, "From JSON-LD");
        assert_eq!(recipe.ingredients[0].name, "rice");
    }

    #[test]
    fn test_falls_back_to_markup() {
        let html = r#"
            <html><body>
                <h1>From Markup</h1>
                <ul class="ingredients"><li>2 cups beans</li></ul>
            </body></html>
        "#;
        let recipe = extract_from_html(html, "https://example.com", &ImportConfig::default());
        assert_eq!(recipe.title, "From Markup");
        assert_eq!(recipe.ingredients[0].name, "beans");
    }

    #[test]
    fn test_configured_default_amount_reaches_extractors() {
        let mut config = ImportConfig::default();
        config.web.default_amount = "1".to_string();
        let html = r#"<html><body><ul class="ingredients"><li>eggs</li></ul></body></html>"#;
        let recipe = extract_from_html(html, "https://example.com", &config);
        assert_eq!(recipe.ingredients[0].amount, "1");
    }

    #[tokio::test]
    async fn test_process_propagates_fetch_errors() {
        let fetcher = StaticFetcher(Err(404));
        let result = process("https://example.com", &fetcher, &ImportConfig::default()).await;
        assert!(matches!(result, Err(ImportError::HttpStatus(404))));
    }

    #[tokio::test]
    async fn test_process_parses_fetched_page() {
        let fetcher = StaticFetcher(Ok("<html><body><h1>Soup</h1></body></html>".to_string()));
        let recipe = process("https://example.com", &fetcher, &ImportConfig::default())
            .await
            .unwrap();
        assert_eq!(recipe.title, "Soup");
        assert!(recipe.is_empty());
    }
}
