use scraper::Html;

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::ingredient::IngredientParser;
use crate::model::ParsedRecipe;

mod html_class;
mod json_ld;

pub use self::html_class::HtmlClassExtractor;
pub use self::json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
    /// Parser applied to every ingredient line found on the page
    pub ingredients: IngredientParser,
    pub max_title_length: usize,
}

impl ParsingContext {
    /// Context with the default web settings.
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self::with_config(url, html, &ImportConfig::default())
    }

    pub fn with_config(url: impl Into<String>, html: &str, config: &ImportConfig) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
            ingredients: config.web.parser(),
            max_title_length: config.max_title_length,
        }
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<ParsedRecipe, ImportError>;
}

/// Collects the visible text of an element with whitespace collapsed.
pub(crate) fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
