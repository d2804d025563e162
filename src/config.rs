use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};

use crate::ingredient::IngredientParser;

/// Main import configuration structure
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// User-Agent sent when fetching recipe pages
    pub user_agent: String,
    /// Titles found by the HTML fallback are cut to this many characters
    pub max_title_length: usize,
    /// Ingredient parsing for web pages
    #[serde(deserialize_with = "web_parser")]
    pub web: ParserConfig,
    /// Ingredient parsing for markdown chat exports
    #[serde(deserialize_with = "markdown_parser")]
    pub markdown: ParserConfig,
}

/// Per-pipeline ingredient parser settings
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Amount recorded when an ingredient line has no leading quantity
    pub default_amount: String,
    /// Move a trailing ", clause" of the name into notes
    pub comma_notes: bool,
}

impl ParserConfig {
    pub fn parser(&self) -> IngredientParser {
        IngredientParser::new(self.default_amount.clone()).with_comma_notes(self.comma_notes)
    }
}

/// A parser section as written in a config source. Missing keys keep the
/// pipeline's own default rather than a shared one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParserOverrides {
    default_amount: Option<String>,
    comma_notes: Option<bool>,
}

impl ParserOverrides {
    fn apply(self, mut base: ParserConfig) -> ParserConfig {
        if let Some(default_amount) = self.default_amount {
            base.default_amount = default_amount;
        }
        if let Some(comma_notes) = self.comma_notes {
            base.comma_notes = comma_notes;
        }
        base
    }
}

fn web_parser<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ParserConfig, D::Error> {
    Ok(ParserOverrides::deserialize(deserializer)?.apply(default_web_parser()))
}

fn markdown_parser<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ParserConfig, D::Error> {
    Ok(ParserOverrides::deserialize(deserializer)?.apply(default_markdown_parser()))
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_title_length: default_max_title_length(),
            web: default_web_parser(),
            markdown: default_markdown_parser(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_max_title_length() -> usize {
    200
}

fn default_web_parser() -> ParserConfig {
    ParserConfig {
        default_amount: String::new(),
        comma_notes: true,
    }
}

fn default_markdown_parser() -> ParserConfig {
    ParserConfig {
        default_amount: "1".to_string(),
        comma_notes: false,
    }
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. recipe-extract.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__WEB__DEFAULT_AMOUNT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ImportConfig::load`] for the source priority.
pub fn load_config() -> Result<ImportConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-extract").required(false))
        // Use double underscore for nested: RECIPE_EXTRACT__MARKDOWN__DEFAULT_AMOUNT
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ImportConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.max_title_length, 200);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_pipelines_keep_distinct_default_amounts() {
        let config = ImportConfig::default();
        assert_eq!(config.web.default_amount, "");
        assert_eq!(config.markdown.default_amount, "1");
        assert!(config.web.comma_notes);
        assert!(!config.markdown.comma_notes);
    }

    #[test]
    fn test_empty_source_deserializes_to_defaults() {
        let config: ImportConfig = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.web, default_web_parser());
        assert_eq!(config.markdown, default_markdown_parser());
    }

    #[test]
    fn test_partial_override() {
        let config: ImportConfig = Config::builder()
            .set_override("timeout", 5)
            .unwrap()
            .set_override("markdown.default_amount", "")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.timeout, 5);
        assert_eq!(config.markdown.default_amount, "");
        assert_eq!(config.web.default_amount, "");
    }

    #[test]
    fn test_partial_parser_section_keeps_pipeline_defaults() {
        let config: ImportConfig = Config::builder()
            .set_override("web.comma_notes", false)
            .unwrap()
            .set_override("markdown.comma_notes", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(!config.web.comma_notes);
        assert_eq!(config.web.default_amount, "");
        assert!(config.markdown.comma_notes);
        assert_eq!(config.markdown.default_amount, "1");
    }

    #[test]
    fn test_partial_parser_section_from_toml() {
        let config: ImportConfig = Config::builder()
            .add_source(File::from_str(
                "[markdown]\ncomma_notes = true\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(config.markdown.comma_notes);
        assert_eq!(config.markdown.default_amount, "1");
        assert_eq!(config.web, default_web_parser());
    }
}
