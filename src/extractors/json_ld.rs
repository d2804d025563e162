use super::{Extractor, ParsingContext};
use crate::duration::parse_duration;
use crate::error::ImportError;
use crate::ingredient::IngredientParser;
use crate::model::{ParsedRecipe, DEFAULT_SERVINGS, UNTITLED_RECIPE};
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

lazy_static! {
    static ref SCRIPT_SELECTOR: Selector =
        Selector::parse("script[type='application/ld+json']").expect("valid selector");
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([\]}])").expect("valid pattern");
    static ref FIRST_INTEGER: Regex = Regex::new(r"\d+").expect("valid pattern");
    static ref LINE_BREAKS: Regex = Regex::new(r"\n+").expect("valid pattern");
}

/// Reads schema.org `Recipe` objects out of JSON-LD script blocks.
pub struct JsonLdExtractor;

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime", default, deserialize_with = "lenient_string")]
    prep_time: Option<String>,
    #[serde(rename = "cookTime", default, deserialize_with = "lenient_string")]
    cook_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    String(String),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageEntry>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Multiple(Vec<Value>),
    String(String),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<InstructionEntry>,
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    String(String),
    Section(HowToSection),
    Step(HowToStep),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionEntry>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Number(f64),
    String(String),
    Array(Vec<RecipeYield>),
    Other(Value),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode entities (&amp;amp;)
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

impl ImageType {
    fn first_url(&self) -> Option<String> {
        let url = match self {
            ImageType::String(url) => Some(url.clone()),
            ImageType::Multiple(entries) => match entries.first() {
                Some(ImageEntry::String(url)) => Some(url.clone()),
                Some(ImageEntry::Object(obj)) => obj.url.clone(),
                _ => None,
            },
            ImageType::Object(obj) => obj.url.clone(),
            ImageType::Other(_) => None,
        };
        url.map(|u| decode_html_symbols(u.trim()))
            .filter(|u| !u.is_empty())
    }
}

impl InstructionEntry {
    fn collect_into(self, steps: &mut Vec<String>) {
        match self {
            InstructionEntry::String(text) => steps.push(text),
            InstructionEntry::Section(section) => {
                for entry in section.item_list_element {
                    entry.collect_into(steps);
                }
            }
            InstructionEntry::Step(step) => steps.extend(step.text),
            InstructionEntry::Other(_) => {}
        }
    }
}

impl RecipeInstructions {
    fn into_steps(self) -> Vec<String> {
        let mut steps = Vec::new();
        match self {
            RecipeInstructions::String(text) => {
                steps.extend(LINE_BREAKS.split(&text).map(str::to_string));
            }
            RecipeInstructions::Multiple(entries) => {
                for entry in entries {
                    entry.collect_into(&mut steps);
                }
            }
            RecipeInstructions::Other(_) => {}
        }
        steps
            .iter()
            .map(|step| decode_html_symbols(step.trim()))
            .filter(|step| !step.is_empty())
            .collect()
    }
}

impl RecipeYield {
    fn servings(&self) -> Option<u32> {
        match self {
            RecipeYield::Number(n) if *n >= 1.0 => Some(n.round() as u32),
            RecipeYield::String(s) => FIRST_INTEGER
                .find(s)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|n| *n > 0),
            RecipeYield::Array(items) => items.first().and_then(RecipeYield::servings),
            _ => None,
        }
    }
}

impl JsonLdRecipe {
    fn into_recipe(self, parser: &IngredientParser) -> ParsedRecipe {
        let ingredient_lines: Vec<String> = match self.recipe_ingredient {
            Some(RecipeIngredients::Multiple(items)) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(RecipeIngredients::String(text)) => {
                text.lines().map(str::to_string).collect()
            }
            _ => Vec::new(),
        };

        let ingredients = ingredient_lines
            .iter()
            .filter_map(|line| parser.parse(&decode_html_symbols(line)))
            .collect();

        let title = self
            .name
            .map(|name| decode_html_symbols(name.trim()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

        ParsedRecipe {
            title,
            image_url: self.image.as_ref().and_then(ImageType::first_url),
            ingredients,
            instructions: self
                .recipe_instructions
                .map(RecipeInstructions::into_steps)
                .unwrap_or_default(),
            servings: self
                .recipe_yield
                .as_ref()
                .and_then(RecipeYield::servings)
                .unwrap_or(DEFAULT_SERVINGS),
            prep_time: self.prep_time.as_deref().and_then(parse_duration),
            cook_time: self.cook_time.as_deref().and_then(parse_duration),
        }
    }
}

fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str.trim().replace("<!--", "").replace("-->", "");

    // Drop anything before the first JSON value, e.g. a stray CDATA marker
    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find(['{', '[']) {
            cleaned = cleaned[start..].to_string();
        }
    }

    TRAILING_COMMA.replace_all(&cleaned, "$1").into_owned()
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| kind.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Depth-first search for the first Recipe-typed object. An object is checked
/// before its `@graph`, and the graph before the object's other members.
pub(crate) fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            if let Some(found) = map.get("@graph").and_then(find_recipe) {
                return Some(found);
            }
            map.iter()
                .filter(|(key, _)| key.as_str() != "@graph")
                .find_map(|(_, child)| find_recipe(child))
        }
        Value::Array(items) => items.iter().find_map(find_recipe),
        _ => None,
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ParsedRecipe, ImportError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);

        // Try each script element until we find a valid recipe
        for (index, script) in context.document.select(&SCRIPT_SELECTOR).enumerate() {
            let cleaned_json = sanitize_json(&script.inner_html());
            let json_ld = match serde_json::from_str::<Value>(&cleaned_json) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                    continue;
                }
            };

            let Some(recipe_json) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(recipe_json.clone()) {
                Ok(recipe) => {
                    debug!("JsonLdExtractor: Found recipe in JSON-LD {}", index);
                    return Ok(recipe.into_recipe(&context.ingredients));
                }
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert JSON-LD {}: {}", index, e);
                }
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        Err(ImportError::NoRecipeFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_context(json_ld: &str) -> ParsingContext {
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        );
        ParsingContext::new("https://example.com/recipe", &html)
    }

    #[test]
    fn test_parse_basic_recipe() {
        let context = create_context(
            r#"
            {
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Chocolate Chip Cookies",
                "image": "https://example.com/cookie.jpg",
                "recipeIngredient": ["2 cups flour", "1 cup sugar", "chocolate chips"],
                "recipeInstructions": "Mix ingredients.\n\nBake at 350F for 10 minutes.",
                "recipeYield": "24 cookies",
                "prepTime": "PT15M",
                "cookTime": "PT1H"
            }
            "#,
        );

        let recipe = JsonLdExtractor.parse(&context).unwrap();

        assert_eq!(recipe.title, "Chocolate Chip Cookies");
        assert_eq!(recipe.image_url.as_deref(), Some("https://example.com/cookie.jpg"));
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].unit, "cups");
        assert_eq!(recipe.ingredients[2].amount, "");
        assert_eq!(recipe.ingredients[2].name, "chocolate chips");
        assert_eq!(
            recipe.instructions,
            vec!["Mix ingredients.", "Bake at 350F for 10 minutes."]
        );
        assert_eq!(recipe.servings, 24);
        assert_eq!(recipe.prep_time, Some(15));
        assert_eq!(recipe.cook_time, Some(60));
    }

    #[test]
    fn test_recipe_inside_graph() {
        let context = create_context(
            r#"
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebSite", "name": "Food Blog"},
                    {"@type": "WebPage", "name": "Soup page"},
                    {
                        "@type": ["Recipe", "NewsArticle"],
                        "name": "Tomato Soup",
                        "recipeIngredient": ["4 tomatoes"],
                        "recipeInstructions": [
                            {"@type": "HowToStep", "text": "Chop tomatoes"},
                            {"@type": "HowToStep", "text": "Simmer"}
                        ]
                    }
                ]
            }
            "#,
        );

        let recipe = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Tomato Soup");
        assert_eq!(recipe.instructions, vec!["Chop tomatoes", "Simmer"]);
    }

    #[test]
    fn test_how_to_sections_are_flattened() {
        let context = create_context(
            r#"
            {
                "@type": "Recipe",
                "name": "Layered Cake",
                "recipeInstructions": [
                    {
                        "@type": "HowToSection",
                        "name": "Cake",
                        "itemListElement": [
                            {"@type": "HowToStep", "text": "Bake the layers"},
                            {"@type": "HowToStep", "text": "Cool completely"}
                        ]
                    },
                    {"@type": "HowToStep", "text": "Frost"}
                ]
            }
            "#,
        );

        let recipe = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(
            recipe.instructions,
            vec!["Bake the layers", "Cool completely", "Frost"]
        );
    }

    #[test]
    fn test_image_variants() {
        let cases = [
            (r#""https://a.com/1.jpg""#, Some("https://a.com/1.jpg")),
            (r#"["https://a.com/2.jpg", "https://a.com/3.jpg"]"#, Some("https://a.com/2.jpg")),
            (r#"[{"@type": "ImageObject", "url": "https://a.com/4.jpg"}]"#, Some("https://a.com/4.jpg")),
            (r#"{"@type": "ImageObject", "url": "https://a.com/5.jpg"}"#, Some("https://a.com/5.jpg")),
            (r#"[]"#, None),
            (r#"42"#, None),
        ];

        for (image, expected) in cases {
            let json_ld = format!(r#"{{"@type": "Recipe", "name": "Pic", "image": {image}}}"#);
            let recipe = JsonLdExtractor.parse(&create_context(&json_ld)).unwrap();
            assert_eq!(recipe.image_url.as_deref(), expected, "image: {image}");
        }
    }

    #[test]
    fn test_yield_variants() {
        let cases = [
            (r#""Serves 6""#, 6),
            (r#"8"#, 8),
            (r#"["12", "12 muffins"]"#, 12),
            (r#"[3]"#, 3),
            (r#""a crowd""#, 4),
        ];

        for (yield_value, expected) in cases {
            let json_ld =
                format!(r#"{{"@type": "Recipe", "name": "Y", "recipeYield": {yield_value}}}"#);
            let recipe = JsonLdExtractor.parse(&create_context(&json_ld)).unwrap();
            assert_eq!(recipe.servings, expected, "yield: {yield_value}");
        }
    }

    #[test]
    fn test_missing_name_and_odd_fields() {
        let context = create_context(
            r#"
            {
                "@type": "recipe",
                "name": null,
                "recipeIngredient": ["1 egg", 5, {"name": "milk"}],
                "prepTime": 10
            }
            "#,
        );

        let recipe = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Untitled Recipe");
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.prep_time, None);
        assert!(recipe.instructions.is_empty());
    }

    #[test]
    fn test_html_entities_decoded() {
        let context = create_context(
            r#"{"@type": "Recipe", "name": "Mac &amp;amp; Cheese", "recipeInstructions": ["Boil &amp; drain"]}"#,
        );
        let recipe = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Mac & Cheese");
        assert_eq!(recipe.instructions, vec!["Boil & drain"]);
    }

    #[test]
    fn test_skips_invalid_and_non_recipe_scripts() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{ not json at all</script>
            <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Third Time",}</script>
            </head><body></body></html>
        "#;
        let context = ParsingContext::new("https://example.com", html);
        let recipe = JsonLdExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Third Time");
    }

    #[test]
    fn test_no_recipe_is_an_error() {
        let context = create_context(r#"{"@type": "WebSite", "name": "Nothing here"}"#);
        assert!(matches!(
            JsonLdExtractor.parse(&context),
            Err(ImportError::NoRecipeFound)
        ));
    }

    #[test]
    fn test_find_recipe_prefers_document_order() {
        let value: Value = serde_json::json!([
            {"@type": "WebPage", "mainEntity": {"@type": "Recipe", "name": "first"}},
            {"@type": "Recipe", "name": "second"}
        ]);
        let found = find_recipe(&value).unwrap();
        assert_eq!(found["name"], "first");
    }
}
