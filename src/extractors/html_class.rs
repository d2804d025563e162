use super::{element_text, Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::{ParsedRecipe, DEFAULT_SERVINGS, UNTITLED_RECIPE};
use lazy_static::lazy_static;
use log::debug;
use scraper::{Html, Selector};

/// Low-precision fallback that reads conventionally named markup when a page
/// has no structured data. Never fails; the result may be empty.
pub struct HtmlClassExtractor;

/// Heading selectors tried in order for the title.
const TITLE_SELECTORS: &[&str] = &["h1[class*='recipe']", "h1[class*='title']", "h1"];

const INGREDIENT_SELECTOR: &str = "[class*='ingredient'] li";

const INSTRUCTION_SELECTOR: &str = "[class*='instruction'] li, [class*='direction'] li, \
                                    [class*='step'] li, [class*='step'] p";

lazy_static! {
    static ref TITLES: Vec<Selector> = TITLE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect();
    static ref OG_TITLE: Selector =
        Selector::parse("meta[property='og:title']").expect("valid selector");
    static ref DOCUMENT_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref OG_IMAGE: Selector =
        Selector::parse("meta[property='og:image']").expect("valid selector");
    static ref RECIPE_IMAGE: Selector =
        Selector::parse("img[class*='recipe']").expect("valid selector");
    static ref INGREDIENT_ITEMS: Selector =
        Selector::parse(INGREDIENT_SELECTOR).expect("valid selector");
    static ref INSTRUCTION_ITEMS: Selector =
        Selector::parse(INSTRUCTION_SELECTOR).expect("valid selector");
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl HtmlClassExtractor {
    fn find_title(&self, document: &Html) -> String {
        TITLES
            .iter()
            .find_map(|selector| first_text(document, selector))
            .or_else(|| first_attr(document, &OG_TITLE, "content"))
            .or_else(|| first_text(document, &DOCUMENT_TITLE))
            .unwrap_or_else(|| UNTITLED_RECIPE.to_string())
    }

    fn find_image(&self, document: &Html) -> Option<String> {
        first_attr(document, &OG_IMAGE, "content")
            .or_else(|| first_attr(document, &RECIPE_IMAGE, "src"))
    }

    fn list_items(&self, document: &Html, selector: &Selector) -> Vec<String> {
        document
            .select(selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}

impl Extractor for HtmlClassExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<ParsedRecipe, ImportError> {
        debug!("Attempting to extract recipe using HTML class matchers");
        let document = &context.document;

        let title = truncate_chars(&self.find_title(document), context.max_title_length);

        let ingredients: Vec<_> = self
            .list_items(document, &INGREDIENT_ITEMS)
            .iter()
            .filter_map(|line| context.ingredients.parse(line))
            .collect();

        let instructions = self.list_items(document, &INSTRUCTION_ITEMS);

        debug!("Recipe name: {}", title);
        debug!("Ingredients count: {}", ingredients.len());
        debug!("Instructions count: {}", instructions.len());

        Ok(ParsedRecipe {
            title,
            image_url: self.find_image(document),
            ingredients,
            instructions,
            servings: DEFAULT_SERVINGS,
            prep_time: None,
            cook_time: None,
        })
    }
}
