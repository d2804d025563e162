//! Ingredient line parsing.
//!
//! Splits a single free-text line such as `"2 cups flour (sifted)"` into
//! amount, unit, name and notes. The parser is heuristic: anything it cannot
//! place ends up in the name rather than being dropped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Ingredient;

/// Vulgar fraction glyphs accepted inside an amount.
pub const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Unit words recognized right after the amount, compared case-insensitively.
pub const UNITS: &[&str] = &[
    "cup", "cups", "c",
    "tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tb",
    "teaspoon", "teaspoons", "tsp", "tsps",
    "ounce", "ounces", "oz",
    "pound", "pounds", "lb", "lbs",
    "gram", "grams", "g",
    "kilogram", "kilograms", "kg",
    "milliliter", "milliliters", "millilitre", "millilitres", "ml",
    "liter", "liters", "litre", "litres", "l",
    "clove", "cloves",
    "pinch", "pinches",
    "dash", "dashes",
    "can", "cans",
    "package", "packages", "pkg", "pkgs",
    "bunch", "bunches",
    "stalk", "stalks",
    "slice", "slices",
    "piece", "pieces",
];

lazy_static! {
    static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?i)^(?:(?:about|approx\.?|approximately)\s+|[~≈]\s*)?[\d½¼¾⅓⅔⅛⅜⅝⅞][\d½¼¾⅓⅔⅛⅜⅝⅞/.\-–\s]*"
    )
    .expect("amount pattern should be valid");
}

/// Parses ingredient lines.
///
/// The two import pipelines disagree on what an ingredient without a leading
/// quantity means: web pages record an empty amount, markdown exports record
/// `"1"`. The choice is carried here as `default_amount` so each pipeline
/// states it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientParser {
    default_amount: String,
    comma_notes: bool,
}

impl Default for IngredientParser {
    fn default() -> Self {
        Self::for_web()
    }
}

impl IngredientParser {
    pub fn new(default_amount: impl Into<String>) -> Self {
        Self {
            default_amount: default_amount.into(),
            comma_notes: false,
        }
    }

    /// Parser used for web pages: empty default amount, `", sifted"` style
    /// clauses become notes.
    pub fn for_web() -> Self {
        Self::new("").with_comma_notes(true)
    }

    /// Parser used for markdown chat exports: default amount `"1"`.
    pub fn for_markdown() -> Self {
        Self::new("1")
    }

    /// Move a trailing comma clause of the name into the notes.
    pub fn with_comma_notes(mut self, enabled: bool) -> Self {
        self.comma_notes = enabled;
        self
    }

    /// Parse one ingredient line. Returns `None` when no name is left.
    pub fn parse(&self, line: &str) -> Option<Ingredient> {
        let text = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }

        let (amount, rest) = match split_amount(&text) {
            Some((amount, rest)) => (Some(amount), rest),
            None => (None, text.as_str()),
        };

        // A unit is only looked for after an explicit amount
        let (unit, rest) = match amount {
            Some(_) => split_unit(rest),
            None => (String::new(), rest),
        };

        let (name, notes) = self.split_notes(rest);
        if name.is_empty() {
            return None;
        }

        Some(Ingredient {
            amount: amount.unwrap_or_else(|| self.default_amount.clone()),
            unit,
            name,
            notes,
            category: None,
        })
    }

    fn split_notes(&self, text: &str) -> (String, Option<String>) {
        let mut name = text.trim().to_string();
        let mut notes = Vec::new();

        if name.ends_with(')') {
            if let Some(open) = name.rfind('(') {
                let inner = name[open + 1..name.len() - 1].trim().to_string();
                name = name[..open].trim().to_string();
                if !inner.is_empty() {
                    notes.push(inner);
                }
            }
        }

        if self.comma_notes {
            if let Some((head, tail)) = name.split_once(',') {
                let tail = tail.trim().to_string();
                name = head.trim().to_string();
                if !tail.is_empty() {
                    notes.insert(0, tail);
                }
            }
        }

        let notes = if notes.is_empty() {
            None
        } else {
            Some(notes.join(", "))
        };
        (name, notes)
    }
}

/// Splits a leading amount token from the rest of the line.
pub(crate) fn split_amount(text: &str) -> Option<(String, &str)> {
    let matched = AMOUNT_PATTERN.find(text)?;
    let token = matched
        .as_str()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '/' | '.'));
    if token.is_empty() {
        return None;
    }
    let rest = text[token.len()..].trim_start_matches(|c: char| c.is_whitespace() || c == '-');
    let amount = token.split_whitespace().collect::<Vec<_>>().join(" ");
    Some((amount, rest))
}

/// Consumes a known unit word at the start of `text`.
fn split_unit(text: &str) -> (String, &str) {
    let word_end = text.find(char::is_whitespace).unwrap_or(text.len());
    let word = text[..word_end].trim_end_matches(['.', ',']);
    let rest = text[word_end..].trim_start();

    if rest.is_empty() || !is_unit(word) {
        return (String::new(), text);
    }
    (word.to_string(), rest)
}

pub fn is_unit(word: &str) -> bool {
    let lower = word.to_lowercase();
    UNITS.contains(&lower.as_str())
}

/// Parse a line with the web defaults.
pub fn parse_ingredient(line: &str) -> Option<Ingredient> {
    IngredientParser::for_web().parse(line)
}
