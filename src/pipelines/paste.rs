//! Import from separately pasted ingredient and instruction blocks.
//!
//! Unlike the markdown importer there is nothing to detect: the caller says
//! which text is which, and every non-blank line is one entry.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::markdown::strip_list_marker;
use crate::ingredient::{split_amount, IngredientParser};
use crate::model::{Ingredient, ParsedRecipe, UNTITLED_RECIPE};

lazy_static! {
    static ref STEP_NUMBER: Regex =
        Regex::new(r"(?i)^(?:step\s*)?\d+[.):]\s*").expect("valid pattern");
    static ref STEP_BULLET: Regex = Regex::new(r"^[•\-*]\s*").expect("valid pattern");
}

/// How ingredient lines are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteMode {
    /// Split each line into amount, unit and name
    #[default]
    Smart,
    /// Keep each line whole as the ingredient name
    Simple,
}

#[derive(Debug, Clone)]
pub struct PasteParser {
    mode: PasteMode,
    ingredients: IngredientParser,
}

impl Default for PasteParser {
    fn default() -> Self {
        Self::new(PasteMode::Smart)
    }
}

impl PasteParser {
    pub fn new(mode: PasteMode) -> Self {
        Self {
            mode,
            ingredients: IngredientParser::new(""),
        }
    }

    /// Uses `parser` for smart-mode lines instead of the plain one.
    pub fn with_ingredient_parser(mut self, parser: IngredientParser) -> Self {
        self.ingredients = parser;
        self
    }

    pub fn parse(&self, title: &str, ingredients: &str, instructions: &str) -> ParsedRecipe {
        let title = title.trim();
        ParsedRecipe {
            title: if title.is_empty() {
                UNTITLED_RECIPE.to_string()
            } else {
                title.to_string()
            },
            ingredients: self.parse_ingredients(ingredients),
            instructions: parse_instructions(instructions),
            ..ParsedRecipe::default()
        }
    }

    pub fn parse_ingredients(&self, text: &str) -> Vec<Ingredient> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match self.mode {
                PasteMode::Simple => Some(Ingredient {
                    name: line.to_string(),
                    ..Ingredient::default()
                }),
                PasteMode::Smart => self.smart_ingredient(line),
            })
            .collect()
    }

    fn smart_ingredient(&self, line: &str) -> Option<Ingredient> {
        let item = strip_list_marker(line).unwrap_or(line);
        self.ingredients.parse(item).or_else(|| {
            // A bare quantity ("2") is kept so the user can fill in the name
            split_amount(item)
                .filter(|(_, rest)| rest.is_empty())
                .map(|(amount, _)| Ingredient {
                    amount,
                    ..Ingredient::default()
                })
        })
    }
}

/// One step per non-blank line, without `Step N:`, `N.`, `N)` or bullet
/// prefixes.
pub fn parse_instructions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = STEP_NUMBER.replace(line.trim(), "");
            STEP_BULLET.replace(&line, "").trim().to_string()
        })
        .filter(|step| !step.is_empty())
        .collect()
}

/// Builds a recipe from pasted blocks in the given mode.
pub fn parse_pasted_recipe(
    title: &str,
    ingredients: &str,
    instructions: &str,
    mode: PasteMode,
) -> ParsedRecipe {
    PasteParser::new(mode).parse(title, ingredients, instructions)
}
