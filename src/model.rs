use serde::{Deserialize, Serialize};

/// Servings assumed when a source does not state a yield.
pub const DEFAULT_SERVINGS: u32 = 4;

/// Title used when a page carries no usable name.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// One ingredient line split into its parts.
///
/// `amount` is display text ("1/2", "3-4", "~2"), not a number; the
/// aggregator derives a numeric value from it separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub amount: String,
    pub unit: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Ingredient {
    /// Appends continuation text to the notes, space-joined.
    pub fn append_note(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match self.notes.as_mut() {
            Some(notes) if !notes.is_empty() => {
                notes.push(' ');
                notes.push_str(text);
            }
            _ => self.notes = Some(text.to_string()),
        }
    }
}

/// Recipe extracted from a web page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub title: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub servings: u32,
    /// Minutes
    pub prep_time: Option<u32>,
    /// Minutes
    pub cook_time: Option<u32>,
}

impl Default for ParsedRecipe {
    fn default() -> Self {
        Self {
            title: UNTITLED_RECIPE.to_string(),
            image_url: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            servings: DEFAULT_SERVINGS,
            prep_time: None,
            cook_time: None,
        }
    }
}

impl ParsedRecipe {
    /// True when neither ingredients nor instructions were found. Callers should
    /// treat such a result as low confidence.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.instructions.is_empty()
    }
}

/// Recipe imported from a markdown chat export.
///
/// Carries the fields a saved recipe needs beyond [`ParsedRecipe`]: where the
/// recipe came from, free-form notes, tags and a star rating (always 0 on
/// import).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRecipe {
    pub title: String,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub servings: u32,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub stars: u8,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl Default for ImportedRecipe {
    fn default() -> Self {
        Self {
            title: String::new(),
            source_url: None,
            image_url: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            servings: DEFAULT_SERVINGS,
            prep_time: None,
            cook_time: None,
            stars: 0,
            notes: None,
            tags: Vec::new(),
        }
    }
}

impl From<ImportedRecipe> for ParsedRecipe {
    fn from(recipe: ImportedRecipe) -> Self {
        ParsedRecipe {
            title: recipe.title,
            image_url: recipe.image_url,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            servings: recipe.servings,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_note_space_joins() {
        let mut ingredient = Ingredient {
            amount: "2".to_string(),
            unit: "cups".to_string(),
            name: "flour".to_string(),
            ..Default::default()
        };
        ingredient.append_note("sifted");
        ingredient.append_note("  then measured ");
        assert_eq!(ingredient.notes.as_deref(), Some("sifted then measured"));
    }

    #[test]
    fn test_parsed_recipe_defaults() {
        let recipe = ParsedRecipe::default();
        assert_eq!(recipe.title, "Untitled Recipe");
        assert_eq!(recipe.servings, 4);
        assert!(recipe.is_empty());
    }

    #[test]
    fn test_ingredient_serialization_skips_empty_optionals() {
        let ingredient = Ingredient {
            amount: "1".to_string(),
            unit: String::new(),
            name: "egg".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&ingredient).unwrap();
        assert_eq!(json, r#"{"amount":"1","unit":"","name":"egg"}"#);
    }
}
