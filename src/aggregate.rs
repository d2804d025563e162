//! Merging ingredient lists from several recipes into grocery totals.
//!
//! Ingredients are keyed by their lowercase name. Amounts with the same unit
//! (or where one side has no unit) are summed; a genuine unit conflict is
//! kept under a separate `"<name> (<unit>)"` key since there is no unit
//! conversion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category::guess_category;
use crate::ingredient::VULGAR_FRACTIONS;
use crate::model::Ingredient;

/// One recipe selected for the shopping list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeSelection {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    /// Serving multiplier; missing or zero means 1
    #[serde(default)]
    pub multiplier: Option<f64>,
}

impl RecipeSelection {
    pub fn new(title: impl Into<String>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            title: title.into(),
            ingredients,
            multiplier: None,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    fn effective_multiplier(&self) -> f64 {
        match self.multiplier {
            Some(m) if m != 0.0 && !m.is_nan() => m,
            _ => 1.0,
        }
    }
}

/// Combined quantity for one grocery key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    /// Full precision; rounding is left to the display layer
    pub amount: f64,
    pub unit: String,
    pub category: String,
    pub from_recipes: Vec<String>,
}

impl AggregatedIngredient {
    fn add(&mut self, amount: f64, title: &str) {
        self.amount += amount;
        if !self.from_recipes.iter().any(|t| t == title) {
            self.from_recipes.push(title.to_string());
        }
    }
}

/// Aggregation result, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedIngredients {
    entries: Vec<(String, AggregatedIngredient)>,
    index: HashMap<String, usize>,
}

impl AggregatedIngredients {
    pub fn get(&self, key: &str) -> Option<&AggregatedIngredient> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut AggregatedIngredient> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    fn insert(&mut self, key: String, value: AggregatedIngredient) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregatedIngredient)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AggregatedIngredients {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Merges the ingredients of all recipes, scaled by each recipe's multiplier.
pub fn aggregate_ingredients(recipes: &[RecipeSelection]) -> AggregatedIngredients {
    let mut aggregated = AggregatedIngredients::default();

    for recipe in recipes {
        let multiplier = recipe.effective_multiplier();

        for ing in &recipe.ingredients {
            let key = ing.name.trim().to_lowercase();
            let amount = numeric_amount(&ing.amount) * multiplier;

            let conflict = aggregated.get(&key).is_some_and(|existing| {
                existing.unit != ing.unit && !existing.unit.is_empty() && !ing.unit.is_empty()
            });
            let target_key = if conflict {
                format!("{} ({})", key, ing.unit)
            } else {
                key
            };

            match aggregated.get_mut(&target_key) {
                Some(existing) if !conflict || existing.unit == ing.unit => {
                    existing.add(amount, &recipe.title);
                }
                _ => aggregated.insert(
                    target_key,
                    AggregatedIngredient {
                        amount,
                        unit: ing.unit.clone(),
                        category: ing
                            .category
                            .clone()
                            .filter(|c| !c.is_empty())
                            .unwrap_or_else(|| guess_category(&ing.name).to_string()),
                        from_recipes: vec![recipe.title.clone()],
                    },
                ),
            }
        }
    }

    aggregated
}

/// Numeric value of a display amount.
///
/// Handles integers, decimals, `a/b` fractions, mixed numbers (`1 1/2`) and
/// vulgar fractions (`1½`). A range (`3-4`) counts as its upper bound.
/// Approximation markers are ignored. Anything malformed is 0.
pub fn numeric_amount(amount: &str) -> f64 {
    let text = amount
        .trim()
        .trim_start_matches(['~', '≈'])
        .trim_start_matches("about ")
        .trim();

    let upper = text.rsplit(['-', '–']).next().unwrap_or("");
    parse_quantity(upper.trim()).unwrap_or(0.0)
}

fn parse_quantity(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.split_whitespace()
        .map(parse_term)
        .try_fold(0.0, |total, term| term.map(|t| total + t))
}

fn parse_term(term: &str) -> Option<f64> {
    if let Some((num, den)) = term.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return if den == 0.0 { None } else { Some(num / den) };
    }

    // Leading digits with an optional trailing vulgar fraction: "1½"
    let (digits, glyph) = match term.char_indices().last() {
        Some((i, c)) if VULGAR_FRACTIONS.iter().any(|(g, _)| *g == c) => (&term[..i], Some(c)),
        _ => (term, None),
    };
    let whole = if digits.is_empty() {
        0.0
    } else {
        digits.parse::<f64>().ok()?
    };
    let fraction = glyph
        .and_then(|g| VULGAR_FRACTIONS.iter().find(|(c, _)| *c == g))
        .map(|(_, value)| *value)
        .unwrap_or(0.0);

    if digits.is_empty() && glyph.is_none() {
        return None;
    }
    let value = whole + fraction;
    value.is_finite().then_some(value)
}
