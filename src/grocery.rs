//! Shopping-list assembly on top of [`aggregate_ingredients`](crate::aggregate::aggregate_ingredients).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregatedIngredients;
use crate::category::OTHER;

/// Display order of grocery sections.
pub const GROCERY_CATEGORIES: &[&str] = &[
    "Produce",
    "Dairy & Eggs",
    "Meat & Seafood",
    "Bakery",
    "Pantry",
    "Frozen",
    "Canned Goods",
    "Spices & Seasonings",
    "Condiments",
    "Beverages",
    OTHER,
];

/// A planned meal referencing a recipe, optionally cooked for a different
/// number of servings than the recipe yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub recipe_id: String,
    /// Servings the recipe yields
    pub servings: u32,
    #[serde(default)]
    pub servings_override: Option<u32>,
}

impl MealPlanEntry {
    fn multiplier(&self) -> f64 {
        if self.servings == 0 {
            return 1.0;
        }
        let wanted = self.servings_override.filter(|s| *s > 0).unwrap_or(self.servings);
        f64::from(wanted) / f64::from(self.servings)
    }
}

/// Total multiplier per recipe id across all planned meals.
pub fn recipe_multipliers(plans: &[MealPlanEntry]) -> HashMap<String, f64> {
    let mut multipliers = HashMap::new();
    for plan in plans {
        *multipliers.entry(plan.recipe_id.clone()).or_insert(0.0) += plan.multiplier();
    }
    multipliers
}

/// Formats an aggregated amount for display: `0` is blank, whole numbers have
/// no decimals, anything else gets at most two.
pub fn format_amount(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return String::new();
    }
    if amount.fract() == 0.0 {
        return format!("{}", amount as i64);
    }
    let fixed = format!("{:.2}", amount);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryItem {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub from_recipes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryGroup {
    pub category: String,
    pub items: Vec<GroceryItem>,
}

/// Buckets aggregated items into [`GROCERY_CATEGORIES`] order.
///
/// Items whose category is not in the list land in "Other". Empty groups
/// are dropped; items keep their aggregation order within a group.
pub fn group_by_category(ingredients: &AggregatedIngredients) -> Vec<GroceryGroup> {
    let mut buckets: Vec<Vec<GroceryItem>> = vec![Vec::new(); GROCERY_CATEGORIES.len()];
    let other = GROCERY_CATEGORIES.len() - 1;

    for (name, ing) in ingredients.iter() {
        let slot = GROCERY_CATEGORIES
            .iter()
            .position(|c| *c == ing.category)
            .unwrap_or(other);
        buckets[slot].push(GroceryItem {
            name: name.to_string(),
            amount: format_amount(ing.amount),
            unit: ing.unit.clone(),
            from_recipes: ing.from_recipes.clone(),
        });
    }

    GROCERY_CATEGORIES
        .iter()
        .zip(buckets)
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, items)| GroceryGroup {
            category: category.to_string(),
            items,
        })
        .collect()
}
