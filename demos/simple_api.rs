//! Simple API usage with convenience functions
//!
//! This example imports one recipe from the web and one from a markdown
//! chat export, then builds a grocery list from both.

use recipe_extract::{
    aggregate_ingredients, fetch_recipe, group_by_category, grocery::format_amount,
    parse_markdown_recipe, RecipeSelection,
};

const PANCAKES: &str = "**Fluffy Pancakes**

Light, tender pancakes for a slow weekend breakfast.

### Ingredients
- 2 cups flour
- 2 tbsp sugar
- 1 1/2 cups milk
- 2 eggs

### Instructions
1. Whisk the dry ingredients.
2. Beat in milk and eggs, then cook on a hot griddle.
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Web Recipe ===");
    let web = fetch_recipe("https://www.bbcgoodfood.com/recipes/classic-cottage-pie").await?;
    println!("{}: {} ingredients, serves {}", web.title, web.ingredients.len(), web.servings);

    println!("\n=== Markdown Recipe ===");
    let import = parse_markdown_recipe(PANCAKES)?;
    println!("{}: {} ingredients", import.recipe.title, import.recipe.ingredients.len());
    for warning in &import.warnings {
        println!("warning: {}", warning);
    }

    println!("\n=== Grocery List ===");
    let aggregated = aggregate_ingredients(&[
        RecipeSelection::new(web.title.clone(), web.ingredients),
        RecipeSelection::new(import.recipe.title.clone(), import.recipe.ingredients)
            .with_multiplier(2.0),
    ]);
    for group in group_by_category(&aggregated) {
        println!("{}", group.category);
        for item in group.items {
            println!("  {} {} {}", item.amount, item.unit, item.name);
        }
    }

    if let Some(flour) = aggregated.get("flour") {
        println!("\nFlour total: {} {}", format_amount(flour.amount), flour.unit);
    }

    Ok(())
}
