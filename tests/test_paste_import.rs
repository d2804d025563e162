use recipe_extract::{aggregate_ingredients, parse_pasted_recipe, PasteMode, RecipeSelection};

const INGREDIENTS: &str = "• 2 cups flour
• 1 cup milk (whole)
• 2 eggs";

const INSTRUCTIONS: &str = "Step 1: Whisk the flour and milk.
Step 2: Beat in the eggs.";

#[test]
fn test_smart_paste_feeds_aggregation() {
    let recipe = parse_pasted_recipe("Crepes", INGREDIENTS, INSTRUCTIONS, PasteMode::Smart);

    assert_eq!(recipe.title, "Crepes");
    assert_eq!(recipe.ingredients[1].name, "milk");
    assert_eq!(recipe.ingredients[1].notes.as_deref(), Some("whole"));
    assert_eq!(
        recipe.instructions,
        vec!["Whisk the flour and milk.", "Beat in the eggs."]
    );

    let aggregated = aggregate_ingredients(&[
        RecipeSelection::new(recipe.title.clone(), recipe.ingredients).with_multiplier(2.0)
    ]);
    assert_eq!(aggregated.get("flour").unwrap().amount, 4.0);
    assert_eq!(aggregated.get("eggs").unwrap().amount, 4.0);
}

#[test]
fn test_simple_paste_keeps_lines_verbatim() {
    let recipe = parse_pasted_recipe("Crepes", INGREDIENTS, INSTRUCTIONS, PasteMode::Simple);

    assert_eq!(recipe.ingredients.len(), 3);
    assert_eq!(recipe.ingredients[0].name, "• 2 cups flour");
    assert!(recipe.ingredients.iter().all(|i| i.amount.is_empty() && i.unit.is_empty()));
    assert_eq!(recipe.instructions.len(), 2);
}
